//! Account classification.
//!
//! Every account belongs to one of five categories, and each category has a
//! natural balance side used to normalise raw (debit-positive) balances.

pub mod types;

pub use types::{AccountCategory, NormalBalance, ReportType, validate_account_code};
