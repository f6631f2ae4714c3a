//! Double-entry bookkeeping logic.
//!
//! This module implements the core journal functionality:
//! - Journal line validation (one side per line, balanced entry)
//! - Reversal line construction
//! - Running balance calculations for ledgers
//! - Error types for journal operations

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::RunningBalance;
pub use error::LedgerError;
pub use types::{AccountPostingInfo, JournalLineInput, JournalTotals, JournalType};
pub use validation::{reverse_lines, validate_journal_lines, validate_line_accounts};
