//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{BALANCE_TOLERANCE, format_amount, is_balanced, round_money};
