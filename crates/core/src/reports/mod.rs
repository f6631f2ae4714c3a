//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Balance Sheet (with current year earnings and comparatives)
//! - Profit & Loss
//! - Trial Balance
//! - General Ledger

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::{CURRENT_YEAR_EARNINGS, ReportService};
pub use types::*;
