//! Report error types.

use chrono::NaiveDate;
use sgbooks_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl ReportError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::InvalidDateRange { .. } => Self::validation(err.to_string()),
        }
    }
}

/// Checks that `start <= end`.
///
/// # Errors
///
/// Returns `InvalidDateRange` otherwise.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReportError> {
    if start > end {
        return Err(ReportError::InvalidDateRange { start, end });
    }
    Ok(())
}
