//! Fiscal year and period errors.

use chrono::NaiveDate;
use sgbooks_shared::AppError;
use thiserror::Error;

use super::period::FiscalPeriodStatus;

/// Errors raised by fiscal year and period rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FiscalError {
    /// Start date must be before end date.
    #[error("Fiscal year start date must be before end date")]
    InvalidDateRange,

    /// The new year overlaps an existing one.
    #[error("Fiscal year overlaps existing year {0}")]
    OverlappingYear(String),

    /// Period status cannot move between these states.
    #[error("Cannot change period status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: FiscalPeriodStatus,
        /// Requested status.
        to: FiscalPeriodStatus,
    },

    /// No period covers the date.
    #[error("No fiscal period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// The year is already closed.
    #[error("Fiscal year {0} is already closed")]
    YearClosed(String),

    /// The year still has open periods.
    #[error("Fiscal year {0} still has open periods")]
    OpenPeriodsRemain(String),
}

impl FiscalError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::OverlappingYear(_) => "OVERLAPPING_YEAR",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::NoPeriodForDate(_) => "NO_FISCAL_PERIOD",
            Self::YearClosed(_) => "YEAR_CLOSED",
            Self::OpenPeriodsRemain(_) => "OPEN_PERIODS_REMAIN",
        }
    }
}

impl From<FiscalError> for AppError {
    fn from(err: FiscalError) -> Self {
        match err {
            FiscalError::InvalidDateRange => Self::validation(err.to_string()),
            FiscalError::OverlappingYear(_) => Self::Conflict(err.to_string()),
            FiscalError::NoPeriodForDate(_) => Self::NotFound(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
