//! GST errors.

use sgbooks_shared::AppError;
use thiserror::Error;

use super::types::GstReturnStatus;

/// Errors raised while preparing or filing a GST return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GstError {
    /// Period end is before its start.
    #[error("GST period end date must not be before start date")]
    InvalidPeriod,

    /// The return is not in the required status.
    #[error("GST return is {0:?}; only Draft returns can be finalized")]
    NotDraft(GstReturnStatus),

    /// A required GST system account is missing.
    #[error("GST account {0} is not set up")]
    MissingAccount(String),

    /// Submission reference is required to finalize.
    #[error("Submission reference is required")]
    MissingReference,
}

impl GstError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod => "INVALID_PERIOD",
            Self::NotDraft(_) => "NOT_DRAFT",
            Self::MissingAccount(_) => "MISSING_ACCOUNT",
            Self::MissingReference => "MISSING_REFERENCE",
        }
    }
}

impl From<GstError> for AppError {
    fn from(err: GstError) -> Self {
        match err {
            GstError::InvalidPeriod | GstError::MissingReference => {
                Self::validation(err.to_string())
            }
            GstError::MissingAccount(_) => Self::NotFound(err.to_string()),
            GstError::NotDraft(_) => Self::BusinessRule(err.to_string()),
        }
    }
}
