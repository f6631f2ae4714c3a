//! Invoice errors.

use rust_decimal::Decimal;
use sgbooks_shared::AppError;
use thiserror::Error;

use super::calc::InvoiceStatus;

/// Errors raised by invoice rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Invoice has no lines.
    #[error("Invoice must have at least one line")]
    NoLines,

    /// A line quantity is zero or negative.
    #[error("Line {0}: quantity must be positive")]
    InvalidQuantity(usize),

    /// A line unit price is negative.
    #[error("Line {0}: unit price cannot be negative")]
    NegativePrice(usize),

    /// Discount outside 0-100%.
    #[error("Line {0}: discount must be between 0 and 100 percent")]
    InvalidDiscount(usize),

    /// Operation requires a different status.
    #[error("Invoice is {status:?}; expected {expected}")]
    InvalidStatus {
        /// Current status.
        status: InvoiceStatus,
        /// Human description of the allowed state.
        expected: &'static str,
    },

    /// Payment exceeds the outstanding balance.
    #[error("Payment of {amount} exceeds outstanding balance {outstanding}")]
    Overpayment {
        /// Amount being applied.
        amount: Decimal,
        /// Amount still owed.
        outstanding: Decimal,
    },
}

impl InvoiceError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativePrice(_) => "NEGATIVE_PRICE",
            Self::InvalidDiscount(_) => "INVALID_DISCOUNT",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::Overpayment { .. } => "OVERPAYMENT",
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::InvalidStatus { .. } | InvoiceError::Overpayment { .. } => {
                Self::BusinessRule(err.to_string())
            }
            _ => Self::validation(err.to_string()),
        }
    }
}
