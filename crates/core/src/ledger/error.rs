//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use sgbooks_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during journal operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Journal entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A line has neither a debit nor a credit.
    #[error("Line {0}: debit or credit amount is required")]
    ZeroAmount(usize),

    /// A line carries a negative amount.
    #[error("Line {0}: amounts cannot be negative")]
    NegativeAmount(usize),

    /// A line carries both a debit and a credit.
    #[error("Line {0}: a line cannot have both debit and credit amounts")]
    BothSides(usize),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    // ========== State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Entry is already posted.
    #[error("Journal entry {0} is already posted")]
    AlreadyPosted(String),

    /// Only posted entries can be reversed.
    #[error("Journal entry {0} must be posted before it can be reversed")]
    NotPosted(String),

    /// Entry was already reversed.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(String),

    /// No open fiscal period covers the entry date.
    #[error("No open fiscal period covers {0}")]
    PeriodClosed(chrono::NaiveDate),
}

impl LedgerError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::BothSides(_) => "BOTH_SIDES",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::InsufficientLines
            | LedgerError::Unbalanced { .. }
            | LedgerError::ZeroAmount(_)
            | LedgerError::NegativeAmount(_)
            | LedgerError::BothSides(_) => Self::validation(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
