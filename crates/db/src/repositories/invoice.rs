//! Types shared by the sales and purchase invoice repositories.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use sgbooks_core::invoice::{InvoiceError, InvoiceLineAmounts, InvoiceStatus, InvoiceTotals};
use sgbooks_shared::AppError;
use uuid::Uuid;

/// Error types for invoice persistence.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// An invoice rule was violated.
    #[error(transparent)]
    Rule(#[from] InvoiceError),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvoiceRepoError> for AppError {
    fn from(err: InvoiceRepoError) -> Self {
        match err {
            InvoiceRepoError::Rule(rule) => rule.into(),
            InvoiceRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            InvoiceRepoError::Database(db) => super::db_error(db),
        }
    }
}

/// Header values for a new or replaced draft invoice.
#[derive(Debug, Clone)]
pub struct InvoiceHeader {
    /// Customer or vendor.
    pub party_id: Uuid,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Currency.
    pub currency_code: String,
    /// Rate to base currency.
    pub exchange_rate: Decimal,
    /// Computed totals.
    pub totals: InvoiceTotals,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// A calculated invoice line ready to store.
#[derive(Debug, Clone)]
pub struct InvoiceLineRecord {
    /// Product, if the line came from the catalogue.
    pub product_id: Option<Uuid>,
    /// Revenue or expense account.
    pub account_id: Uuid,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price before discount.
    pub unit_price: Decimal,
    /// Discount percentage.
    pub discount_percent: Decimal,
    /// Tax code.
    pub tax_code: Option<String>,
    /// Computed amounts.
    pub amounts: InvoiceLineAmounts,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Customer or vendor.
    pub party_id: Option<Uuid>,
    /// Status.
    pub status: Option<InvoiceStatus>,
    /// Earliest invoice date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest invoice date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

/// Fails unless the invoice is still a draft.
pub(crate) fn ensure_draft(status: InvoiceStatus) -> Result<(), InvoiceError> {
    if status == InvoiceStatus::Draft {
        Ok(())
    } else {
        Err(InvoiceError::InvalidStatus {
            status,
            expected: "Draft",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InvoiceStatus::Approved)]
    #[case(InvoiceStatus::Paid)]
    #[case(InvoiceStatus::Voided)]
    fn test_only_drafts_are_editable(#[case] status: InvoiceStatus) {
        assert!(ensure_draft(InvoiceStatus::Draft).is_ok());
        assert!(matches!(
            ensure_draft(status),
            Err(InvoiceError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_rule_maps_to_business_rule() {
        let err: AppError = InvoiceRepoError::Rule(InvoiceError::InvalidStatus {
            status: InvoiceStatus::Paid,
            expected: "Draft",
        })
        .into();
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
    }
}
