//! Repository abstractions for data access.
//!
//! Read methods run on the repository's own connection. Write methods take
//! any [`sea_orm::ConnectionTrait`] so a manager can run several of them in
//! one transaction.

pub mod account;
pub mod account_type;
pub mod audit;
pub mod banking;
pub mod currency;
pub mod customer;
pub mod fiscal;
pub mod gst;
pub mod invoice;
pub mod journal;
pub mod payment;
pub mod product;
pub mod purchase_invoice;
pub mod report;
pub mod sales_invoice;
pub mod sequence;
pub mod settings;
pub mod tax_code;
pub mod vendor;

use sea_orm::{DbErr, SqlErr};
use sgbooks_shared::AppError;

use crate::migration::RULE_PREFIX;

pub use account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use account_type::AccountTypeRepository;
pub use audit::AuditRepository;
pub use banking::{
    BankTransactionFilter, BankingError, BankingRepository, CreateBankAccountInput,
    NewBankTransaction, signed_amount,
};
pub use currency::{CurrencyError, CurrencyRepository};
pub use customer::{CustomerError, CustomerInput, CustomerRepository, PartyDetails};
pub use fiscal::{CreateFiscalYearInput, FiscalRepoError, FiscalRepository, FiscalYearWithPeriods};
pub use gst::{GstRepoError, GstReturnRepository};
pub use invoice::{InvoiceFilter, InvoiceHeader, InvoiceLineRecord, InvoiceRepoError};
pub use journal::{
    DraftChanges, JournalEntryWithLines, JournalFilter, JournalRepoError, JournalRepository,
    NewJournalEntry,
};
pub use payment::{
    NewAllocation, NewPayment, PaymentFilter, PaymentRepoError, PaymentRepository,
    PaymentWithAllocations,
};
pub use product::{ProductError, ProductInput, ProductRepository};
pub use purchase_invoice::{PurchaseInvoiceRepository, PurchaseInvoiceWithLines};
pub use report::{LedgerData, LineTotals, ReportQueryError, ReportRepository};
pub use sales_invoice::{SalesInvoiceRepository, SalesInvoiceWithLines};
pub use sequence::{SequenceRepoError, SequenceRepository, names as sequence_names};
pub use settings::{DEFAULT_BASE_CURRENCY, SettingsRepository, UpdateCompanySettingsInput};
pub use tax_code::{CreateTaxCodeInput, TaxCodeError, TaxCodeRepository};
pub use vendor::{VendorBankDetails, VendorError, VendorInput, VendorRepository};

/// Maps a database error onto the application error.
///
/// Unique and foreign-key violations become conflicts and rule violations;
/// exceptions raised by the ledger triggers surface as business-rule errors
/// with their message intact.
#[must_use]
pub fn db_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return AppError::Conflict(format!("Duplicate value: {detail}"));
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return AppError::BusinessRule(format!("Referenced record constraint: {detail}"));
        }
        _ => {}
    }

    if let DbErr::RecordNotFound(what) = &err {
        return AppError::NotFound(what.clone());
    }

    let text = err.to_string();
    if let Some((_, rule)) = text.split_once(RULE_PREFIX) {
        tracing::warn!(rule, "Rejected by ledger rule");
        return AppError::BusinessRule(rule.trim().to_string());
    }

    tracing::error!(error = %text, "Database error");
    AppError::Database(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_message_becomes_business_rule() {
        let err = DbErr::Custom(
            "error returned from database: ledger rule: Cannot post to a Closed fiscal period"
                .to_string(),
        );
        let app = db_error(err);
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");
        assert_eq!(
            app.messages(),
            vec!["Cannot post to a Closed fiscal period".to_string()]
        );
    }

    #[test]
    fn test_record_not_found() {
        let app = db_error(DbErr::RecordNotFound("journal entry".to_string()));
        assert_eq!(app.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_other_errors_are_database_errors() {
        let app = db_error(DbErr::Custom("connection reset".to_string()));
        assert_eq!(app.error_code(), "DATABASE_ERROR");
        assert!(!app.is_user_error());
    }
}
