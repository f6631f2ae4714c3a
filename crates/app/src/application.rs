//! The application core: one instance of every manager over a shared pool.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sgbooks_db::{AccountTypeRepository, DbConn};
use sgbooks_shared::{AppConfig, AppResult};

use crate::managers::{
    BankAccountManager, BankTransactionManager, ChartOfAccountsManager, CompanySettingsManager,
    CurrencyManager, CustomerManager, FiscalPeriodManager, GstManager, JournalEntryManager,
    PaymentManager, ProductManager, PurchaseInvoiceManager, SalesInvoiceManager,
    SequenceGenerator, TaxCodeManager, VendorManager,
};
use crate::statements::FinancialStatementGenerator;

/// Application state handed to the UI or CLI.
///
/// Cloning is cheap: every manager holds a clone of the same connection
/// pool, and the account-type cache is shared by the managers that read
/// natural balance sides.
#[derive(Debug, Clone)]
pub struct ApplicationCore {
    /// Database connection pool.
    pub db: DbConn,
    /// Chart of accounts.
    pub accounts: ChartOfAccountsManager,
    /// Journal entries.
    pub journals: JournalEntryManager,
    /// Fiscal years and periods.
    pub fiscal: FiscalPeriodManager,
    /// Currencies and exchange rates.
    pub currencies: CurrencyManager,
    /// Tax codes.
    pub tax_codes: TaxCodeManager,
    /// Customers.
    pub customers: CustomerManager,
    /// Vendors.
    pub vendors: VendorManager,
    /// Products and services.
    pub products: ProductManager,
    /// Sales invoices.
    pub sales_invoices: SalesInvoiceManager,
    /// Purchase invoices.
    pub purchase_invoices: PurchaseInvoiceManager,
    /// Bank accounts.
    pub bank_accounts: BankAccountManager,
    /// Bank transactions.
    pub bank_transactions: BankTransactionManager,
    /// Receipts and payments.
    pub payments: PaymentManager,
    /// Document numbers.
    pub sequences: SequenceGenerator,
    /// GST returns.
    pub gst: GstManager,
    /// Company settings.
    pub settings: CompanySettingsManager,
    /// Financial statements.
    pub statements: FinancialStatementGenerator,
}

impl ApplicationCore {
    /// Wires every manager to `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let db: DbConn = Arc::new(db);
        let account_types = AccountTypeRepository::new(db.clone());
        Self {
            accounts: ChartOfAccountsManager::new(db.clone(), account_types.clone()),
            journals: JournalEntryManager::new(db.clone()),
            fiscal: FiscalPeriodManager::new(db.clone()),
            currencies: CurrencyManager::new(db.clone()),
            tax_codes: TaxCodeManager::new(db.clone()),
            customers: CustomerManager::new(db.clone()),
            vendors: VendorManager::new(db.clone()),
            products: ProductManager::new(db.clone()),
            sales_invoices: SalesInvoiceManager::new(db.clone()),
            purchase_invoices: PurchaseInvoiceManager::new(db.clone()),
            bank_accounts: BankAccountManager::new(db.clone()),
            bank_transactions: BankTransactionManager::new(db.clone()),
            payments: PaymentManager::new(db.clone()),
            sequences: SequenceGenerator::new(db.clone()),
            gst: GstManager::new(db.clone(), account_types.clone()),
            settings: CompanySettingsManager::new(db.clone()),
            statements: FinancialStatementGenerator::new(db.clone(), account_types),
            db,
        }
    }

    /// Connects using the `[database]` section and wires the managers.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let db = sgbooks_db::connect(&config.database)
            .await
            .map_err(sgbooks_db::db_error)?;
        tracing::info!("Application core ready");
        Ok(Self::new(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_core_wires_without_touching_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let core = ApplicationCore::new(db);
        let cloned = core.clone();
        assert!(format!("{cloned:?}").contains("ApplicationCore"));
        assert!(Arc::ptr_eq(&core.db, &cloned.db));
    }
}
