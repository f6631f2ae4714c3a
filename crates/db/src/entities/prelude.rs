//! Entity re-exports.

pub use super::account_types::Entity as AccountTypes;
pub use super::accounts::Entity as Accounts;
pub use super::audit_log::Entity as AuditLog;
pub use super::bank_accounts::Entity as BankAccounts;
pub use super::bank_transactions::Entity as BankTransactions;
pub use super::company_settings::Entity as CompanySettings;
pub use super::configuration::Entity as Configuration;
pub use super::currencies::Entity as Currencies;
pub use super::customers::Entity as Customers;
pub use super::exchange_rates::Entity as ExchangeRates;
pub use super::fiscal_periods::Entity as FiscalPeriods;
pub use super::fiscal_years::Entity as FiscalYears;
pub use super::gst_returns::Entity as GstReturns;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::payment_allocations::Entity as PaymentAllocations;
pub use super::payments::Entity as Payments;
pub use super::products::Entity as Products;
pub use super::purchase_invoice_lines::Entity as PurchaseInvoiceLines;
pub use super::purchase_invoices::Entity as PurchaseInvoices;
pub use super::sales_invoice_lines::Entity as SalesInvoiceLines;
pub use super::sales_invoices::Entity as SalesInvoices;
pub use super::sequences::Entity as Sequences;
pub use super::tax_codes::Entity as TaxCodes;
pub use super::vendors::Entity as Vendors;
