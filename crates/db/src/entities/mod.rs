//! `SeaORM` entity definitions.
//!
//! Tables live in four PostgreSQL schemas: `core`, `accounting`,
//! `business` and `audit`.

pub mod prelude;
pub mod sea_orm_active_enums;

// core
pub mod company_settings;
pub mod configuration;
pub mod sequences;

// accounting
pub mod account_types;
pub mod accounts;
pub mod currencies;
pub mod exchange_rates;
pub mod fiscal_periods;
pub mod fiscal_years;
pub mod gst_returns;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod tax_codes;

// business
pub mod bank_accounts;
pub mod bank_transactions;
pub mod customers;
pub mod payment_allocations;
pub mod payments;
pub mod products;
pub mod purchase_invoice_lines;
pub mod purchase_invoices;
pub mod sales_invoice_lines;
pub mod sales_invoices;
pub mod vendors;

// audit
pub mod audit_log;
