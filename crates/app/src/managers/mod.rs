//! Managers: one application service per functional area.
//!
//! A manager validates its DTO, opens one database transaction, calls the
//! repositories with that transaction, writes an audit row and commits.
//! Every public method returns [`AppResult`], so a caller only ever sees
//! `AppError` and its human-readable messages.

mod accounts;
mod banking;
mod currency;
mod fiscal;
mod gst;
mod invoicing;
mod journal;
mod parties;
mod payments;
mod posting;
mod purchases;
mod sales;
mod sequence;
mod settings;
mod tax;

pub use accounts::{AccountNode, ChartOfAccountsManager};
pub use banking::{BankAccountManager, BankTransactionManager};
pub use currency::CurrencyManager;
pub use fiscal::FiscalPeriodManager;
pub use gst::GstManager;
pub use journal::JournalEntryManager;
pub use parties::{CustomerManager, ProductManager, VendorManager};
pub use payments::PaymentManager;
pub use purchases::PurchaseInvoiceManager;
pub use sales::SalesInvoiceManager;
pub use sequence::SequenceGenerator;
pub use settings::CompanySettingsManager;
pub use tax::TaxCodeManager;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use sgbooks_db::{AuditRepository, db_error, entities::sea_orm_active_enums::AuditAction};
use sgbooks_shared::AppResult;
use uuid::Uuid;

pub(crate) async fn begin(db: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    db.begin().await.map_err(db_error)
}

pub(crate) async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit().await.map_err(db_error)
}

/// Writes an audit row with a JSON snapshot of the affected record.
pub(crate) async fn audit<C, M>(
    conn: &C,
    entity_type: &str,
    entity_id: Uuid,
    action: AuditAction,
    snapshot: Option<&M>,
) -> AppResult<()>
where
    C: ConnectionTrait,
    M: Serialize,
{
    let changes = snapshot.and_then(|m| serde_json::to_value(m).ok());
    AuditRepository::new()
        .record(conn, entity_type, entity_id, action, changes)
        .await
        .map_err(db_error)
}
