//! Document-number sequences.
//!
//! `next_number` locks the sequence row (`SELECT ... FOR UPDATE`) inside the
//! caller's transaction, so two writers can never receive the same value.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set,
};
use sgbooks_core::sequence::{SequenceError, SequenceState};
use sgbooks_shared::AppError;

use crate::entities::sequences;

/// Well-known sequence names.
pub mod names {
    /// Journal entry numbers.
    pub const JOURNAL_ENTRY: &str = "journal_entry";
    /// Sales invoice numbers.
    pub const SALES_INVOICE: &str = "sales_invoice";
    /// Purchase invoice numbers.
    pub const PURCHASE_INVOICE: &str = "purchase_invoice";
    /// Payment numbers.
    pub const PAYMENT: &str = "payment";
}

/// Error types for sequence operations.
#[derive(Debug, thiserror::Error)]
pub enum SequenceRepoError {
    /// No sequence row with that name.
    #[error("Sequence '{0}' not found")]
    NotFound(String),

    /// Counter or template problem.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SequenceRepoError> for AppError {
    fn from(err: SequenceRepoError) -> Self {
        match err {
            SequenceRepoError::NotFound(_) => Self::Config(err.to_string()),
            SequenceRepoError::Sequence(inner) => inner.into(),
            SequenceRepoError::Database(db) => super::db_error(db),
        }
    }
}

impl From<sequences::Model> for SequenceState {
    fn from(row: sequences::Model) -> Self {
        Self {
            name: row.sequence_name,
            prefix: row.prefix,
            suffix: row.suffix,
            next_value: row.next_value,
            increment_by: row.increment_by,
            min_value: row.min_value,
            max_value: row.max_value,
            cycle: row.cycle,
            format_template: row.format_template,
        }
    }
}

/// Sequence repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRepository;

impl SequenceRepository {
    /// Creates a new sequence repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hands out the next formatted number of a sequence.
    ///
    /// Must be called inside a transaction; the row lock is held until the
    /// caller commits or rolls back.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is missing or exhausted.
    pub async fn next_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<String, SequenceRepoError> {
        let row = sequences::Entity::find()
            .filter(sequences::Column::SequenceName.eq(name))
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| SequenceRepoError::NotFound(name.to_string()))?;

        let mut active: sequences::ActiveModel = row.clone().into();
        let (formatted, next_value) = SequenceState::from(row).advance()?;

        active.next_value = Set(next_value);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;

        tracing::debug!(sequence = name, number = %formatted, "Sequence advanced");
        Ok(formatted)
    }

    /// Returns every sequence row, for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<sequences::Model>, DbErr> {
        sequences::Entity::find().all(conn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn invoice_sequence(next_value: i64) -> sequences::Model {
        sequences::Model {
            id: Uuid::now_v7(),
            sequence_name: names::SALES_INVOICE.to_string(),
            prefix: "INV-".to_string(),
            suffix: String::new(),
            next_value,
            increment_by: 1,
            min_value: 1,
            max_value: 999_999,
            cycle: false,
            format_template: "{PREFIX}{VALUE:06}".to_string(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_next_number_formats_and_advances() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice_sequence(42)]])
            .append_query_results([vec![invoice_sequence(43)]])
            .into_connection();

        let number = SequenceRepository::new()
            .next_number(&db, names::SALES_INVOICE)
            .await
            .unwrap();
        assert_eq!(number, "INV-000042");

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[0]).contains("FOR UPDATE"));
    }

    #[tokio::test]
    async fn test_missing_sequence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sequences::Model>::new()])
            .into_connection();

        let result = SequenceRepository::new().next_number(&db, "nope").await;
        assert!(matches!(result, Err(SequenceRepoError::NotFound(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn test_exhausted_sequence() {
        let mut row = invoice_sequence(1_000_000);
        row.max_value = 999_999;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        let result = SequenceRepository::new()
            .next_number(&db, names::SALES_INVOICE)
            .await;
        assert!(matches!(
            result,
            Err(SequenceRepoError::Sequence(SequenceError::Exhausted(_)))
        ));
    }
}
