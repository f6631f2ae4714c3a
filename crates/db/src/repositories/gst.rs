//! GST return repository.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use sgbooks_core::gst::{GstError, GstReturnData};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{gst_returns, sea_orm_active_enums::GstReturnStatus}};

/// Error types for GST return persistence.
#[derive(Debug, thiserror::Error)]
pub enum GstRepoError {
    /// A GST rule was violated.
    #[error(transparent)]
    Rule(#[from] GstError),

    /// Return not found.
    #[error("GST return not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<GstRepoError> for AppError {
    fn from(err: GstRepoError) -> Self {
        match err {
            GstRepoError::Rule(rule) => rule.into(),
            GstRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            GstRepoError::Database(db) => super::db_error(db),
        }
    }
}

impl From<&gst_returns::Model> for GstReturnData {
    fn from(row: &gst_returns::Model) -> Self {
        Self {
            return_period: row.return_period.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            filing_due_date: row.filing_due_date,
            standard_rated_supplies: row.standard_rated_supplies,
            zero_rated_supplies: row.zero_rated_supplies,
            exempt_supplies: row.exempt_supplies,
            total_supplies: row.total_supplies,
            taxable_purchases: row.taxable_purchases,
            output_tax: row.output_tax,
            input_tax: row.input_tax,
            tax_adjustments: row.tax_adjustments,
            tax_payable: row.tax_payable,
        }
    }
}

/// GST return repository.
#[derive(Debug, Clone)]
pub struct GstReturnRepository {
    db: DbConn,
}

impl GstReturnRepository {
    /// Creates a new GST return repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Saves computed figures as a draft return.
    ///
    /// A draft already stored for the same period is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft` if the period has already been filed, or an error
    /// if a write fails.
    pub async fn save_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        data: &GstReturnData,
        notes: Option<String>,
    ) -> Result<gst_returns::Model, GstRepoError> {
        let existing = gst_returns::Entity::find()
            .filter(gst_returns::Column::ReturnPeriod.eq(&data.return_period))
            .filter(gst_returns::Column::StartDate.eq(data.start_date))
            .filter(gst_returns::Column::EndDate.eq(data.end_date))
            .one(conn)
            .await?;

        let now = chrono::Utc::now().into();
        let is_new = existing.is_none();
        let mut active = match existing {
            Some(row) if row.status != GstReturnStatus::Draft => {
                return Err(GstError::NotDraft(row.status.into()).into());
            }
            Some(row) => row.into(),
            None => gst_returns::ActiveModel {
                id: Set(Uuid::now_v7()),
                return_period: Set(data.return_period.clone()),
                start_date: Set(data.start_date),
                end_date: Set(data.end_date),
                status: Set(GstReturnStatus::Draft),
                submission_date: Set(None),
                submission_reference: Set(None),
                journal_entry_id: Set(None),
                created_at: Set(now),
                ..Default::default()
            },
        };

        active.filing_due_date = Set(data.filing_due_date);
        active.standard_rated_supplies = Set(data.standard_rated_supplies);
        active.zero_rated_supplies = Set(data.zero_rated_supplies);
        active.exempt_supplies = Set(data.exempt_supplies);
        active.total_supplies = Set(data.total_supplies);
        active.taxable_purchases = Set(data.taxable_purchases);
        active.output_tax = Set(data.output_tax);
        active.input_tax = Set(data.input_tax);
        active.tax_adjustments = Set(data.tax_adjustments);
        active.tax_payable = Set(data.tax_payable);
        active.notes = Set(notes);
        active.updated_at = Set(now);

        let saved = if is_new {
            active.insert(conn).await?
        } else {
            active.update(conn).await?
        };
        tracing::info!(
            return_id = %saved.id,
            period = %saved.return_period,
            payable = %saved.tax_payable,
            "GST return draft saved"
        );
        Ok(saved)
    }

    /// Loads a return or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the return is missing or the query fails.
    pub async fn require<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<gst_returns::Model, GstRepoError> {
        gst_returns::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(GstRepoError::NotFound(id))
    }

    /// Marks a draft return submitted and links its settlement entry, if any.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft` if the return was already filed.
    pub async fn mark_submitted<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        submission_date: NaiveDate,
        reference: String,
        journal_entry_id: Option<Uuid>,
    ) -> Result<gst_returns::Model, GstRepoError> {
        let row = self.require(conn, id).await?;
        if row.status != GstReturnStatus::Draft {
            return Err(GstError::NotDraft(row.status.into()).into());
        }

        let mut active: gst_returns::ActiveModel = row.into();
        active.status = Set(GstReturnStatus::Submitted);
        active.submission_date = Set(Some(submission_date));
        active.submission_reference = Set(Some(reference));
        active.journal_entry_id = Set(journal_entry_id);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;

        tracing::info!(return_id = %updated.id, period = %updated.return_period, "GST return submitted");
        Ok(updated)
    }

    /// Lists returns, latest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<gst_returns::Model>, GstRepoError> {
        Ok(gst_returns::Entity::find()
            .order_by_desc(gst_returns::Column::StartDate)
            .all(self.db.as_ref())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use sgbooks_core::gst::GstReturnStatus as CoreStatus;

    fn row(status: GstReturnStatus) -> gst_returns::Model {
        let now = chrono::Utc::now().into();
        gst_returns::Model {
            id: Uuid::now_v7(),
            return_period: "2026-Q1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            filing_due_date: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            standard_rated_supplies: dec!(10000),
            zero_rated_supplies: dec!(2000),
            exempt_supplies: Decimal::ZERO,
            total_supplies: dec!(12000),
            taxable_purchases: dec!(4000),
            output_tax: dec!(900),
            input_tax: dec!(360),
            tax_adjustments: Decimal::ZERO,
            tax_payable: dec!(540),
            status,
            submission_date: None,
            submission_reference: None,
            journal_entry_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_to_return_data() {
        let data = GstReturnData::from(&row(GstReturnStatus::Draft));
        assert_eq!(data.return_period, "2026-Q1");
        assert_eq!(data.tax_payable, dec!(540));
        assert_eq!(data.total_supplies, dec!(12000));
    }

    #[tokio::test]
    async fn test_save_rejects_filed_period() {
        let filed = row(GstReturnStatus::Submitted);
        let data = GstReturnData::from(&filed);
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![filed]])
            .into_connection());
        let repo = GstReturnRepository::new(db.clone());
        let result = repo.save_draft(db.as_ref(), &data, None).await;
        assert!(matches!(
            result,
            Err(GstRepoError::Rule(GstError::NotDraft(CoreStatus::Submitted)))
        ));
    }

    #[tokio::test]
    async fn test_mark_submitted_requires_draft() {
        let filed = row(GstReturnStatus::Submitted);
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![filed.clone()]])
            .into_connection());
        let repo = GstReturnRepository::new(db.clone());
        let result = repo
            .mark_submitted(
                db.as_ref(),
                filed.id,
                NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
                "F5-123".to_string(),
                Some(Uuid::now_v7()),
            )
            .await;
        assert!(matches!(result, Err(GstRepoError::Rule(GstError::NotDraft(_)))));
    }

    #[tokio::test]
    async fn test_mark_submitted_updates_status() {
        let draft = row(GstReturnStatus::Draft);
        let mut submitted = draft.clone();
        submitted.status = GstReturnStatus::Submitted;
        submitted.submission_reference = Some("F5-123".to_string());
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![draft.clone()]])
            .append_query_results([vec![submitted]])
            .into_connection());
        let repo = GstReturnRepository::new(db.clone());
        let updated = repo
            .mark_submitted(
                db.as_ref(),
                draft.id,
                NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
                "F5-123".to_string(),
                Some(Uuid::now_v7()),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, GstReturnStatus::Submitted);
        assert_eq!(updated.submission_reference.as_deref(), Some("F5-123"));
    }
}
