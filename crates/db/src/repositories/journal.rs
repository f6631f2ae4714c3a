//! Journal repository for journal entry persistence.
//!
//! Entries are always written as drafts first and flipped to posted in a
//! separate update, because the database refuses line changes on posted
//! entries and checks the balance at the moment of posting.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use sgbooks_core::ledger::{JournalLineInput, JournalType, LedgerError};
use sgbooks_shared::{AppError, types::AccountId};
use uuid::Uuid;

use crate::{DbConn, entities::{journal_entries, journal_entry_lines, sea_orm_active_enums}};

/// Error types for journal persistence.
#[derive(Debug, thiserror::Error)]
pub enum JournalRepoError {
    /// A ledger rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalRepoError> for AppError {
    fn from(err: JournalRepoError) -> Self {
        match err {
            JournalRepoError::Ledger(ledger) => ledger.into(),
            JournalRepoError::Database(db) => super::db_error(db),
        }
    }
}

/// A journal entry header ready to be stored.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Number from the `journal_entry` sequence.
    pub entry_no: String,
    /// Journal classification.
    pub journal_type: JournalType,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Period covering `entry_date`.
    pub fiscal_period_id: Uuid,
    /// Description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Originating document type (e.g. "SalesInvoice").
    pub source_type: Option<String>,
    /// Originating document ID.
    pub source_id: Option<Uuid>,
}

/// Header fields that may change on a draft.
#[derive(Debug, Clone)]
pub struct DraftChanges {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Period covering `entry_date`.
    pub fiscal_period_id: Uuid,
    /// Description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
}

/// Journal entry header with its lines.
#[derive(Debug, Clone)]
pub struct JournalEntryWithLines {
    /// The header.
    pub entry: journal_entries::Model,
    /// Lines ordered by line number.
    pub lines: Vec<journal_entry_lines::Model>,
}

impl JournalEntryWithLines {
    /// Converts the stored lines back into domain inputs.
    #[must_use]
    pub fn line_inputs(&self) -> Vec<JournalLineInput> {
        self.lines.iter().map(line_input).collect()
    }
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Earliest entry date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest entry date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Posted state.
    pub is_posted: Option<bool>,
    /// Journal classification.
    pub journal_type: Option<JournalType>,
    /// Entries touching this account.
    pub account_id: Option<Uuid>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DbConn,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Stores a draft entry with its lines.
    ///
    /// Lines must already be validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn insert_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        header: NewJournalEntry,
        lines: &[JournalLineInput],
    ) -> Result<JournalEntryWithLines, JournalRepoError> {
        let now = chrono::Utc::now().into();
        let entry = journal_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_no: Set(header.entry_no),
            journal_type: Set(sea_orm_active_enums::JournalType::from(header.journal_type)),
            entry_date: Set(header.entry_date),
            fiscal_period_id: Set(header.fiscal_period_id),
            description: Set(header.description),
            reference: Set(header.reference),
            is_posted: Set(false),
            posted_at: Set(None),
            is_reversed: Set(false),
            reversing_entry_id: Set(None),
            source_type: Set(header.source_type),
            source_id: Set(header.source_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        let lines = insert_lines(conn, entry.id, lines).await?;
        tracing::debug!(entry_no = %entry.entry_no, lines = lines.len(), "Journal draft stored");
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Replaces the header fields and all lines of a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or already posted.
    pub async fn replace_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        changes: DraftChanges,
        lines: &[JournalLineInput],
    ) -> Result<JournalEntryWithLines, JournalRepoError> {
        let entry = find_draft(conn, id).await?;

        journal_entry_lines::Entity::delete_many()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(id))
            .exec(conn)
            .await?;

        let mut active: journal_entries::ActiveModel = entry.into();
        active.entry_date = Set(changes.entry_date);
        active.fiscal_period_id = Set(changes.fiscal_period_id);
        active.description = Set(changes.description);
        active.reference = Set(changes.reference);
        active.updated_at = Set(chrono::Utc::now().into());
        let entry = active.update(conn).await?;

        let lines = insert_lines(conn, entry.id, lines).await?;
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Deletes a draft entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or already posted.
    pub async fn delete_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<journal_entries::Model, JournalRepoError> {
        let entry = find_draft(conn, id).await?;
        entry.clone().delete(conn).await?;
        Ok(entry)
    }

    /// Marks a draft as posted.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or already posted.
    pub async fn mark_posted<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<journal_entries::Model, JournalRepoError> {
        let entry = find_draft(conn, id).await?;
        let now = chrono::Utc::now().into();

        let mut active: journal_entries::ActiveModel = entry.into();
        active.is_posted = Set(true);
        active.posted_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(conn).await?)
    }

    /// Flags a posted entry as reversed by `reversing_entry_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, not posted, or already reversed.
    pub async fn mark_reversed<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        reversing_entry_id: Uuid,
    ) -> Result<journal_entries::Model, JournalRepoError> {
        let entry = journal_entries::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))?;
        ensure_reversible(&entry)?;

        let mut active: journal_entries::ActiveModel = entry.into();
        active.is_reversed = Set(true);
        active.reversing_entry_id = Set(Some(reversing_entry_id));
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(conn).await?)
    }

    /// Loads an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<JournalEntryWithLines>, JournalRepoError> {
        let Some(entry) = journal_entries::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let lines = entry
            .find_related(journal_entry_lines::Entity)
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(conn)
            .await?;
        Ok(Some(JournalEntryWithLines { entry, lines }))
    }

    /// Lists entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: JournalFilter,
    ) -> Result<Vec<journal_entries::Model>, JournalRepoError> {
        let mut query = journal_entries::Entity::find()
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::EntryNo);

        if let Some(start) = filter.start_date {
            query = query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(journal_entries::Column::EntryDate.lte(end));
        }
        if let Some(is_posted) = filter.is_posted {
            query = query.filter(journal_entries::Column::IsPosted.eq(is_posted));
        }
        if let Some(journal_type) = filter.journal_type {
            query = query.filter(
                journal_entries::Column::JournalType
                    .eq(sea_orm_active_enums::JournalType::from(journal_type)),
            );
        }
        if let Some(account_id) = filter.account_id {
            query = query
                .join(
                    JoinType::InnerJoin,
                    journal_entries::Relation::JournalEntryLines.def(),
                )
                .filter(journal_entry_lines::Column::AccountId.eq(account_id))
                .distinct();
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(self.db.as_ref()).await?)
    }
}

/// Rejects entries that cannot be reversed.
pub(crate) fn ensure_reversible(entry: &journal_entries::Model) -> Result<(), LedgerError> {
    if !entry.is_posted {
        return Err(LedgerError::NotPosted(entry.entry_no.clone()));
    }
    if entry.is_reversed {
        return Err(LedgerError::AlreadyReversed(entry.entry_no.clone()));
    }
    Ok(())
}

fn line_input(line: &journal_entry_lines::Model) -> JournalLineInput {
    JournalLineInput {
        account_id: AccountId::from_uuid(line.account_id),
        description: line.description.clone(),
        debit_amount: line.debit_amount,
        credit_amount: line.credit_amount,
        currency_code: line.currency_code.clone(),
        exchange_rate: line.exchange_rate,
        tax_code: line.tax_code.clone(),
        tax_amount: line.tax_amount,
    }
}

async fn find_draft<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<journal_entries::Model, JournalRepoError> {
    let entry = journal_entries::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(LedgerError::EntryNotFound(id))?;
    if entry.is_posted {
        return Err(LedgerError::AlreadyPosted(entry.entry_no).into());
    }
    Ok(entry)
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
    lines: &[JournalLineInput],
) -> Result<Vec<journal_entry_lines::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());
    for (line_number, line) in (1..).zip(lines) {
        let model = journal_entry_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            journal_entry_id: Set(entry_id),
            line_number: Set(line_number),
            account_id: Set(line.account_id.into_inner()),
            description: Set(line.description.clone()),
            debit_amount: Set(line.debit_amount),
            credit_amount: Set(line.credit_amount),
            currency_code: Set(line.currency_code.clone()),
            exchange_rate: Set(line.exchange_rate),
            tax_code: Set(line.tax_code.clone()),
            tax_amount: Set(line.tax_amount),
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
