//! Manual journal entries: draft, edit, post, reverse.

use chrono::NaiveDate;
use sgbooks_core::ledger::{LedgerError, reverse_lines, validate_journal_lines};
use sgbooks_db::{
    DbConn,
    DraftChanges, JournalEntryWithLines, JournalFilter,
    entities::{journal_entries, sea_orm_active_enums::AuditAction},
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::posting::{EntryHeader, JournalPoster};
use super::{audit, begin, commit};
use crate::dto::JournalEntryDto;

const ENTITY: &str = "journal_entry";

/// Manages manual journal entries.
#[derive(Debug, Clone)]
pub struct JournalEntryManager {
    db: DbConn,
    poster: JournalPoster,
}

impl JournalEntryManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        let poster = JournalPoster::new(&db);
        Self { db, poster }
    }

    /// Saves a new draft entry.
    ///
    /// The lines must already balance and every account must be active;
    /// the date must fall in an open period.
    #[instrument(skip(self, dto), fields(date = %dto.entry_date))]
    pub async fn create_entry(&self, dto: JournalEntryDto) -> AppResult<JournalEntryWithLines> {
        dto.validate()?;
        let lines = dto.line_inputs();

        let txn = begin(self.db.as_ref()).await?;
        let created = self
            .poster
            .insert_draft(
                &txn,
                EntryHeader {
                    journal_type: dto.journal_type,
                    entry_date: dto.entry_date,
                    description: dto.description,
                    reference: dto.reference,
                    source: None,
                },
                &lines,
            )
            .await?;
        audit(&txn, ENTITY, created.entry.id, AuditAction::Insert, Some(&created.entry)).await?;
        commit(txn).await?;

        tracing::info!(entry_no = %created.entry.entry_no, "Journal draft created");
        Ok(created)
    }

    /// Replaces the header and lines of a draft.
    #[instrument(skip(self, dto))]
    pub async fn update_entry(
        &self,
        id: Uuid,
        dto: JournalEntryDto,
    ) -> AppResult<JournalEntryWithLines> {
        dto.validate()?;
        let lines = dto.line_inputs();

        let txn = begin(self.db.as_ref()).await?;
        let period = self.poster.check(&txn, dto.entry_date, &lines).await?;
        let changes = DraftChanges {
            entry_date: dto.entry_date,
            fiscal_period_id: period.id,
            description: dto.description,
            reference: dto.reference,
        };
        let updated = self
            .poster
            .journals
            .replace_draft(&txn, id, changes, &lines)
            .await?;
        audit(&txn, ENTITY, id, AuditAction::Update, Some(&updated.entry)).await?;
        commit(txn).await?;

        tracing::info!(entry_no = %updated.entry.entry_no, "Journal draft updated");
        Ok(updated)
    }

    /// Deletes a draft. Posted entries can only be reversed.
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: Uuid) -> AppResult<()> {
        let txn = begin(self.db.as_ref()).await?;
        let deleted = self.poster.journals.delete_draft(&txn, id).await?;
        audit(&txn, ENTITY, id, AuditAction::Delete, Some(&deleted)).await?;
        commit(txn).await?;

        tracing::info!(entry_no = %deleted.entry_no, "Journal draft deleted");
        Ok(())
    }

    /// Posts a draft after re-checking balance, accounts and period.
    #[instrument(skip(self))]
    pub async fn post_entry(&self, id: Uuid) -> AppResult<journal_entries::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let entry = self
            .poster
            .journals
            .find_with_lines(&txn, id)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))?;
        if entry.entry.is_posted {
            return Err(LedgerError::AlreadyPosted(entry.entry.entry_no).into());
        }

        self.poster
            .check(&txn, entry.entry.entry_date, &entry.line_inputs())
            .await?;
        let posted = self.poster.journals.mark_posted(&txn, id).await?;
        audit(&txn, ENTITY, id, AuditAction::Post, Some(&posted)).await?;
        commit(txn).await?;

        tracing::info!(entry_no = %posted.entry_no, "Journal entry posted");
        Ok(posted)
    }

    /// Reverses a posted entry with a mirror-image entry dated `reversal_date`.
    ///
    /// Returns the new reversing entry.
    #[instrument(skip(self))]
    pub async fn reverse_entry(
        &self,
        id: Uuid,
        reversal_date: NaiveDate,
    ) -> AppResult<journal_entries::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let original = self
            .poster
            .journals
            .find_with_lines(&txn, id)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))?;
        if !original.entry.is_posted {
            return Err(LedgerError::NotPosted(original.entry.entry_no).into());
        }
        if original.entry.is_reversed {
            return Err(LedgerError::AlreadyReversed(original.entry.entry_no).into());
        }

        let lines = reverse_lines(&original.line_inputs());
        validate_journal_lines(&lines)?;
        let reversing = self
            .poster
            .post_new(
                &txn,
                EntryHeader {
                    journal_type: original.entry.journal_type.into(),
                    entry_date: reversal_date,
                    description: format!("Reversal of {}", original.entry.entry_no),
                    reference: Some(original.entry.entry_no.clone()),
                    source: Some((ENTITY, id)),
                },
                &lines,
            )
            .await?;
        let reversed = self
            .poster
            .journals
            .mark_reversed(&txn, id, reversing.id)
            .await?;
        audit(&txn, ENTITY, id, AuditAction::Reverse, Some(&reversed)).await?;
        commit(txn).await?;

        tracing::info!(
            entry_no = %reversed.entry_no,
            reversing_no = %reversing.entry_no,
            "Journal entry reversed"
        );
        Ok(reversing)
    }

    /// Loads an entry with its lines.
    pub async fn get_entry(&self, id: Uuid) -> AppResult<JournalEntryWithLines> {
        Ok(self
            .poster
            .journals
            .find_with_lines(self.db.as_ref(), id)
            .await?
            .ok_or(LedgerError::EntryNotFound(id))?)
    }

    /// Lists entry headers matching the filter, newest first.
    pub async fn list_entries(&self, filter: JournalFilter) -> AppResult<Vec<journal_entries::Model>> {
        Ok(self.poster.journals.list(filter).await?)
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
