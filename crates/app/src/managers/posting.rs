//! Journal entry creation shared by every manager that books to the ledger.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait};
use sgbooks_core::{
    fiscal::FiscalError,
    ledger::{JournalLineInput, JournalType, LedgerError, validate_journal_lines, validate_line_accounts},
};
use sgbooks_db::{
    DbConn,
    AccountRepository, FiscalRepository, JournalEntryWithLines, JournalRepository, NewJournalEntry,
    SequenceRepository,
    entities::{
        accounts, fiscal_periods, journal_entries,
        sea_orm_active_enums::{AuditAction, FiscalPeriodStatus},
    },
    sequence_names,
};
use sgbooks_shared::{AppError, AppResult};
use uuid::Uuid;

use super::audit;

/// Header fields of an entry about to be stored.
#[derive(Debug, Clone)]
pub(crate) struct EntryHeader {
    pub journal_type: JournalType,
    pub entry_date: NaiveDate,
    pub description: String,
    pub reference: Option<String>,
    /// Originating document kind and id.
    pub source: Option<(&'static str, Uuid)>,
}

/// Validates, numbers and stores journal entries.
#[derive(Debug, Clone)]
pub(crate) struct JournalPoster {
    pub journals: JournalRepository,
    accounts: AccountRepository,
    fiscal: FiscalRepository,
    sequences: SequenceRepository,
}

impl JournalPoster {
    pub(crate) fn new(db: &DbConn) -> Self {
        Self {
            journals: JournalRepository::new(db.clone()),
            accounts: AccountRepository::new(db.clone()),
            fiscal: FiscalRepository::new(db.clone()),
            sequences: SequenceRepository::new(),
        }
    }

    /// Runs every ledger check and returns the open period covering `date`.
    pub(crate) async fn check<C: ConnectionTrait>(
        &self,
        conn: &C,
        date: NaiveDate,
        lines: &[JournalLineInput],
    ) -> AppResult<fiscal_periods::Model> {
        validate_journal_lines(lines)?;
        let period = self.open_period(conn, date).await?;

        let ids: Vec<Uuid> = lines.iter().map(|l| l.account_id.into_inner()).collect();
        let accounts = self.accounts.posting_info(conn, &ids).await?;
        validate_line_accounts(lines, &accounts)?;
        Ok(period)
    }

    /// Finds the period covering `date` and insists it is open.
    pub(crate) async fn open_period<C: ConnectionTrait>(
        &self,
        conn: &C,
        date: NaiveDate,
    ) -> AppResult<fiscal_periods::Model> {
        let period = self
            .fiscal
            .find_period_for_date(conn, date)
            .await?
            .ok_or(FiscalError::NoPeriodForDate(date))?;
        if period.status != FiscalPeriodStatus::Open {
            tracing::warn!(%date, period = %period.name, "Posting refused: period not open");
            return Err(LedgerError::PeriodClosed(date).into());
        }
        Ok(period)
    }

    /// Stores a checked draft under the next journal number.
    pub(crate) async fn insert_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        header: EntryHeader,
        lines: &[JournalLineInput],
    ) -> AppResult<JournalEntryWithLines> {
        let period = self.check(conn, header.entry_date, lines).await?;
        let entry_no = self
            .sequences
            .next_number(conn, sequence_names::JOURNAL_ENTRY)
            .await?;

        let entry = NewJournalEntry {
            entry_no,
            journal_type: header.journal_type,
            entry_date: header.entry_date,
            fiscal_period_id: period.id,
            description: header.description,
            reference: header.reference,
            source_type: header.source.map(|(kind, _)| kind.to_string()),
            source_id: header.source.map(|(_, id)| id),
        };
        Ok(self.journals.insert_draft(conn, entry, lines).await?)
    }

    /// Creates and immediately posts an entry.
    pub(crate) async fn post_new<C: ConnectionTrait>(
        &self,
        conn: &C,
        header: EntryHeader,
        lines: &[JournalLineInput],
    ) -> AppResult<journal_entries::Model> {
        let draft = self.insert_draft(conn, header, lines).await?;
        let posted = self.journals.mark_posted(conn, draft.entry.id).await?;
        audit(conn, "journal_entry", posted.id, AuditAction::Post, Some(&posted)).await?;

        tracing::info!(
            entry_no = %posted.entry_no,
            source = ?posted.source_type,
            "Journal entry posted"
        );
        Ok(posted)
    }

    /// Draws the next number of a document sequence.
    pub(crate) async fn next_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        sequence_name: &str,
    ) -> AppResult<String> {
        Ok(self.sequences.next_number(conn, sequence_name).await?)
    }

    /// Id of the account with `code`, if it exists.
    pub(crate) async fn find_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
    ) -> AppResult<Option<Uuid>> {
        Ok(self
            .accounts
            .find_by_code(conn, code)
            .await?
            .map(|account| account.id))
    }

    /// Looks up a system account by code.
    pub(crate) async fn account_by_code<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
        missing: impl FnOnce() -> AppError,
    ) -> AppResult<accounts::Model> {
        self.accounts
            .find_by_code(conn, code)
            .await?
            .ok_or_else(missing)
    }
}
