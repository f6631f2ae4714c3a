//! Report repository: the read side feeding statement generation.
//!
//! Every query here touches posted journal lines only. Balances come back
//! raw (debit-positive); natural-side normalization happens in the core
//! report service using the side resolved from the account-type table.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use sgbooks_core::{
    gst::TaxableLine,
    reports::{AccountSnapshot, LedgerAccount, LedgerPosting},
};
use sgbooks_shared::{
    AppError,
    types::{AccountId, JournalEntryId},
};
use uuid::Uuid;

use super::{account::opening_applies, account_type::AccountTypeRepository};
use crate::{DbConn, entities::{accounts, journal_entries, journal_entry_lines}};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportQueryError> for AppError {
    fn from(err: ReportQueryError) -> Self {
        match err {
            ReportQueryError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportQueryError::Database(db) => super::db_error(db),
        }
    }
}

/// Debit and credit totals of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl LineTotals {
    /// Debits minus credits.
    #[must_use]
    pub fn net(self) -> Decimal {
        self.debit - self.credit
    }
}

/// Date window applied to posted lines.
#[derive(Debug, Clone, Copy)]
enum Window {
    Through(NaiveDate),
    Before(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

/// General Ledger source data for one account.
#[derive(Debug, Clone)]
pub struct LedgerData {
    /// Account header.
    pub account: LedgerAccount,
    /// Raw balance before the range (opening balance plus earlier activity).
    pub opening_balance: Decimal,
    /// Posted lines in the range.
    pub postings: Vec<LedgerPosting>,
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DbConn,
    account_types: AccountTypeRepository,
}

impl ReportRepository {
    /// Creates a report repository sharing an account-type cache.
    #[must_use]
    pub const fn new(db: DbConn, account_types: AccountTypeRepository) -> Self {
        Self { db, account_types }
    }

    /// Cumulative raw balances of every active account as of a date.
    ///
    /// Includes each opening balance effective on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn balances_as_of(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountSnapshot>, ReportQueryError> {
        let accounts = self.active_accounts().await?;
        let totals = self.totals_by_account(Window::Through(as_of)).await?;
        tracing::debug!(accounts = accounts.len(), %as_of, "Loaded balances");
        self.snapshots(accounts, &totals, Some(as_of)).await
    }

    /// Net activity of every active account within a period.
    ///
    /// Opening balances are not included.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn activity_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AccountSnapshot>, ReportQueryError> {
        let accounts = self.active_accounts().await?;
        let totals = self.totals_by_account(Window::Between(start, end)).await?;
        tracing::debug!(accounts = accounts.len(), %start, %end, "Loaded period activity");
        self.snapshots(accounts, &totals, None).await
    }

    /// Loads General Ledger source data for one account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account, or an error if a
    /// query fails.
    pub async fn ledger(
        &self,
        account_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<LedgerData, ReportQueryError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ReportQueryError::AccountNotFound(account_id))?;

        let before: LineTotals = self
            .totals_for(account_id, Window::Before(start))
            .await?;
        let opening_balance = ledger_opening(&account, start, before);

        let rows: Vec<(
            Uuid,
            String,
            NaiveDate,
            Option<String>,
            String,
            Option<String>,
            Decimal,
            Decimal,
        )> = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entries::Column::Id)
            .column(journal_entries::Column::EntryNo)
            .column(journal_entries::Column::EntryDate)
            .column(journal_entry_lines::Column::Description)
            .column_as(journal_entries::Column::Description, "entry_description")
            .column(journal_entries::Column::Reference)
            .column(journal_entry_lines::Column::DebitAmount)
            .column(journal_entry_lines::Column::CreditAmount)
            .join(
                JoinType::InnerJoin,
                journal_entry_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entry_lines::Column::AccountId.eq(account_id))
            .filter(journal_entries::Column::IsPosted.eq(true))
            .filter(journal_entries::Column::EntryDate.between(start, end))
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNo)
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        let mut postings: Vec<LedgerPosting> = rows
            .into_iter()
            .map(
                |(entry_id, entry_no, entry_date, line_desc, entry_desc, reference, debit, credit)| {
                    LedgerPosting {
                        entry_id: JournalEntryId::from_uuid(entry_id),
                        entry_no,
                        entry_date,
                        description: line_desc.or(Some(entry_desc)),
                        reference,
                        debit,
                        credit,
                    }
                },
            )
            .collect();
        postings.extend(opening_posting(&account, start, end));

        Ok(LedgerData {
            account: LedgerAccount {
                id: AccountId::from_uuid(account.id),
                code: account.code,
                name: account.name,
                category: account.account_type.into(),
            },
            opening_balance,
            postings,
        })
    }

    /// Posted lines carrying a tax code within a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn taxable_lines(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaxableLine>, ReportQueryError> {
        let rows: Vec<(
            crate::entities::sea_orm_active_enums::AccountCategory,
            String,
            Decimal,
            Decimal,
            Decimal,
        )> = journal_entry_lines::Entity::find()
            .select_only()
            .column(accounts::Column::AccountType)
            .column(journal_entry_lines::Column::TaxCode)
            .column(journal_entry_lines::Column::DebitAmount)
            .column(journal_entry_lines::Column::CreditAmount)
            .column(journal_entry_lines::Column::TaxAmount)
            .join(
                JoinType::InnerJoin,
                journal_entry_lines::Relation::JournalEntries.def(),
            )
            .join(JoinType::InnerJoin, journal_entry_lines::Relation::Accounts.def())
            .filter(journal_entries::Column::IsPosted.eq(true))
            .filter(journal_entries::Column::EntryDate.between(start, end))
            .filter(journal_entry_lines::Column::TaxCode.is_not_null())
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        tracing::debug!(count = rows.len(), %start, %end, "Loaded taxable lines");
        Ok(rows
            .into_iter()
            .map(
                |(category, tax_code, debit_amount, credit_amount, tax_amount)| TaxableLine {
                    account_category: category.into(),
                    tax_code,
                    debit_amount,
                    credit_amount,
                    tax_amount,
                },
            )
            .collect())
    }

    async fn active_accounts(&self) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(self.db.as_ref())
            .await
    }

    async fn totals_by_account(
        &self,
        window: Window,
    ) -> Result<HashMap<Uuid, LineTotals>, DbErr> {
        let query = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entry_lines::Column::AccountId)
            .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit")
            .column_as(journal_entry_lines::Column::CreditAmount.sum(), "credit")
            .join(
                JoinType::InnerJoin,
                journal_entry_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entries::Column::IsPosted.eq(true))
            .group_by(journal_entry_lines::Column::AccountId);

        let rows: Vec<(Uuid, Option<Decimal>, Option<Decimal>)> = apply_window(query, window)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, debit, credit)| {
                (
                    id,
                    LineTotals {
                        debit: debit.unwrap_or_default(),
                        credit: credit.unwrap_or_default(),
                    },
                )
            })
            .collect())
    }

    async fn totals_for(&self, account_id: Uuid, window: Window) -> Result<LineTotals, DbErr> {
        let query = journal_entry_lines::Entity::find()
            .select_only()
            .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit")
            .column_as(journal_entry_lines::Column::CreditAmount.sum(), "credit")
            .join(
                JoinType::InnerJoin,
                journal_entry_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entry_lines::Column::AccountId.eq(account_id))
            .filter(journal_entries::Column::IsPosted.eq(true));

        let row: Option<(Option<Decimal>, Option<Decimal>)> =
            apply_window(query, window).into_tuple().one(self.db.as_ref()).await?;
        let (debit, credit) = row.unwrap_or_default();
        Ok(LineTotals {
            debit: debit.unwrap_or_default(),
            credit: credit.unwrap_or_default(),
        })
    }

    async fn snapshots(
        &self,
        accounts: Vec<accounts::Model>,
        totals: &HashMap<Uuid, LineTotals>,
        opening_as_of: Option<NaiveDate>,
    ) -> Result<Vec<AccountSnapshot>, ReportQueryError> {
        let mut snapshots = Vec::with_capacity(accounts.len());
        for account in accounts {
            let category = account.account_type.into();
            let normal_balance = self
                .account_types
                .normal_balance(category, account.sub_type.as_deref())
                .await?;
            let activity = totals.get(&account.id).copied().unwrap_or_default();
            let raw_balance = snapshot_balance(&account, activity, opening_as_of);

            snapshots.push(AccountSnapshot {
                id: AccountId::from_uuid(account.id),
                code: account.code,
                name: account.name,
                category,
                sub_type: account.sub_type,
                normal_balance,
                raw_balance,
            });
        }
        Ok(snapshots)
    }
}

fn apply_window<Q: QueryFilter>(query: Q, window: Window) -> Q {
    match window {
        Window::Through(date) => query.filter(journal_entries::Column::EntryDate.lte(date)),
        Window::Before(date) => query.filter(journal_entries::Column::EntryDate.lt(date)),
        Window::Between(start, end) => {
            query.filter(journal_entries::Column::EntryDate.between(start, end))
        }
    }
}

/// Raw balance of a snapshot. With `opening_as_of` set, the opening balance
/// is added when it is effective on that date; period activity passes `None`.
pub(crate) fn snapshot_balance(
    account: &accounts::Model,
    activity: LineTotals,
    opening_as_of: Option<NaiveDate>,
) -> Decimal {
    match opening_as_of {
        Some(date) if opening_applies(account.opening_balance_date, Some(date)) => {
            account.opening_balance + activity.net()
        }
        _ => activity.net(),
    }
}

/// Raw balance carried into a General Ledger starting on `start`.
///
/// An opening balance dated on or before the start day is carried in. One
/// dated later in the range appears as a line from [`opening_posting`].
pub(crate) fn ledger_opening(account: &accounts::Model, start: NaiveDate, before: LineTotals) -> Decimal {
    if opening_applies(account.opening_balance_date, Some(start)) {
        account.opening_balance + before.net()
    } else {
        before.net()
    }
}

/// Line shown for an opening balance that takes effect inside the range.
///
/// The synthetic row has a nil entry ID and an empty entry number, so it
/// sorts ahead of real postings on the same day.
pub(crate) fn opening_posting(
    account: &accounts::Model,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<LedgerPosting> {
    let opening_date = account.opening_balance_date?;
    if opening_date <= start || opening_date > end || account.opening_balance.is_zero() {
        return None;
    }
    let amount = account.opening_balance;
    Some(LedgerPosting {
        entry_id: JournalEntryId::from_uuid(Uuid::nil()),
        entry_no: String::new(),
        entry_date: opening_date,
        description: Some(OPENING_BALANCE_LABEL.to_string()),
        reference: None,
        debit: amount.max(Decimal::ZERO),
        credit: (-amount).max(Decimal::ZERO),
    })
}

/// Description of the synthetic opening balance line.
pub const OPENING_BALANCE_LABEL: &str = "Opening Balance";

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
