//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use sgbooks_core::ledger::AccountPostingInfo;
use sgbooks_shared::{AppError, types::AccountId};
use uuid::Uuid;

use crate::{DbConn, entities::{
    account_types, accounts, journal_entries, journal_entry_lines,
    sea_orm_active_enums::AccountCategory,
}};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// An account cannot be its own parent.
    #[error("An account cannot be its own parent")]
    SelfParent,

    /// The sub-type does not exist in the account-type table.
    #[error("Unknown account sub-type '{0}'")]
    UnknownSubType(String),

    /// Sub-type belongs to a different category.
    #[error("Sub-type '{sub_type}' is not a {category:?} type")]
    SubTypeMismatch {
        /// Requested sub-type.
        sub_type: String,
        /// Account category.
        category: AccountCategory,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Cannot change account type because the account has journal lines.
    #[error("Cannot change account type: account has {0} journal lines")]
    HasJournalLines(u64),

    /// Cannot deactivate an account that still carries a balance.
    #[error("Cannot deactivate account {code}: balance is {balance}")]
    NonZeroBalance {
        /// Account code.
        code: String,
        /// Current raw balance.
        balance: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            AccountError::ParentNotFound(_) | AccountError::AccountNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            AccountError::SelfParent
            | AccountError::UnknownSubType(_)
            | AccountError::SubTypeMismatch { .. } => Self::validation(err.to_string()),
            AccountError::HasJournalLines(_) | AccountError::NonZeroBalance { .. } => {
                Self::BusinessRule(err.to_string())
            }
            AccountError::Database(db) => super::db_error(db),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Top-level category.
    pub account_type: AccountCategory,
    /// Name of an `account_types` row.
    pub sub_type: Option<String>,
    /// Parent account for the tree.
    pub parent_id: Option<Uuid>,
    /// Account description.
    pub description: Option<String>,
    /// Whether this is a control account (AR, AP, GST).
    pub is_control_account: bool,
    /// Whether this account backs a bank account.
    pub is_bank_account: bool,
    /// Whether GST applies to postings.
    pub gst_applicable: bool,
    /// Default tax treatment code.
    pub tax_treatment: Option<String>,
    /// Free-form reporting group.
    pub report_group: Option<String>,
    /// Signed, debit-positive opening balance.
    pub opening_balance: Decimal,
    /// Date the opening balance takes effect.
    pub opening_balance_date: Option<NaiveDate>,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account type (only if no journal lines).
    pub account_type: Option<AccountCategory>,
    /// Sub-type.
    pub sub_type: Option<Option<String>>,
    /// Parent account ID.
    pub parent_id: Option<Option<Uuid>>,
    /// Description.
    pub description: Option<Option<String>>,
    /// GST applicability.
    pub gst_applicable: Option<bool>,
    /// Tax treatment.
    pub tax_treatment: Option<Option<String>>,
    /// Reporting group.
    pub report_group: Option<Option<String>>,
    /// Opening balance.
    pub opening_balance: Option<Decimal>,
    /// Opening balance date.
    pub opening_balance_date: Option<Option<NaiveDate>>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountCategory>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent ID (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<Uuid>>,
    /// Case-insensitive match on code or name.
    pub search: Option<String>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DbConn,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account code already exists
    /// - Parent account does not exist
    /// - Sub-type is unknown or belongs to another category
    pub async fn create_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .one(conn)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            accounts::Entity::find_by_id(parent_id)
                .one(conn)
                .await?
                .ok_or(AccountError::ParentNotFound(parent_id))?;
        }

        if let Some(sub_type) = &input.sub_type {
            check_sub_type(conn, sub_type, input.account_type).await?;
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            sub_type: Set(input.sub_type),
            parent_id: Set(input.parent_id),
            description: Set(input.description),
            is_active: Set(true),
            is_control_account: Set(input.is_control_account),
            is_bank_account: Set(input.is_bank_account),
            gst_applicable: Set(input.gst_applicable),
            tax_treatment: Set(input.tax_treatment),
            report_group: Set(input.report_group),
            opening_balance: Set(input.opening_balance),
            opening_balance_date: Set(input.opening_balance_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(conn).await?;
        tracing::info!(account_id = %account.id, code = %account.code, "Account created");
        Ok(account)
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Account not found
    /// - Changing `account_type` while the account has journal lines
    /// - New code already exists
    /// - Parent or sub-type validation fails
    pub async fn update_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        if let Some(new_type) = input.account_type
            && new_type != account.account_type
        {
            let line_count = count_lines(conn, id).await?;
            if line_count > 0 {
                return Err(AccountError::HasJournalLines(line_count));
            }
        }

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::Code.eq(new_code))
                .filter(accounts::Column::Id.ne(id))
                .one(conn)
                .await?;
            if existing.is_some() {
                return Err(AccountError::DuplicateCode(new_code.clone()));
            }
        }

        if let Some(Some(parent_id)) = input.parent_id {
            if parent_id == id {
                return Err(AccountError::SelfParent);
            }
            accounts::Entity::find_by_id(parent_id)
                .one(conn)
                .await?
                .ok_or(AccountError::ParentNotFound(parent_id))?;
        }

        let category = input.account_type.unwrap_or(account.account_type);
        let sub_type = match &input.sub_type {
            Some(sub_type) => sub_type.clone(),
            None => account.sub_type.clone(),
        };
        if let Some(sub_type) = &sub_type {
            check_sub_type(conn, sub_type, category).await?;
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(sub_type) = input.sub_type {
            active.sub_type = Set(sub_type);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(gst_applicable) = input.gst_applicable {
            active.gst_applicable = Set(gst_applicable);
        }
        if let Some(tax_treatment) = input.tax_treatment {
            active.tax_treatment = Set(tax_treatment);
        }
        if let Some(report_group) = input.report_group {
            active.report_group = Set(report_group);
        }
        if let Some(opening_balance) = input.opening_balance {
            active.opening_balance = Set(opening_balance);
        }
        if let Some(opening_balance_date) = input.opening_balance_date {
            active.opening_balance_date = Set(opening_balance_date);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(conn).await?;
        tracing::info!(account_id = %updated.id, "Account updated");
        Ok(updated)
    }

    /// Soft-deactivates an account.
    ///
    /// Accounts that still carry a balance cannot be deactivated.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or has a non-zero balance.
    pub async fn deactivate_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let balance = raw_balance(conn, &account, None).await?;
        if !balance.is_zero() {
            return Err(AccountError::NonZeroBalance {
                code: account.code,
                balance,
            });
        }

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;

        tracing::info!(account_id = %updated.id, "Account deactivated");
        Ok(updated)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(conn)
            .await?)
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        if let Some(parent_id) = filter.parent_id {
            query = match parent_id {
                Some(pid) => query.filter(accounts::Column::ParentId.eq(pid)),
                None => query.filter(accounts::Column::ParentId.is_null()),
            };
        }
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let search = search.trim();
            query = query.filter(
                Condition::any()
                    .add(accounts::Column::Code.contains(search))
                    .add(accounts::Column::Name.contains(search)),
            );
        }

        Ok(query.all(self.db.as_ref()).await?)
    }

    /// Loads posting information for the given account IDs.
    ///
    /// IDs with no matching row are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn posting_info<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<HashMap<AccountId, AccountPostingInfo>, AccountError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String, bool)> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .column(accounts::Column::Code)
            .column(accounts::Column::IsActive)
            .filter(accounts::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, code, is_active)| {
                let id = AccountId::from_uuid(id);
                (id, AccountPostingInfo { id, code, is_active })
            })
            .collect())
    }

    /// Returns the raw debit-positive balance of an account.
    ///
    /// Includes the opening balance (when effective) and posted lines up to
    /// `as_of`, or all posted lines when `as_of` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the query fails.
    pub async fn balance(
        &self,
        id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;
        raw_balance(self.db.as_ref(), &account, as_of).await
    }

    /// Counts journal lines posted or drafted against an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_journal_lines(&self, id: Uuid) -> Result<u64, AccountError> {
        count_lines(self.db.as_ref(), id).await
    }
}

/// Returns true when the opening balance is effective on `date`.
pub(crate) fn opening_applies(opening_date: Option<NaiveDate>, date: Option<NaiveDate>) -> bool {
    match (opening_date, date) {
        (None, _) | (_, None) => true,
        (Some(opening), Some(date)) => opening <= date,
    }
}

async fn raw_balance<C: ConnectionTrait>(
    conn: &C,
    account: &accounts::Model,
    as_of: Option<NaiveDate>,
) -> Result<Decimal, AccountError> {
    let mut query = journal_entry_lines::Entity::find()
        .select_only()
        .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit")
        .column_as(journal_entry_lines::Column::CreditAmount.sum(), "credit")
        .join(
            JoinType::InnerJoin,
            journal_entry_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_entry_lines::Column::AccountId.eq(account.id))
        .filter(journal_entries::Column::IsPosted.eq(true));
    if let Some(date) = as_of {
        query = query.filter(journal_entries::Column::EntryDate.lte(date));
    }

    let (debit, credit): (Option<Decimal>, Option<Decimal>) = query
        .into_tuple()
        .one(conn)
        .await?
        .unwrap_or((None, None));

    let opening = if opening_applies(account.opening_balance_date, as_of) {
        account.opening_balance
    } else {
        Decimal::ZERO
    };

    Ok(opening + debit.unwrap_or_default() - credit.unwrap_or_default())
}

async fn count_lines<C: ConnectionTrait>(conn: &C, account_id: Uuid) -> Result<u64, AccountError> {
    Ok(journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::AccountId.eq(account_id))
        .count(conn)
        .await?)
}

async fn check_sub_type<C: ConnectionTrait>(
    conn: &C,
    sub_type: &str,
    category: AccountCategory,
) -> Result<(), AccountError> {
    let row = account_types::Entity::find()
        .filter(account_types::Column::Name.eq(sub_type))
        .one(conn)
        .await?
        .ok_or_else(|| AccountError::UnknownSubType(sub_type.to_string()))?;

    if row.category != category {
        return Err(AccountError::SubTypeMismatch {
            sub_type: sub_type.to_string(),
            category,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
