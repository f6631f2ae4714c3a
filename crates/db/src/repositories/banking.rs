//! Bank account and bank transaction repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{bank_accounts, bank_transactions, sea_orm_active_enums::BankTransactionType}};

/// Error types for banking operations.
#[derive(Debug, thiserror::Error)]
pub enum BankingError {
    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    AccountNotFound(Uuid),

    /// Bank account is inactive.
    #[error("Bank account '{0}' is inactive")]
    InactiveAccount(String),

    /// Transactions must move money.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BankingError> for AppError {
    fn from(err: BankingError) -> Self {
        match err {
            BankingError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            BankingError::InactiveAccount(_) => Self::BusinessRule(err.to_string()),
            BankingError::ZeroAmount => Self::validation(err.to_string()),
            BankingError::Database(db) => super::db_error(db),
        }
    }
}

/// Input for creating a bank account.
#[derive(Debug, Clone)]
pub struct CreateBankAccountInput {
    /// Display name.
    pub account_name: String,
    /// Account number at the bank.
    pub account_number: String,
    /// Bank name.
    pub bank_name: String,
    /// Account currency.
    pub currency_code: String,
    /// Balance when the account was set up.
    pub opening_balance: Decimal,
    /// Backing general-ledger account.
    pub gl_account_id: Uuid,
}

/// A bank transaction to record.
#[derive(Debug, Clone)]
pub struct NewBankTransaction {
    /// Bank account.
    pub bank_account_id: Uuid,
    /// Booking date.
    pub transaction_date: NaiveDate,
    /// Value date.
    pub value_date: Option<NaiveDate>,
    /// Classification.
    pub transaction_type: BankTransactionType,
    /// Description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Amount as entered; signed by [`signed_amount`].
    pub amount: Decimal,
    /// Linked journal entry.
    pub journal_entry_id: Option<Uuid>,
}

/// Filter options for listing bank transactions.
#[derive(Debug, Clone, Default)]
pub struct BankTransactionFilter {
    /// Earliest transaction date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest transaction date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Reconciled state.
    pub is_reconciled: Option<bool>,
}

/// Applies the inflow/outflow sign of a transaction type.
///
/// Deposits and interest are inflows; withdrawals and fees are outflows.
/// Transfers and adjustments keep the sign they were entered with.
#[must_use]
pub fn signed_amount(transaction_type: BankTransactionType, amount: Decimal) -> Decimal {
    match transaction_type {
        BankTransactionType::Deposit | BankTransactionType::Interest => amount.abs(),
        BankTransactionType::Withdrawal | BankTransactionType::Fee => -amount.abs(),
        BankTransactionType::Transfer | BankTransactionType::Adjustment => amount,
    }
}

/// Banking repository.
#[derive(Debug, Clone)]
pub struct BankingRepository {
    db: DbConn,
}

impl BankingRepository {
    /// Creates a new banking repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a bank account whose current balance starts at the opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: CreateBankAccountInput,
    ) -> Result<bank_accounts::Model, BankingError> {
        let now = chrono::Utc::now().into();
        let created = bank_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_name: Set(input.account_name),
            account_number: Set(input.account_number),
            bank_name: Set(input.bank_name),
            currency_code: Set(input.currency_code),
            opening_balance: Set(input.opening_balance),
            current_balance: Set(input.opening_balance),
            gl_account_id: Set(input.gl_account_id),
            is_active: Set(true),
            last_reconciled_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        tracing::info!(bank_account_id = %created.id, name = %created.account_name, "Bank account created");
        Ok(created)
    }

    /// Lists bank accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        active_only: bool,
    ) -> Result<Vec<bank_accounts::Model>, BankingError> {
        let mut query = bank_accounts::Entity::find().order_by_asc(bank_accounts::Column::AccountName);
        if active_only {
            query = query.filter(bank_accounts::Column::IsActive.eq(true));
        }
        Ok(query.all(self.db.as_ref()).await?)
    }

    /// Loads a bank account or fails with `AccountNotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the query fails.
    pub async fn require_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bank_accounts::Model, BankingError> {
        bank_accounts::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(BankingError::AccountNotFound(id))
    }

    /// Records a transaction and moves the account's current balance.
    ///
    /// The bank account row is locked for the duration of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the account is missing or
    /// inactive, or a write fails.
    pub async fn record_transaction<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: NewBankTransaction,
    ) -> Result<(bank_transactions::Model, bank_accounts::Model), BankingError> {
        let amount = signed_amount(input.transaction_type, input.amount);
        if amount.is_zero() {
            return Err(BankingError::ZeroAmount);
        }

        let account = bank_accounts::Entity::find_by_id(input.bank_account_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(BankingError::AccountNotFound(input.bank_account_id))?;
        if !account.is_active {
            return Err(BankingError::InactiveAccount(account.account_name));
        }

        let transaction = bank_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            bank_account_id: Set(input.bank_account_id),
            transaction_date: Set(input.transaction_date),
            value_date: Set(input.value_date),
            transaction_type: Set(input.transaction_type),
            description: Set(input.description),
            reference: Set(input.reference),
            amount: Set(amount),
            is_reconciled: Set(false),
            reconciled_date: Set(None),
            journal_entry_id: Set(input.journal_entry_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(conn)
        .await?;

        let new_balance = account.current_balance + amount;
        let mut active: bank_accounts::ActiveModel = account.into();
        active.current_balance = Set(new_balance);
        active.updated_at = Set(chrono::Utc::now().into());
        let account = active.update(conn).await?;

        tracing::info!(
            bank_account_id = %account.id,
            %amount,
            balance = %account.current_balance,
            "Bank transaction recorded"
        );
        Ok((transaction, account))
    }

    /// Lists a bank account's transactions in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transactions(
        &self,
        bank_account_id: Uuid,
        filter: BankTransactionFilter,
    ) -> Result<Vec<bank_transactions::Model>, BankingError> {
        let mut query = bank_transactions::Entity::find()
            .filter(bank_transactions::Column::BankAccountId.eq(bank_account_id))
            .order_by_asc(bank_transactions::Column::TransactionDate)
            .order_by_asc(bank_transactions::Column::CreatedAt);
        if let Some(start) = filter.start_date {
            query = query.filter(bank_transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(bank_transactions::Column::TransactionDate.lte(end));
        }
        if let Some(reconciled) = filter.is_reconciled {
            query = query.filter(bank_transactions::Column::IsReconciled.eq(reconciled));
        }
        Ok(query.all(self.db.as_ref()).await?)
    }

    /// Marks transactions reconciled against a statement date.
    ///
    /// Only unreconciled transactions of this account dated on or before the
    /// statement date are touched. Returns the number marked.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or a write fails.
    pub async fn reconcile<C: ConnectionTrait>(
        &self,
        conn: &C,
        bank_account_id: Uuid,
        transaction_ids: &[Uuid],
        statement_date: NaiveDate,
    ) -> Result<u64, BankingError> {
        let account = self.require_account(conn, bank_account_id).await?;
        if transaction_ids.is_empty() {
            return Ok(0);
        }

        let result = bank_transactions::Entity::update_many()
            .col_expr(bank_transactions::Column::IsReconciled, Expr::value(true))
            .col_expr(
                bank_transactions::Column::ReconciledDate,
                Expr::value(statement_date),
            )
            .filter(bank_transactions::Column::BankAccountId.eq(bank_account_id))
            .filter(bank_transactions::Column::Id.is_in(transaction_ids.iter().copied()))
            .filter(bank_transactions::Column::IsReconciled.eq(false))
            .filter(bank_transactions::Column::TransactionDate.lte(statement_date))
            .exec(conn)
            .await?;

        let mut active: bank_accounts::ActiveModel = account.into();
        active.last_reconciled_date = Set(Some(statement_date));
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;

        tracing::info!(%bank_account_id, count = result.rows_affected, %statement_date, "Bank transactions reconciled");
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[rstest]
    #[case(BankTransactionType::Deposit, dec!(-50), dec!(50))]
    #[case(BankTransactionType::Interest, dec!(1.25), dec!(1.25))]
    #[case(BankTransactionType::Withdrawal, dec!(80), dec!(-80))]
    #[case(BankTransactionType::Fee, dec!(-3), dec!(-3))]
    #[case(BankTransactionType::Transfer, dec!(-200), dec!(-200))]
    #[case(BankTransactionType::Adjustment, dec!(15), dec!(15))]
    fn test_signed_amount(
        #[case] kind: BankTransactionType,
        #[case] entered: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(signed_amount(kind, entered), expected);
    }

    fn transaction(amount: Decimal) -> NewBankTransaction {
        NewBankTransaction {
            bank_account_id: Uuid::now_v7(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            value_date: None,
            transaction_type: BankTransactionType::Deposit,
            description: "Cash deposit".to_string(),
            reference: None,
            amount,
            journal_entry_id: None,
        }
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = BankingRepository::new(db.clone());
        let result = repo.record_transaction(db.as_ref(), transaction(Decimal::ZERO)).await;
        assert!(matches!(result, Err(BankingError::ZeroAmount)));
    }

    #[tokio::test]
    async fn test_missing_account_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<bank_accounts::Model>::new()])
            .into_connection());
        let repo = BankingRepository::new(db.clone());
        let result = repo.record_transaction(db.as_ref(), transaction(dec!(10))).await;
        assert!(matches!(result, Err(BankingError::AccountNotFound(_))));
    }
}
