//! Bank accounts and manual bank transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sgbooks_core::ledger::{JournalLineInput, JournalType};
use sgbooks_db::{
    DbConn,
    BankTransactionFilter, BankingRepository, CurrencyRepository, NewBankTransaction,
    SettingsRepository, db_error,
    entities::{bank_accounts, bank_transactions, sea_orm_active_enums::AuditAction},
    signed_amount,
};
use sgbooks_shared::{
    AppResult,
    types::{AccountId, round_money},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::posting::{EntryHeader, JournalPoster};
use super::{audit, begin, commit};
use crate::dto::{CreateBankAccountDto, ReconcileDto, RecordBankTransactionDto};

/// Lines moving `signed` (bank currency) between the bank's GL account and
/// `offset`. Inflows debit the bank; outflows credit it.
pub(crate) fn bank_journal_lines(
    bank_gl: Uuid,
    offset: Uuid,
    signed: Decimal,
    currency_code: &str,
    exchange_rate: Decimal,
) -> Vec<JournalLineInput> {
    let amount = round_money(signed.abs() * exchange_rate);
    let (debit, credit) = if signed.is_sign_positive() {
        (bank_gl, offset)
    } else {
        (offset, bank_gl)
    };
    vec![
        JournalLineInput {
            exchange_rate,
            ..JournalLineInput::debit(AccountId::from_uuid(debit), amount, currency_code)
        },
        JournalLineInput {
            exchange_rate,
            ..JournalLineInput::credit(AccountId::from_uuid(credit), amount, currency_code)
        },
    ]
}

/// Rate from `currency` to the company's base currency on `date`.
pub(crate) async fn rate_to_base(
    settings: &SettingsRepository,
    currencies: &CurrencyRepository,
    currency: &str,
    date: NaiveDate,
) -> AppResult<Decimal> {
    let base = settings.base_currency().await.map_err(db_error)?;
    Ok(currencies.rate_on_or_before(currency, &base, date).await?)
}

/// Manages bank accounts.
#[derive(Debug, Clone)]
pub struct BankAccountManager {
    db: DbConn,
    banking: BankingRepository,
    currencies: CurrencyRepository,
}

impl BankAccountManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            banking: BankingRepository::new(db.clone()),
            currencies: CurrencyRepository::new(db.clone()),
            db,
        }
    }

    /// Registers a bank account.
    #[instrument(skip(self, dto), fields(name = %dto.account_name))]
    pub async fn create_bank_account(
        &self,
        dto: CreateBankAccountDto,
    ) -> AppResult<bank_accounts::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        self.currencies.require_active(&txn, &dto.currency_code).await?;
        let account = self.banking.create_account(&txn, dto.into()).await?;
        audit(&txn, "bank_account", account.id, AuditAction::Insert, Some(&account)).await?;
        commit(txn).await?;
        Ok(account)
    }

    /// Lists bank accounts by name.
    pub async fn list_bank_accounts(&self, active_only: bool) -> AppResult<Vec<bank_accounts::Model>> {
        Ok(self.banking.list_accounts(active_only).await?)
    }

    /// Loads one bank account.
    pub async fn get_bank_account(&self, id: Uuid) -> AppResult<bank_accounts::Model> {
        Ok(self.banking.require_account(self.db.as_ref(), id).await?)
    }
}

/// Records and reconciles bank transactions.
#[derive(Debug, Clone)]
pub struct BankTransactionManager {
    db: DbConn,
    banking: BankingRepository,
    currencies: CurrencyRepository,
    settings: SettingsRepository,
    poster: JournalPoster,
}

impl BankTransactionManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            banking: BankingRepository::new(db.clone()),
            currencies: CurrencyRepository::new(db.clone()),
            settings: SettingsRepository::new(db.clone()),
            poster: JournalPoster::new(&db),
            db,
        }
    }

    /// Records a manual transaction and moves the account balance.
    ///
    /// With an offset account, a balancing journal entry is posted and linked.
    #[instrument(skip(self, dto), fields(bank_account_id = %dto.bank_account_id))]
    pub async fn record_transaction(
        &self,
        dto: RecordBankTransactionDto,
    ) -> AppResult<bank_transactions::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let bank = self.banking.require_account(&txn, dto.bank_account_id).await?;

        let journal_entry_id = match dto.offset_account_id {
            Some(offset) => {
                let signed = signed_amount(dto.transaction_type, dto.amount);
                let rate = rate_to_base(
                    &self.settings,
                    &self.currencies,
                    &bank.currency_code,
                    dto.transaction_date,
                )
                .await?;
                let lines =
                    bank_journal_lines(bank.gl_account_id, offset, signed, &bank.currency_code, rate);
                let journal_type = if signed.is_sign_positive() {
                    JournalType::CashReceipt
                } else {
                    JournalType::CashDisbursement
                };
                let entry = self
                    .poster
                    .post_new(
                        &txn,
                        EntryHeader {
                            journal_type,
                            entry_date: dto.transaction_date,
                            description: dto.description.clone(),
                            reference: dto.reference.clone(),
                            source: Some(("bank_account", bank.id)),
                        },
                        &lines,
                    )
                    .await?;
                Some(entry.id)
            }
            None => None,
        };

        let (transaction, account) = self
            .banking
            .record_transaction(
                &txn,
                NewBankTransaction {
                    bank_account_id: dto.bank_account_id,
                    transaction_date: dto.transaction_date,
                    value_date: dto.value_date,
                    transaction_type: dto.transaction_type,
                    description: dto.description,
                    reference: dto.reference,
                    amount: dto.amount,
                    journal_entry_id,
                },
            )
            .await?;
        audit(&txn, "bank_transaction", transaction.id, AuditAction::Insert, Some(&transaction)).await?;
        commit(txn).await?;

        tracing::info!(
            bank_account = %account.account_name,
            amount = %transaction.amount,
            balance = %account.current_balance,
            "Bank transaction recorded"
        );
        Ok(transaction)
    }

    /// Lists a bank account's transactions in date order.
    pub async fn list_transactions(
        &self,
        bank_account_id: Uuid,
        filter: BankTransactionFilter,
    ) -> AppResult<Vec<bank_transactions::Model>> {
        Ok(self.banking.list_transactions(bank_account_id, filter).await?)
    }

    /// Marks statement lines reconciled; returns how many changed.
    #[instrument(skip(self, dto), fields(bank_account_id = %dto.bank_account_id))]
    pub async fn reconcile(&self, dto: ReconcileDto) -> AppResult<u64> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let count = self
            .banking
            .reconcile(&txn, dto.bank_account_id, &dto.transaction_ids, dto.statement_date)
            .await?;
        commit(txn).await?;

        if count < dto.transaction_ids.len() as u64 {
            tracing::warn!(
                requested = dto.transaction_ids.len(),
                reconciled = count,
                "Some transactions were already reconciled or after the statement date"
            );
        }
        Ok(count)
    }
}
