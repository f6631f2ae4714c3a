use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_db::{CreateBankAccountInput, entities::sea_orm_active_enums::BankTransactionType};
use uuid::Uuid;
use validator::Validate;

use super::currency_code;

/// Request to register a bank account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBankAccountDto {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Account name must be 1-100 characters"))]
    pub account_name: String,
    /// Bank's account number.
    #[validate(length(min = 1, max = 50, message = "Account number must be 1-50 characters"))]
    pub account_number: String,
    /// Bank name.
    #[validate(length(min = 1, max = 100, message = "Bank name must be 1-100 characters"))]
    pub bank_name: String,
    /// Account currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
    /// Balance when the account is registered.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Asset account in the general ledger.
    pub gl_account_id: Uuid,
}

impl From<CreateBankAccountDto> for CreateBankAccountInput {
    fn from(dto: CreateBankAccountDto) -> Self {
        Self {
            account_name: dto.account_name.trim().to_string(),
            account_number: dto.account_number.trim().to_string(),
            bank_name: dto.bank_name.trim().to_string(),
            currency_code: dto.currency_code,
            opening_balance: dto.opening_balance,
            gl_account_id: dto.gl_account_id,
        }
    }
}

/// A manual bank transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordBankTransactionDto {
    /// Bank account.
    pub bank_account_id: Uuid,
    /// Booking date.
    pub transaction_date: NaiveDate,
    /// Value date, if different.
    pub value_date: Option<NaiveDate>,
    /// Deposit, withdrawal, fee, ...
    pub transaction_type: BankTransactionType,
    /// Statement text.
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
    /// Bank reference.
    pub reference: Option<String>,
    /// Amount; the sign follows the type for deposits, withdrawals, interest and fees.
    pub amount: Decimal,
    /// Offset account for a balancing journal entry; `None` records the
    /// bank line only.
    pub offset_account_id: Option<Uuid>,
}

/// Marks statement lines as reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReconcileDto {
    /// Bank account.
    pub bank_account_id: Uuid,
    /// Statement closing date.
    pub statement_date: NaiveDate,
    /// Transactions that appear on the statement.
    #[validate(length(min = 1, message = "Select at least one transaction"))]
    pub transaction_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_requires_transactions() {
        let dto = ReconcileDto {
            bank_account_id: Uuid::now_v7(),
            statement_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            transaction_ids: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bank_account_currency_checked() {
        let dto = CreateBankAccountDto {
            account_name: "DBS Current".into(),
            account_number: "012-345678-9".into(),
            bank_name: "DBS".into(),
            currency_code: "sgd".into(),
            opening_balance: Decimal::ZERO,
            gl_account_id: Uuid::now_v7(),
        };
        assert!(dto.validate().is_err());
    }
}
