use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_core::ledger::{JournalLineInput, JournalType};
use sgbooks_shared::types::AccountId;
use uuid::Uuid;
use validator::Validate;

use super::{currency_code, non_negative, positive};

/// One debit or credit line of a manual journal entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JournalLineDto {
    /// Account to post to.
    pub account_id: Uuid,
    /// Line narration.
    pub description: Option<String>,
    /// Debit amount; zero on credit lines.
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub debit_amount: Decimal,
    /// Credit amount; zero on debit lines.
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub credit_amount: Decimal,
    /// Transaction currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
    /// Rate to the base currency.
    #[validate(custom(function = "positive"))]
    pub exchange_rate: Decimal,
    /// GST code, if the line is taxable.
    pub tax_code: Option<String>,
    /// GST amount carried by the line.
    #[serde(default)]
    pub tax_amount: Decimal,
}

impl From<JournalLineDto> for JournalLineInput {
    fn from(dto: JournalLineDto) -> Self {
        Self {
            account_id: AccountId::from_uuid(dto.account_id),
            description: dto.description,
            debit_amount: dto.debit_amount,
            credit_amount: dto.credit_amount,
            currency_code: dto.currency_code,
            exchange_rate: dto.exchange_rate,
            tax_code: dto.tax_code.filter(|c| !c.trim().is_empty()),
            tax_amount: dto.tax_amount,
        }
    }
}

/// A manual journal entry, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JournalEntryDto {
    /// Classification.
    pub journal_type: JournalType,
    /// Entry date; must fall in an open fiscal period.
    pub entry_date: NaiveDate,
    /// Narration.
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
    /// External reference.
    #[validate(length(max = 100, message = "Reference cannot exceed 100 characters"))]
    pub reference: Option<String>,
    /// Lines; balance and side rules are checked by the ledger.
    #[validate(length(min = 2, message = "Journal entry must have at least 2 lines"))]
    #[validate(nested)]
    pub lines: Vec<JournalLineDto>,
}

impl JournalEntryDto {
    /// Converts the lines into ledger inputs.
    #[must_use]
    pub fn line_inputs(&self) -> Vec<JournalLineInput> {
        self.lines.iter().cloned().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(debit: Decimal, credit: Decimal) -> JournalLineDto {
        JournalLineDto {
            account_id: Uuid::now_v7(),
            description: None,
            debit_amount: debit,
            credit_amount: credit,
            currency_code: "SGD".into(),
            exchange_rate: Decimal::ONE,
            tax_code: Some(String::new()),
            tax_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_entry_requires_two_lines() {
        let dto = JournalEntryDto {
            journal_type: JournalType::General,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Owner capital".into(),
            reference: None,
            lines: vec![line(dec!(100), Decimal::ZERO)],
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        assert_eq!(
            err.messages(),
            vec!["Journal entry must have at least 2 lines".to_string()]
        );
    }

    #[test]
    fn test_negative_line_amount_is_reported() {
        let dto = JournalEntryDto {
            journal_type: JournalType::General,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Bad".into(),
            reference: None,
            lines: vec![line(dec!(-1), Decimal::ZERO), line(Decimal::ZERO, dec!(1))],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_tax_code_is_dropped() {
        let input: JournalLineInput = line(dec!(10), Decimal::ZERO).into();
        assert!(input.tax_code.is_none());
        assert_eq!(input.debit_amount, dec!(10));
    }
}
