use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_core::accounts::AccountCategory;
use sgbooks_db::{CreateAccountInput, UpdateAccountInput};
use uuid::Uuid;
use validator::Validate;

use super::account_code;

/// Request to add an account to the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountDto {
    /// Unique account code, e.g. `1010`.
    #[validate(custom(function = "account_code"))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Account name must be 1-100 characters"))]
    pub name: String,
    /// Top-level category.
    pub account_type: AccountCategory,
    /// Name of an account-type row refining the category.
    #[validate(length(max = 50, message = "Sub-type cannot exceed 50 characters"))]
    pub sub_type: Option<String>,
    /// Parent account for the tree view.
    pub parent_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Control accounts (AR, AP) summarise a sub-ledger.
    #[serde(default)]
    pub is_control_account: bool,
    /// Marks the GL account behind a bank account.
    #[serde(default)]
    pub is_bank_account: bool,
    /// Whether postings usually carry GST.
    #[serde(default)]
    pub gst_applicable: bool,
    /// Default tax treatment code.
    pub tax_treatment: Option<String>,
    /// Optional grouping label for reports.
    pub report_group: Option<String>,
    /// Signed, debit-positive opening balance.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Date the opening balance takes effect; `None` means always.
    pub opening_balance_date: Option<NaiveDate>,
}

impl From<CreateAccountDto> for CreateAccountInput {
    fn from(dto: CreateAccountDto) -> Self {
        Self {
            code: dto.code.trim().to_string(),
            name: dto.name.trim().to_string(),
            account_type: dto.account_type.into(),
            sub_type: dto.sub_type.filter(|s| !s.trim().is_empty()),
            parent_id: dto.parent_id,
            description: dto.description,
            is_control_account: dto.is_control_account,
            is_bank_account: dto.is_bank_account,
            gst_applicable: dto.gst_applicable,
            tax_treatment: dto.tax_treatment,
            report_group: dto.report_group,
            opening_balance: dto.opening_balance,
            opening_balance_date: dto.opening_balance_date,
        }
    }
}

/// Partial update of an account. `None` leaves a field unchanged;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAccountDto {
    /// New code.
    #[validate(custom(function = "account_code"))]
    pub code: Option<String>,
    /// New name.
    #[validate(length(min = 1, max = 100, message = "Account name must be 1-100 characters"))]
    pub name: Option<String>,
    /// New category; refused once the account has journal lines.
    pub account_type: Option<AccountCategory>,
    /// New sub-type.
    pub sub_type: Option<Option<String>>,
    /// New parent.
    pub parent_id: Option<Option<Uuid>>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New GST flag.
    pub gst_applicable: Option<bool>,
    /// New tax treatment.
    pub tax_treatment: Option<Option<String>>,
    /// New report group.
    pub report_group: Option<Option<String>>,
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
    /// New opening balance date.
    pub opening_balance_date: Option<Option<NaiveDate>>,
}

impl From<UpdateAccountDto> for UpdateAccountInput {
    fn from(dto: UpdateAccountDto) -> Self {
        Self {
            code: dto.code.map(|c| c.trim().to_string()),
            name: dto.name.map(|n| n.trim().to_string()),
            account_type: dto.account_type.map(Into::into),
            sub_type: dto.sub_type,
            parent_id: dto.parent_id,
            description: dto.description,
            gst_applicable: dto.gst_applicable,
            tax_treatment: dto.tax_treatment,
            report_group: dto.report_group,
            opening_balance: dto.opening_balance,
            opening_balance_date: dto.opening_balance_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid() -> CreateAccountDto {
        CreateAccountDto {
            code: "1010".into(),
            name: "Cash at Bank".into(),
            account_type: AccountCategory::Asset,
            sub_type: Some("Current Asset".into()),
            parent_id: None,
            description: None,
            is_control_account: false,
            is_bank_account: true,
            gst_applicable: false,
            tax_treatment: None,
            report_group: None,
            opening_balance: dec!(1000.00),
            opening_balance_date: None,
        }
    }

    #[test]
    fn test_valid_account_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_invalid_code_and_blank_name_both_reported() {
        let dto = CreateAccountDto {
            code: "10 10".into(),
            name: String::new(),
            ..valid()
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_blank_sub_type_is_dropped() {
        let input: CreateAccountInput = CreateAccountDto {
            code: " 1010 ".into(),
            sub_type: Some("  ".into()),
            ..valid()
        }
        .into();
        assert_eq!(input.code, "1010");
        assert!(input.sub_type.is_none());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(UpdateAccountDto::default().validate().is_ok());
        let dto = UpdateAccountDto {
            name: Some(String::new()),
            ..UpdateAccountDto::default()
        };
        assert!(dto.validate().is_err());
    }
}
