use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_db::{CreateTaxCodeInput, entities::sea_orm_active_enums::TaxType};
use uuid::Uuid;
use validator::Validate;

use super::{currency_code, percentage, positive};

/// Request to add a tax code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaxCodeDto {
    /// Short code, e.g. `SR`.
    #[validate(length(min = 1, max = 10, message = "Tax code must be 1-10 characters"))]
    pub code: String,
    /// Description shown in pickers.
    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: String,
    /// Tax family.
    pub tax_type: TaxType,
    /// Rate in percent.
    #[validate(custom(function = "percentage"))]
    pub rate: Decimal,
    /// Whether new lines default to this code.
    #[serde(default)]
    pub is_default: bool,
    /// Account the tax posts to.
    pub affects_account_id: Option<Uuid>,
}

impl From<CreateTaxCodeDto> for CreateTaxCodeInput {
    fn from(dto: CreateTaxCodeDto) -> Self {
        Self {
            code: dto.code.trim().to_uppercase(),
            description: dto.description,
            tax_type: dto.tax_type,
            rate: dto.rate,
            is_default: dto.is_default,
            affects_account_id: dto.affects_account_id,
        }
    }
}

/// An exchange rate quote for one day.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExchangeRateDto {
    /// Source currency.
    #[validate(custom(function = "currency_code"))]
    pub from_currency: String,
    /// Target currency.
    #[validate(custom(function = "currency_code"))]
    pub to_currency: String,
    /// Quote date.
    pub rate_date: NaiveDate,
    /// Units of `to_currency` per unit of `from_currency`.
    #[validate(custom(function = "positive"))]
    pub rate: Decimal,
}
