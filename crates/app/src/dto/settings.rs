use serde::{Deserialize, Serialize};
use sgbooks_db::UpdateCompanySettingsInput;
use validator::Validate;

use super::currency_code;

/// Partial update of the company settings row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompanySettingsDto {
    /// Trading name printed on reports.
    #[validate(length(min = 1, max = 200, message = "Company name must be 1-200 characters"))]
    pub company_name: Option<String>,
    /// Registered legal name.
    pub legal_name: Option<Option<String>>,
    /// Unique Entity Number.
    pub uen_no: Option<Option<String>>,
    /// GST registration number.
    pub gst_registration_no: Option<Option<String>>,
    /// Whether the company is GST-registered.
    pub gst_registered: Option<bool>,
    /// Reporting currency.
    #[validate(custom(function = "currency_code"))]
    pub base_currency: Option<String>,
    /// Month the fiscal year starts.
    #[validate(range(min = 1, max = 12, message = "Fiscal year start month must be 1-12"))]
    pub fiscal_year_start_month: Option<i16>,
    /// Day the fiscal year starts.
    #[validate(range(min = 1, max = 31, message = "Fiscal year start day must be 1-31"))]
    pub fiscal_year_start_day: Option<i16>,
    /// Display date format.
    pub date_format: Option<String>,
}

impl From<CompanySettingsDto> for UpdateCompanySettingsInput {
    fn from(dto: CompanySettingsDto) -> Self {
        Self {
            company_name: dto.company_name,
            legal_name: dto.legal_name,
            uen_no: dto.uen_no,
            gst_registration_no: dto.gst_registration_no,
            gst_registered: dto.gst_registered,
            base_currency: dto.base_currency,
            fiscal_year_start_month: dto.fiscal_year_start_month,
            fiscal_year_start_day: dto.fiscal_year_start_day,
            date_format: dto.date_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_out_of_range() {
        let dto = CompanySettingsDto {
            fiscal_year_start_month: Some(13),
            ..CompanySettingsDto::default()
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        assert_eq!(
            err.messages(),
            vec!["Fiscal year start month must be 1-12".to_string()]
        );
    }
}
