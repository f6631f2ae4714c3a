use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sgbooks_core::fiscal::PeriodType;
use sgbooks_db::CreateFiscalYearInput;
use validator::{Validate, ValidationError};

/// Request to open a fiscal year with generated periods.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "dates_in_order"))]
pub struct CreateFiscalYearDto {
    /// Display name, e.g. `FY2026`.
    #[validate(length(min = 1, max = 20, message = "Fiscal year name must be 1-20 characters"))]
    pub year_name: String,
    /// First day of the year.
    pub start_date: NaiveDate,
    /// Last day of the year.
    pub end_date: NaiveDate,
    /// Month or Quarter periods.
    pub period_type: PeriodType,
}

fn dates_in_order(dto: &CreateFiscalYearDto) -> Result<(), ValidationError> {
    if dto.start_date >= dto.end_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("Fiscal year start date must be before end date".into());
        return Err(err);
    }
    Ok(())
}

impl From<CreateFiscalYearDto> for CreateFiscalYearInput {
    fn from(dto: CreateFiscalYearDto) -> Self {
        Self {
            year_name: dto.year_name.trim().to_string(),
            start_date: dto.start_date,
            end_date: dto.end_date,
            period_type: dto.period_type,
        }
    }
}
