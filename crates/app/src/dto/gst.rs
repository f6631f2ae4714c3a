use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// The period a GST return covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[validate(schema(function = "period_in_order"))]
pub struct GstPeriodDto {
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
}

fn period_in_order(dto: &GstPeriodDto) -> Result<(), ValidationError> {
    if dto.end_date < dto.start_date {
        let mut err = ValidationError::new("period");
        err.message = Some("GST period end date must not be before start date".into());
        return Err(err);
    }
    Ok(())
}

/// Marks a draft return as filed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FinalizeGstReturnDto {
    /// Draft return to file.
    pub return_id: Uuid,
    /// Date filed with IRAS.
    pub submission_date: NaiveDate,
    /// IRAS acknowledgement number.
    #[validate(length(min = 1, max = 50, message = "Submission reference is required"))]
    pub submission_reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_period_is_valid() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let dto = GstPeriodDto {
            start_date: day,
            end_date: day,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_reference_rejected() {
        let dto = FinalizeGstReturnDto {
            return_id: Uuid::now_v7(),
            submission_date: NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
            submission_reference: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
