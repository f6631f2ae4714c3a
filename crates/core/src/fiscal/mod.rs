//! Fiscal year and period management.

pub mod error;
pub mod period;

pub use error::FiscalError;
pub use period::{
    FiscalPeriod, FiscalPeriodStatus, GeneratedPeriod, PeriodType, date_ranges_overlap,
    generate_periods, last_day_of_month, month_name, validate_date_range,
    validate_status_transition,
};
