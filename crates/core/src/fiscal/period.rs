//! Fiscal period types and generation rules.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sgbooks_shared::types::{FiscalPeriodId, FiscalYearId};

use super::error::FiscalError;

/// Length of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodType {
    /// Calendar month (or the partial month at either end of the year).
    Month,
    /// Three consecutive months.
    Quarter,
    /// The whole fiscal year.
    Year,
}

impl PeriodType {
    /// Number of months a period spans.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        }
    }

    /// Returns the canonical name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            "year" | "yearly" | "annual" => Ok(Self::Year),
            _ => Err(format!("Unknown period type: {s}")),
        }
    }
}

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiscalPeriodStatus {
    /// Period is open for posting.
    Open,
    /// Period is closed; it can be reopened.
    Closed,
    /// Period is archived and immutable.
    Archived,
}

impl std::fmt::Display for FiscalPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Archived => "Archived",
        })
    }
}

/// A fiscal period within a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Fiscal year this period belongs to.
    pub fiscal_year_id: FiscalYearId,
    /// Period length.
    pub period_type: PeriodType,
    /// Period number within the year (1-12 for monthly).
    pub period_number: i32,
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: FiscalPeriodStatus,
}

impl FiscalPeriod {
    /// Returns true if entries can be posted to this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == FiscalPeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A period produced by [`generate_periods`], not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPeriod {
    /// Period number, starting at 1.
    pub period_number: i32,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
}

/// Validates a fiscal year date range.
///
/// # Errors
///
/// Returns `InvalidDateRange` if `start_date >= end_date`.
pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), FiscalError> {
    if start_date >= end_date {
        return Err(FiscalError::InvalidDateRange);
    }
    Ok(())
}

/// Checks if two inclusive date ranges overlap.
#[must_use]
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Validates fiscal period status transitions.
///
/// Open and Closed can move to each other; either can be archived.
/// Archived periods never change.
///
/// # Errors
///
/// Returns `InvalidStatusTransition` for any other move.
pub fn validate_status_transition(
    from: FiscalPeriodStatus,
    to: FiscalPeriodStatus,
) -> Result<(), FiscalError> {
    use FiscalPeriodStatus::{Archived, Closed, Open};

    let valid = match (from, to) {
        _ if from == to => true,
        (Open, Closed | Archived) | (Closed, Open | Archived) => true,
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(FiscalError::InvalidStatusTransition { from, to })
    }
}

/// Generates the periods of a fiscal year.
///
/// Periods start on `start_date`, step by whole months, and the last one is
/// truncated to `end_date`. Monthly periods are named "January 2026",
/// quarterly ones "Q1 FY2026" using `year_name`.
#[must_use]
pub fn generate_periods(
    year_name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    period_type: PeriodType,
) -> Vec<GeneratedPeriod> {
    let mut periods = Vec::new();
    let mut current = start_date;
    let mut period_number: i32 = 1;

    while current <= end_date {
        let Some(next_start) = current.checked_add_months(chrono::Months::new(period_type.months()))
        else {
            break;
        };
        let natural_end = next_start.pred_opt().unwrap_or(next_start);
        let period_end = natural_end.min(end_date);

        let name = match period_type {
            PeriodType::Month => format!("{} {}", month_name(current.month()), current.year()),
            PeriodType::Quarter => format!("Q{period_number} {year_name}"),
            PeriodType::Year => year_name.to_string(),
        };

        periods.push(GeneratedPeriod {
            period_number,
            name,
            start_date: current,
            end_date: period_end,
        });

        current = next_start;
        period_number += 1;
    }

    periods
}

/// Returns the last day of a month.
///
/// Falls back to the 28th for out-of-range input.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
        .unwrap_or(NaiveDate::MIN)
}

/// Returns month name.
#[must_use]
pub const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_monthly_periods_full_year() {
        let periods = generate_periods("FY2026", date(2026, 1, 1), date(2026, 12, 31), PeriodType::Month);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "January 2026");
        assert_eq!(periods[1].end_date, date(2026, 2, 28));
        assert_eq!(periods[11].name, "December 2026");
        assert_eq!(periods[11].end_date, date(2026, 12, 31));
    }

    #[test]
    fn test_generate_monthly_periods_non_calendar_year() {
        let periods = generate_periods("FY2026", date(2025, 4, 1), date(2026, 3, 31), PeriodType::Month);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "April 2025");
        assert_eq!(periods[9].name, "January 2026");
        assert_eq!(periods[11].period_number, 12);
    }

    #[test]
    fn test_generate_quarterly_periods() {
        let periods = generate_periods("FY2026", date(2026, 1, 1), date(2026, 12, 31), PeriodType::Quarter);

        assert_eq!(periods.len(), 4);
        assert_eq!(periods[0].name, "Q1 FY2026");
        assert_eq!(periods[0].end_date, date(2026, 3, 31));
        assert_eq!(periods[3].start_date, date(2026, 10, 1));
    }

    #[test]
    fn test_generate_partial_year_truncates_last_period() {
        let periods = generate_periods("Short", date(2026, 1, 1), date(2026, 2, 15), PeriodType::Month);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[1].end_date, date(2026, 2, 15));
    }

    #[rstest]
    #[case(FiscalPeriodStatus::Open, FiscalPeriodStatus::Closed, true)]
    #[case(FiscalPeriodStatus::Closed, FiscalPeriodStatus::Open, true)]
    #[case(FiscalPeriodStatus::Closed, FiscalPeriodStatus::Archived, true)]
    #[case(FiscalPeriodStatus::Open, FiscalPeriodStatus::Open, true)]
    #[case(FiscalPeriodStatus::Archived, FiscalPeriodStatus::Open, false)]
    #[case(FiscalPeriodStatus::Archived, FiscalPeriodStatus::Closed, false)]
    fn test_status_transitions(
        #[case] from: FiscalPeriodStatus,
        #[case] to: FiscalPeriodStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(validate_status_transition(from, to).is_ok(), allowed);
    }

    #[test]
    fn test_date_range_validation() {
        assert!(validate_date_range(date(2026, 1, 1), date(2026, 12, 31)).is_ok());
        assert_eq!(
            validate_date_range(date(2026, 1, 1), date(2026, 1, 1)),
            Err(FiscalError::InvalidDateRange)
        );
    }

    #[test]
    fn test_overlap() {
        assert!(date_ranges_overlap(
            date(2026, 1, 1),
            date(2026, 12, 31),
            date(2026, 12, 31),
            date(2027, 12, 31)
        ));
        assert!(!date_ranges_overlap(
            date(2026, 1, 1),
            date(2026, 12, 31),
            date(2027, 1, 1),
            date(2027, 12, 31)
        ));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2026, 12), date(2026, 12, 31));
    }

    proptest! {
        /// Generated periods tile the year with no gaps or overlaps.
        #[test]
        fn prop_periods_are_contiguous(
            start_offset in 0u32..365,
            len_days in 30u32..800,
            quarterly in any::<bool>(),
        ) {
            let start = date(2024, 1, 1) + chrono::Days::new(u64::from(start_offset));
            let end = start + chrono::Days::new(u64::from(len_days));
            let kind = if quarterly { PeriodType::Quarter } else { PeriodType::Month };

            let periods = generate_periods("FY", start, end, kind);
            prop_assert!(!periods.is_empty());
            prop_assert_eq!(periods[0].start_date, start);
            prop_assert_eq!(periods[periods.len() - 1].end_date, end);
            for pair in periods.windows(2) {
                prop_assert_eq!(pair[0].end_date.succ_opt().unwrap(), pair[1].start_date);
            }
        }
    }
}
