//! F5 box computation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sgbooks_shared::types::round_money;

use super::error::GstError;
use super::types::{GstReturnData, GstTaxCode, TaxableLine};
use crate::accounts::AccountCategory;
use crate::fiscal::last_day_of_month;

/// GST on an amount at `rate` percent, rounded to cents.
#[must_use]
pub fn calculate_tax(amount: Decimal, rate: Decimal) -> Decimal {
    round_money(amount * rate / Decimal::ONE_HUNDRED)
}

/// Filing deadline: last day of the month after the period ends.
#[must_use]
pub fn filing_due_date(period_end: NaiveDate) -> NaiveDate {
    let (year, month) = if period_end.month() == 12 {
        (period_end.year() + 1, 1)
    } else {
        (period_end.year(), period_end.month() + 1)
    };
    last_day_of_month(year, month)
}

/// Label for a period, e.g. "2026-Q1" for a calendar quarter.
fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    let quarter_end = start
        .checked_add_months(chrono::Months::new(3))
        .and_then(|d| d.pred_opt());
    if start.day() == 1 && quarter_end == Some(end) && (start.month() - 1) % 3 == 0 {
        format!("{}-Q{}", start.year(), (start.month() - 1) / 3 + 1)
    } else {
        format!("{start} to {end}")
    }
}

/// Classifies taxable lines into F5 boxes.
///
/// Supplies post to revenue accounts and are measured credit-positive;
/// purchases post to expense or asset accounts and are measured
/// debit-positive. Lines with unknown codes, `OS`, `BL` or `NR` are skipped.
///
/// # Errors
///
/// Returns `InvalidPeriod` if `end < start`.
pub fn compute_f5(
    start: NaiveDate,
    end: NaiveDate,
    lines: &[TaxableLine],
) -> Result<GstReturnData, GstError> {
    if end < start {
        return Err(GstError::InvalidPeriod);
    }

    let mut data = GstReturnData {
        return_period: period_label(start, end),
        start_date: start,
        end_date: end,
        filing_due_date: filing_due_date(end),
        standard_rated_supplies: Decimal::ZERO,
        zero_rated_supplies: Decimal::ZERO,
        exempt_supplies: Decimal::ZERO,
        total_supplies: Decimal::ZERO,
        taxable_purchases: Decimal::ZERO,
        output_tax: Decimal::ZERO,
        input_tax: Decimal::ZERO,
        tax_adjustments: Decimal::ZERO,
        tax_payable: Decimal::ZERO,
    };

    for line in lines {
        let Some(code) = GstTaxCode::parse(&line.tax_code) else {
            tracing::debug!(tax_code = %line.tax_code, "Skipping unknown tax code");
            continue;
        };

        match line.account_category {
            AccountCategory::Revenue => {
                let net = line.credit_amount - line.debit_amount;
                match code {
                    GstTaxCode::Sr => {
                        data.standard_rated_supplies += net;
                        data.output_tax += line.tax_amount;
                    }
                    GstTaxCode::Zr => data.zero_rated_supplies += net,
                    GstTaxCode::Es => data.exempt_supplies += net,
                    _ => {}
                }
            }
            AccountCategory::Expense | AccountCategory::Asset => {
                let net = line.debit_amount - line.credit_amount;
                match code {
                    GstTaxCode::Tx => {
                        data.taxable_purchases += net;
                        data.input_tax += line.tax_amount;
                    }
                    GstTaxCode::Zp | GstTaxCode::Im => data.taxable_purchases += net,
                    _ => {}
                }
            }
            AccountCategory::Liability | AccountCategory::Equity => {}
        }
    }

    data.recompute_totals();
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(category: AccountCategory, code: &str, dr: Decimal, cr: Decimal, tax: Decimal) -> TaxableLine {
        TaxableLine {
            account_category: category,
            tax_code: code.to_string(),
            debit_amount: dr,
            credit_amount: cr,
            tax_amount: tax,
        }
    }

    #[test]
    fn test_quarter_return() {
        let lines = vec![
            line(AccountCategory::Revenue, "SR", dec!(0), dec!(1000), dec!(90)),
            line(AccountCategory::Revenue, "ZR", dec!(0), dec!(500), dec!(0)),
            line(AccountCategory::Revenue, "ES", dec!(0), dec!(200), dec!(0)),
            line(AccountCategory::Revenue, "OS", dec!(0), dec!(999), dec!(0)),
            line(AccountCategory::Expense, "TX", dec!(400), dec!(0), dec!(36)),
            line(AccountCategory::Asset, "IM", dec!(100), dec!(0), dec!(0)),
            line(AccountCategory::Expense, "BL", dec!(50), dec!(0), dec!(4.5)),
            line(AccountCategory::Expense, "NR", dec!(70), dec!(0), dec!(0)),
        ];
        let data = compute_f5(date(2026, 1, 1), date(2026, 3, 31), &lines).unwrap();

        assert_eq!(data.return_period, "2026-Q1");
        assert_eq!(data.filing_due_date, date(2026, 4, 30));
        assert_eq!(data.standard_rated_supplies, dec!(1000));
        assert_eq!(data.zero_rated_supplies, dec!(500));
        assert_eq!(data.exempt_supplies, dec!(200));
        assert_eq!(data.total_supplies, dec!(1700));
        assert_eq!(data.taxable_purchases, dec!(500));
        assert_eq!(data.output_tax, dec!(90));
        assert_eq!(data.input_tax, dec!(36));
        assert_eq!(data.tax_payable, dec!(54));
    }

    #[test]
    fn test_credit_note_reduces_supplies() {
        let lines = vec![
            line(AccountCategory::Revenue, "SR", dec!(0), dec!(1000), dec!(90)),
            line(AccountCategory::Revenue, "SR", dec!(100), dec!(0), dec!(-9)),
        ];
        let data = compute_f5(date(2026, 4, 1), date(2026, 6, 30), &lines).unwrap();
        assert_eq!(data.standard_rated_supplies, dec!(900));
        assert_eq!(data.output_tax, dec!(81));
        assert_eq!(data.return_period, "2026-Q2");
    }

    #[test]
    fn test_adjustments_flow_into_box_8() {
        let mut data = compute_f5(date(2026, 1, 1), date(2026, 1, 31), &[]).unwrap();
        assert_eq!(data.return_period, "2026-01-01 to 2026-01-31");
        data.set_adjustments(dec!(12.34));
        assert_eq!(data.tax_payable, dec!(12.34));
    }

    #[test]
    fn test_inverted_period_rejected() {
        assert_eq!(
            compute_f5(date(2026, 3, 31), date(2026, 1, 1), &[]),
            Err(GstError::InvalidPeriod)
        );
    }

    #[rstest]
    #[case(date(2026, 3, 31), date(2026, 4, 30))]
    #[case(date(2026, 12, 31), date(2027, 1, 31))]
    #[case(date(2027, 12, 31), date(2028, 1, 31))]
    #[case(date(2028, 1, 31), date(2028, 2, 29))]
    fn test_filing_due_date(#[case] end: NaiveDate, #[case] due: NaiveDate) {
        assert_eq!(filing_due_date(end), due);
    }

    #[rstest]
    #[case(dec!(100), dec!(9.00))]
    #[case(dec!(0.05), dec!(0.00))]
    #[case(dec!(0.06), dec!(0.01))]
    #[case(dec!(1234.56), dec!(111.11))]
    fn test_calculate_tax(#[case] amount: Decimal, #[case] tax: Decimal) {
        assert_eq!(calculate_tax(amount, crate::gst::STANDARD_RATE), tax);
    }

    fn code_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["SR", "ZR", "ES", "OS", "TX", "ZP", "IM", "BL", "NR", "XX"])
    }

    fn category_strategy() -> impl Strategy<Value = AccountCategory> {
        prop::sample::select(AccountCategory::ALL.to_vec())
    }

    proptest! {
        /// Box 4 is always boxes 1+2+3 and box 8 is always 6-7.
        #[test]
        fn prop_box_identities(
            raw in prop::collection::vec(
                (category_strategy(), code_strategy(), 0i64..1_000_000, any::<bool>()),
                0..40,
            ),
        ) {
            let lines: Vec<_> = raw
                .into_iter()
                .map(|(category, code, cents, is_debit)| {
                    let amount = Decimal::new(cents, 2);
                    let (dr, cr) = if is_debit { (amount, Decimal::ZERO) } else { (Decimal::ZERO, amount) };
                    line(category, code, dr, cr, calculate_tax(amount, dec!(9)))
                })
                .collect();

            let data = compute_f5(date(2026, 1, 1), date(2026, 3, 31), &lines).unwrap();
            prop_assert_eq!(
                data.total_supplies,
                data.standard_rated_supplies + data.zero_rated_supplies + data.exempt_supplies
            );
            prop_assert_eq!(data.tax_payable, data.output_tax - data.input_tax);
        }
    }
}
