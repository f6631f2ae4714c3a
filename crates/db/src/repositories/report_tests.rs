use super::*;
use crate::entities::sea_orm_active_enums::AccountCategory;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn account(opening: Decimal, opening_date: Option<NaiveDate>) -> accounts::Model {
    let now = chrono::Utc::now().into();
    accounts::Model {
        id: Uuid::now_v7(),
        code: "1010".to_string(),
        name: "Cash at Bank".to_string(),
        account_type: AccountCategory::Asset,
        sub_type: Some("Current Asset".to_string()),
        parent_id: None,
        description: None,
        is_active: true,
        is_control_account: false,
        is_bank_account: true,
        gst_applicable: false,
        tax_treatment: None,
        report_group: None,
        opening_balance: opening,
        opening_balance_date: opening_date,
        created_at: now,
        updated_at: now,
    }
}

fn totals(debit: Decimal, credit: Decimal) -> LineTotals {
    LineTotals { debit, credit }
}

#[rstest]
#[case(None, dec!(1250))]
#[case(Some(date(2026, 1, 1)), dec!(1250))]
#[case(Some(date(2026, 3, 31)), dec!(1250))]
#[case(Some(date(2026, 4, 1)), dec!(250))]
fn test_snapshot_balance_as_of(#[case] opening_date: Option<NaiveDate>, #[case] expected: Decimal) {
    let acct = account(dec!(1000), opening_date);
    let balance = snapshot_balance(&acct, totals(dec!(400), dec!(150)), Some(date(2026, 3, 31)));
    assert_eq!(balance, expected);
}

#[test]
fn test_period_activity_ignores_opening() {
    let acct = account(dec!(1000), None);
    assert_eq!(
        snapshot_balance(&acct, totals(dec!(40), dec!(100)), None),
        dec!(-60)
    );
}

#[rstest]
#[case(Some(date(2026, 4, 1)), dec!(1100))]
#[case(Some(date(2026, 4, 2)), dec!(100))]
#[case(None, dec!(1100))]
fn test_ledger_opening(#[case] opening_date: Option<NaiveDate>, #[case] expected: Decimal) {
    let acct = account(dec!(1000), opening_date);
    assert_eq!(
        ledger_opening(&acct, date(2026, 4, 1), totals(dec!(300), dec!(200))),
        expected
    );
}

#[rstest]
#[case::inside_range(Some(date(2026, 3, 15)), dec!(1000), dec!(0), dec!(1000))]
#[case::credit_opening(Some(date(2026, 3, 31)), dec!(-250), dec!(0), dec!(-250))]
#[case::on_start_day(Some(date(2026, 3, 1)), dec!(1000), dec!(1000), dec!(1000))]
#[case::after_range(Some(date(2026, 4, 1)), dec!(1000), dec!(0), dec!(0))]
#[case::undated(None, dec!(1000), dec!(1000), dec!(1000))]
fn test_general_ledger_includes_opening_balance_once(
    #[case] opening_date: Option<NaiveDate>,
    #[case] opening: Decimal,
    #[case] expected_opening: Decimal,
    #[case] expected_closing: Decimal,
) {
    use sgbooks_core::reports::ReportService;

    let acct = account(opening, opening_date);
    let (start, end) = (date(2026, 3, 1), date(2026, 3, 31));
    let carried = ledger_opening(&acct, start, LineTotals::default());
    let postings: Vec<LedgerPosting> = opening_posting(&acct, start, end).into_iter().collect();

    let gl = ReportService::generate_general_ledger(
        "Acme",
        LedgerAccount {
            id: AccountId::from_uuid(acct.id),
            code: acct.code.clone(),
            name: acct.name.clone(),
            category: sgbooks_core::accounts::AccountCategory::Asset,
        },
        start,
        end,
        carried,
        postings,
    )
    .unwrap();

    assert_eq!(gl.opening_balance, expected_opening);
    assert_eq!(gl.closing_balance, expected_closing);
    // Matches the cumulative balance a balance sheet would report.
    assert_eq!(
        gl.closing_balance,
        snapshot_balance(&acct, LineTotals::default(), Some(end))
    );
}

#[test]
fn test_opening_line_sorts_before_same_day_postings() {
    use sgbooks_core::reports::ReportService;

    let acct = account(dec!(500), Some(date(2026, 3, 10)));
    let mut postings: Vec<LedgerPosting> = vec![LedgerPosting {
        entry_id: JournalEntryId::new(),
        entry_no: "JE-000001".to_string(),
        entry_date: date(2026, 3, 10),
        description: None,
        reference: None,
        debit: Decimal::ZERO,
        credit: dec!(200),
    }];
    postings.extend(opening_posting(&acct, date(2026, 3, 1), date(2026, 3, 31)));

    let gl = ReportService::generate_general_ledger(
        "Acme",
        LedgerAccount {
            id: AccountId::from_uuid(acct.id),
            code: acct.code.clone(),
            name: acct.name.clone(),
            category: sgbooks_core::accounts::AccountCategory::Asset,
        },
        date(2026, 3, 1),
        date(2026, 3, 31),
        Decimal::ZERO,
        postings,
    )
    .unwrap();

    assert_eq!(gl.lines[0].description, OPENING_BALANCE_LABEL);
    assert_eq!(gl.lines[0].balance, dec!(500));
    assert_eq!(gl.lines[1].balance, dec!(300));
    assert_eq!(gl.closing_balance, dec!(300));
}

#[test]
fn test_not_found_maps_to_app_error() {
    let err: AppError = ReportQueryError::AccountNotFound(Uuid::nil()).into();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The ledger opening plus in-range activity equals the cumulative
    /// balance at the end of the range.
    #[test]
    fn prop_opening_plus_activity_matches_cumulative(
        opening in -1_000_000i64..1_000_000,
        before_dr in 0i64..1_000_000,
        before_cr in 0i64..1_000_000,
        range_dr in 0i64..1_000_000,
        range_cr in 0i64..1_000_000,
    ) {
        let acct = account(Decimal::new(opening, 2), None);
        let before = totals(Decimal::new(before_dr, 2), Decimal::new(before_cr, 2));
        let range = totals(Decimal::new(range_dr, 2), Decimal::new(range_cr, 2));
        let through = totals(before.debit + range.debit, before.credit + range.credit);

        let start = date(2026, 4, 1);
        let end = date(2026, 4, 30);
        prop_assert_eq!(
            ledger_opening(&acct, start, before) + range.net(),
            snapshot_balance(&acct, through, Some(end))
        );
    }
}
