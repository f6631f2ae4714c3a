//! Tests for statement generation, including property-based checks of the
//! accounting identities.

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sgbooks_shared::types::{AccountId, JournalEntryId};

use super::error::ReportError;
use super::service::{CURRENT_YEAR_EARNINGS, ReportService};
use super::types::{AccountSnapshot, LedgerAccount, LedgerPosting};
use crate::accounts::{AccountCategory, NormalBalance};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot(code: &str, category: AccountCategory, sub_type: Option<&str>, raw: Decimal) -> AccountSnapshot {
    AccountSnapshot {
        id: AccountId::new(),
        code: code.to_string(),
        name: format!("Account {code}"),
        category,
        sub_type: sub_type.map(str::to_string),
        normal_balance: category.normal_balance(),
        raw_balance: raw,
    }
}

/// A small chart of accounts covering every category.
fn chart() -> Vec<(String, AccountCategory, Option<&'static str>)> {
    vec![
        ("1010".into(), AccountCategory::Asset, Some("Current Asset")),
        ("1200".into(), AccountCategory::Asset, Some("Current Asset")),
        ("1500".into(), AccountCategory::Asset, Some("Fixed Asset")),
        ("2010".into(), AccountCategory::Liability, Some("Current Liability")),
        ("2500".into(), AccountCategory::Liability, None),
        ("3010".into(), AccountCategory::Equity, Some("Share Capital")),
        ("4010".into(), AccountCategory::Revenue, Some("Sales")),
        ("4900".into(), AccountCategory::Revenue, None),
        ("5010".into(), AccountCategory::Expense, Some("Cost of Sales")),
        ("6010".into(), AccountCategory::Expense, Some("Operating Expense")),
    ]
}

/// Applies balanced two-line entries to the chart and returns snapshots.
fn ledger_from_entries(entries: &[(usize, usize, i64)]) -> Vec<AccountSnapshot> {
    let chart = chart();
    let mut raw = vec![Decimal::ZERO; chart.len()];
    for (dr, cr, cents) in entries {
        let amount = Decimal::new(*cents, 2);
        raw[dr % chart.len()] += amount;
        raw[cr % chart.len()] -= amount;
    }
    chart
        .into_iter()
        .zip(raw)
        .map(|((code, category, sub), balance)| snapshot(&code, category, sub, balance))
        .collect()
}

/// Flips an account to the opposite natural side, as a contra account.
fn contra(mut account: AccountSnapshot) -> AccountSnapshot {
    account.normal_balance = match account.normal_balance {
        NormalBalance::Debit => NormalBalance::Credit,
        NormalBalance::Credit => NormalBalance::Debit,
    };
    account
}

fn earnings_line(report: &super::types::BalanceSheet) -> Decimal {
    report
        .equity
        .accounts
        .iter()
        .find(|l| l.name == CURRENT_YEAR_EARNINGS)
        .map_or(Decimal::ZERO, |l| l.balance)
}

fn entry_strategy() -> impl Strategy<Value = (usize, usize, i64)> {
    (0usize..10, 0usize..10, 1i64..100_000_000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of balanced postings the trial balance columns agree.
    #[test]
    fn prop_trial_balance_balanced(entries in prop::collection::vec(entry_strategy(), 0..40)) {
        let accounts = ledger_from_entries(&entries);
        let report = ReportService::generate_trial_balance("Acme", date(2026, 12, 31), &accounts, false);

        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.total_debit, report.total_credit);
        prop_assert!(report.accounts.iter().all(|l| l.debit >= Decimal::ZERO && l.credit >= Decimal::ZERO));
        prop_assert!(report.accounts.iter().all(|l| l.debit.is_zero() || l.credit.is_zero()));
    }

    /// For any set of balanced postings assets equal liabilities plus equity.
    #[test]
    fn prop_balance_sheet_equation(
        entries in prop::collection::vec(entry_strategy(), 0..40),
        prior_entries in prop::collection::vec(entry_strategy(), 0..20),
        include_zero in any::<bool>(),
    ) {
        let accounts = ledger_from_entries(&entries);
        let prior = ledger_from_entries(&prior_entries);
        let report = ReportService::generate_balance_sheet(
            "Acme",
            date(2026, 12, 31),
            &accounts,
            Some((date(2025, 12, 31), &prior)),
            include_zero,
        );

        prop_assert!(report.totals.is_balanced);
        prop_assert_eq!(report.totals.total_assets, report.totals.total_liabilities_and_equity);
        let comparative = report.comparative_totals.unwrap();
        prop_assert!(comparative.is_balanced);
    }

    /// Accounts whose natural side differs from their category still net
    /// into balanced statements, and P&L agrees with current year earnings.
    #[test]
    fn prop_statements_hold_with_contra_accounts(
        entries in prop::collection::vec(entry_strategy(), 0..40),
        flips in prop::collection::vec(any::<bool>(), 10),
        include_zero in any::<bool>(),
    ) {
        let accounts: Vec<AccountSnapshot> = ledger_from_entries(&entries)
            .into_iter()
            .zip(&flips)
            .map(|(account, flip)| if *flip { contra(account) } else { account })
            .collect();

        let bs = ReportService::generate_balance_sheet("Acme", date(2026, 12, 31), &accounts, None, include_zero);
        prop_assert!(bs.totals.is_balanced);
        prop_assert_eq!(bs.totals.total_assets, bs.totals.total_liabilities_and_equity);

        let pl = ReportService::generate_profit_and_loss(
            "Acme",
            date(2026, 1, 1),
            date(2026, 12, 31),
            &accounts,
            None,
            include_zero,
        ).unwrap();
        prop_assert_eq!(pl.totals.net_profit, earnings_line(&bs));

        let tb = ReportService::generate_trial_balance("Acme", date(2026, 12, 31), &accounts, include_zero);
        prop_assert!(tb.is_balanced);
    }

    /// Section totals equal the sum of their lines and of their groups.
    #[test]
    fn prop_section_totals_consistent(entries in prop::collection::vec(entry_strategy(), 0..40)) {
        let accounts = ledger_from_entries(&entries);
        let report = ReportService::generate_balance_sheet("Acme", date(2026, 12, 31), &accounts, None, true);

        for section in [&report.assets, &report.liabilities, &report.equity] {
            let by_lines: Decimal = section.accounts.iter().map(|l| l.balance).sum();
            let by_groups: Decimal = section.groups.iter().map(|g| g.total).sum();
            prop_assert_eq!(section.total, by_lines);
            prop_assert_eq!(section.total, by_groups);
        }
    }

    /// The general ledger closes at opening plus debits minus credits.
    #[test]
    fn prop_general_ledger_closing(
        opening in -100_000_000i64..100_000_000,
        lines in prop::collection::vec((0u32..365, 1i64..10_000_000, any::<bool>()), 0..50),
    ) {
        let opening = Decimal::new(opening, 2);
        let postings: Vec<LedgerPosting> = lines
            .iter()
            .enumerate()
            .map(|(i, (day, cents, is_debit))| {
                let amount = Decimal::new(*cents, 2);
                LedgerPosting {
                    entry_id: JournalEntryId::new(),
                    entry_no: format!("JE-{i:06}"),
                    entry_date: date(2026, 1, 1) + chrono::Days::new(u64::from(*day)),
                    description: None,
                    reference: None,
                    debit: if *is_debit { amount } else { Decimal::ZERO },
                    credit: if *is_debit { Decimal::ZERO } else { amount },
                }
            })
            .collect();

        let report = ReportService::generate_general_ledger(
            "Acme",
            ledger_account(),
            date(2026, 1, 1),
            date(2026, 12, 31),
            opening,
            postings,
        ).unwrap();

        prop_assert_eq!(report.closing_balance, report.opening_balance + report.total_debit - report.total_credit);
        if let Some(last) = report.lines.last() {
            prop_assert_eq!(last.balance, report.closing_balance);
        }
        for pair in report.lines.windows(2) {
            prop_assert!(pair[0].entry_date <= pair[1].entry_date);
            prop_assert_eq!(pair[1].balance, pair[0].balance + pair[1].debit - pair[1].credit);
        }
    }
}

fn ledger_account() -> LedgerAccount {
    LedgerAccount {
        id: AccountId::new(),
        code: "1010".to_string(),
        name: "Cash at Bank".to_string(),
        category: AccountCategory::Asset,
    }
}

#[test]
fn test_opening_balances_only_balance_sheet() {
    let accounts = vec![
        snapshot("1010", AccountCategory::Asset, None, dec!(1000.00)),
        snapshot("2010", AccountCategory::Liability, None, dec!(-1000.00)),
    ];
    let report = ReportService::generate_balance_sheet("Acme", date(2026, 1, 1), &accounts, None, false);

    assert_eq!(report.totals.total_assets, dec!(1000.00));
    assert_eq!(report.totals.total_liabilities, dec!(1000.00));
    assert_eq!(report.totals.total_equity, Decimal::ZERO);
    assert!(report.totals.is_balanced);
    // Zero current year earnings is filtered out.
    assert!(report.equity.accounts.is_empty());

    let accounts = vec![
        snapshot("1010", AccountCategory::Asset, None, dec!(1000.00)),
        snapshot("3010", AccountCategory::Equity, None, dec!(-1000.00)),
    ];
    let report = ReportService::generate_balance_sheet("Acme", date(2026, 1, 1), &accounts, None, false);
    assert_eq!(report.totals.total_equity, dec!(1000.00));
    assert!(report.totals.is_balanced);
}

#[test]
fn test_current_year_earnings_line() {
    let accounts = vec![
        snapshot("1010", AccountCategory::Asset, Some("Current Asset"), dec!(1090)),
        snapshot("2010", AccountCategory::Liability, Some("Current Liability"), dec!(-90)),
        snapshot("4010", AccountCategory::Revenue, Some("Sales"), dec!(-1000)),
        snapshot("6010", AccountCategory::Expense, None, dec!(200)),
        snapshot("1020", AccountCategory::Asset, Some("Current Asset"), dec!(-200)),
    ];
    let report = ReportService::generate_balance_sheet("Acme", date(2026, 3, 31), &accounts, None, false);

    let earnings = report
        .equity
        .accounts
        .iter()
        .find(|l| l.name == CURRENT_YEAR_EARNINGS)
        .unwrap();
    assert_eq!(earnings.balance, dec!(800));
    assert!(earnings.id.is_none());
    assert_eq!(report.totals.total_assets, dec!(890));
    assert_eq!(report.totals.total_liabilities_and_equity, dec!(890));
    assert_eq!(report.assets.groups.len(), 1);
    assert_eq!(report.assets.groups[0].name, "Current Asset");
}

#[rstest]
#[case::accumulated_depreciation(
    vec![
        snapshot("1500", AccountCategory::Asset, Some("Fixed Asset"), dec!(10000)),
        contra(snapshot("1590", AccountCategory::Asset, Some("Fixed Asset"), dec!(-2000))),
        snapshot("3010", AccountCategory::Equity, None, dec!(-8000)),
    ],
    dec!(8000),
    dec!(0),
)]
#[case::sales_returns(
    vec![
        snapshot("1010", AccountCategory::Asset, None, dec!(900)),
        snapshot("4010", AccountCategory::Revenue, Some("Sales"), dec!(-1000)),
        contra(snapshot("4050", AccountCategory::Revenue, Some("Sales"), dec!(100))),
    ],
    dec!(900),
    dec!(900),
)]
fn test_contra_accounts_reduce_their_section(
    #[case] accounts: Vec<AccountSnapshot>,
    #[case] expected_assets: Decimal,
    #[case] expected_profit: Decimal,
) {
    let bs = ReportService::generate_balance_sheet("Acme", date(2026, 12, 31), &accounts, None, false);
    assert_eq!(bs.totals.total_assets, expected_assets);
    assert!(bs.totals.is_balanced);
    assert_eq!(earnings_line(&bs), expected_profit);
    assert_eq!(bs.totals.total_equity, expected_assets - bs.totals.total_liabilities);

    let pl = ReportService::generate_profit_and_loss(
        "Acme",
        date(2026, 1, 1),
        date(2026, 12, 31),
        &accounts,
        None,
        false,
    )
    .unwrap();
    assert_eq!(pl.totals.net_profit, expected_profit);

    // The contra line shows as a deduction within its own group.
    let contra_line = bs
        .assets
        .accounts
        .iter()
        .chain(&pl.revenue.accounts)
        .find(|l| l.code == "1590" || l.code == "4050")
        .unwrap();
    assert!(contra_line.balance < Decimal::ZERO);
}

#[test]
fn test_zero_filter_and_comparative_alignment() {
    let current = vec![
        snapshot("1010", AccountCategory::Asset, None, dec!(500)),
        snapshot("1020", AccountCategory::Asset, None, Decimal::ZERO),
        snapshot("1030", AccountCategory::Asset, None, Decimal::ZERO),
        snapshot("3010", AccountCategory::Equity, None, dec!(-500)),
    ];
    let mut prior = current.clone();
    prior[0].raw_balance = dec!(300);
    prior[1].raw_balance = dec!(200);
    prior[2].raw_balance = Decimal::ZERO;

    let report = ReportService::generate_balance_sheet(
        "Acme",
        date(2026, 12, 31),
        &current,
        Some((date(2025, 12, 31), &prior)),
        false,
    );

    let codes: Vec<_> = report.assets.accounts.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["1010", "1020"]);
    assert_eq!(report.assets.accounts[1].balance, Decimal::ZERO);
    assert_eq!(report.assets.accounts[1].comparative_balance, Some(dec!(200)));
    assert_eq!(report.assets.comparative_total, Some(dec!(500)));
    assert_eq!(report.comparative_date, Some(date(2025, 12, 31)));

    let with_zero = ReportService::generate_balance_sheet("Acme", date(2026, 12, 31), &current, None, true);
    assert_eq!(with_zero.assets.accounts.len(), 3);
    assert!(with_zero.assets.accounts.iter().all(|l| l.comparative_balance.is_none()));
}

#[test]
fn test_profit_and_loss() {
    let activity = vec![
        snapshot("4010", AccountCategory::Revenue, Some("Sales"), dec!(-5000)),
        snapshot("4900", AccountCategory::Revenue, None, dec!(-250)),
        snapshot("5010", AccountCategory::Expense, Some("Cost of Sales"), dec!(3000)),
        snapshot("6010", AccountCategory::Expense, Some("Operating Expense"), dec!(1250)),
        snapshot("1010", AccountCategory::Asset, None, dec!(999)),
    ];
    let prior = vec![snapshot("4010", AccountCategory::Revenue, Some("Sales"), dec!(-4000))];

    let report = ReportService::generate_profit_and_loss(
        "Acme",
        date(2026, 1, 1),
        date(2026, 12, 31),
        &activity,
        Some((date(2025, 1, 1), date(2025, 12, 31), &prior)),
        false,
    )
    .unwrap();

    assert_eq!(report.totals.total_revenue, dec!(5250));
    assert_eq!(report.totals.total_expenses, dec!(4250));
    assert_eq!(report.totals.net_profit, dec!(1000));
    let prior_totals = report.comparative_totals.unwrap();
    assert_eq!(prior_totals.total_revenue, dec!(4000));
    assert_eq!(prior_totals.net_profit, dec!(4000));
    assert_eq!(report.revenue.groups[1].name, "Other Revenue");
}

#[test]
fn test_inverted_range_rejected() {
    let err = ReportService::generate_profit_and_loss(
        "Acme",
        date(2026, 12, 31),
        date(2026, 1, 1),
        &[],
        None,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::InvalidDateRange { .. }));

    let err = ReportService::generate_general_ledger(
        "Acme",
        ledger_account(),
        date(2026, 2, 1),
        date(2026, 1, 1),
        Decimal::ZERO,
        Vec::new(),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
}

#[test]
fn test_empty_ledger_gives_zero_structures() {
    let bs = ReportService::generate_balance_sheet("Acme", date(2026, 1, 1), &[], None, false);
    assert!(bs.assets.accounts.is_empty());
    assert_eq!(bs.totals.total_assets, Decimal::ZERO);
    assert!(bs.totals.is_balanced);

    let tb = ReportService::generate_trial_balance("Acme", date(2026, 1, 1), &[], false);
    assert!(tb.accounts.is_empty());
    assert!(tb.is_balanced);
}

#[test]
fn test_trial_balance_columns_by_natural_side() {
    let accounts = vec![
        snapshot("1010", AccountCategory::Asset, None, dec!(700)),
        snapshot("1020", AccountCategory::Asset, None, dec!(-100)),
        snapshot("2010", AccountCategory::Liability, None, dec!(-800)),
        snapshot("2020", AccountCategory::Liability, None, dec!(200)),
    ];
    let tb = ReportService::generate_trial_balance("Acme", date(2026, 1, 1), &accounts, false);

    let cols: Vec<_> = tb.accounts.iter().map(|l| (l.debit, l.credit)).collect();
    assert_eq!(
        cols,
        vec![
            (dec!(700), Decimal::ZERO),
            (Decimal::ZERO, dec!(100)),
            (Decimal::ZERO, dec!(800)),
            (dec!(200), Decimal::ZERO),
        ]
    );
    assert_eq!(tb.total_debit, dec!(900));
    assert!(tb.is_balanced);
}

#[test]
fn test_report_serializes_to_nested_shape() {
    let accounts = vec![snapshot("1010", AccountCategory::Asset, None, dec!(10))];
    let bs = ReportService::generate_balance_sheet("Acme", date(2026, 1, 1), &accounts, None, false);
    let json = serde_json::to_value(&bs).unwrap();

    assert_eq!(json["title"], "Balance Sheet");
    assert_eq!(json["assets"]["accounts"][0]["code"], "1010");
    assert!(json["assets"]["accounts"][0]["id"].is_string());
    assert_eq!(json["totals"]["is_balanced"], false);
}
