//! Tests for invoice posting helpers.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal_macros::dec;
use sgbooks_core::ledger::validate_journal_lines;

use super::*;

fn posting(kind: InvoiceKind, rate: Decimal) -> InvoicePosting<'static> {
    InvoicePosting {
        kind,
        control_account: Uuid::from_u128(1),
        gst_account: Some(Uuid::from_u128(2)),
        currency_code: "SGD",
        exchange_rate: rate,
        invoice_no: "INV-000001",
    }
}

fn line(subtotal: Decimal, tax_code: Option<&str>, tax: Decimal) -> PostingLine {
    PostingLine {
        account_id: Uuid::from_u128(10),
        description: "Consulting".to_string(),
        subtotal,
        tax_code: tax_code.map(ToString::to_string),
        tax_amount: tax,
    }
}

#[test]
fn test_sales_invoice_posts_revenue_gst_and_receivable() {
    let lines = vec![
        line(dec!(1000.00), Some("SR"), dec!(90.00)),
        line(dec!(200.00), Some("ZR"), Decimal::ZERO),
    ];
    let journal = invoice_journal_lines(&posting(InvoiceKind::Sales, Decimal::ONE), &lines).unwrap();

    assert_eq!(journal.len(), 4);
    assert_eq!(journal[0].credit_amount, dec!(1000.00));
    assert_eq!(journal[0].tax_code.as_deref(), Some("SR"));
    assert_eq!(journal[0].tax_amount, dec!(90.00));
    assert_eq!(journal[1].tax_code.as_deref(), Some("ZR"));
    assert_eq!(journal[2].account_id.into_inner(), Uuid::from_u128(2));
    assert_eq!(journal[2].credit_amount, dec!(90.00));
    assert_eq!(journal[3].account_id.into_inner(), Uuid::from_u128(1));
    assert_eq!(journal[3].debit_amount, dec!(1290.00));
    assert!(validate_journal_lines(&journal).is_ok());
}

#[test]
fn test_purchase_invoice_mirrors_sales() {
    let lines = vec![line(dec!(500.00), Some("TX"), dec!(45.00))];
    let journal =
        invoice_journal_lines(&posting(InvoiceKind::Purchase, Decimal::ONE), &lines).unwrap();

    assert_eq!(journal[0].debit_amount, dec!(500.00));
    assert_eq!(journal[1].debit_amount, dec!(45.00));
    assert_eq!(journal[2].credit_amount, dec!(545.00));
}

#[test]
fn test_foreign_currency_converted_to_base() {
    let lines = vec![line(dec!(100.00), Some("SR"), dec!(9.00))];
    let journal = invoice_journal_lines(&posting(InvoiceKind::Sales, dec!(1.3456)), &lines).unwrap();

    assert_eq!(journal[0].credit_amount, dec!(134.56));
    assert_eq!(journal[0].exchange_rate, dec!(1.3456));
    assert_eq!(journal[1].credit_amount, dec!(12.11));
    assert_eq!(journal[2].debit_amount, dec!(146.67));
}

#[test]
fn test_tax_without_gst_account_is_rejected() {
    let mut without_gst = posting(InvoiceKind::Sales, Decimal::ONE);
    without_gst.gst_account = None;
    let err = invoice_journal_lines(&without_gst, &[line(dec!(10), Some("SR"), dec!(0.90))])
        .unwrap_err();
    assert_eq!(err, GstError::MissingAccount("SYS-GST-OUTPUT".to_string()));
}

#[test]
fn test_zero_lines_are_skipped() {
    let lines = vec![line(Decimal::ZERO, None, Decimal::ZERO), line(dec!(50), None, Decimal::ZERO)];
    let journal = invoice_journal_lines(&posting(InvoiceKind::Sales, Decimal::ONE), &lines).unwrap();
    assert_eq!(journal.len(), 2);
}

#[rstest]
#[case(None, 30, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())]
#[case(None, 0, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())]
#[case(None, -5, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())]
#[case(NaiveDate::from_ymd_opt(2026, 4, 15), 30, NaiveDate::from_ymd_opt(2026, 4, 15).unwrap())]
fn test_due_date_resolution(
    #[case] requested: Option<NaiveDate>,
    #[case] terms: i32,
    #[case] expected: NaiveDate,
) {
    let invoice_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(resolve_due_date(invoice_date, requested, terms).unwrap(), expected);
}

#[test]
fn test_due_date_before_invoice_date_rejected() {
    let invoice_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let err = resolve_due_date(invoice_date, NaiveDate::from_ymd_opt(2026, 2, 1), 30).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_only_drafts_can_change() {
    assert!(require_draft(InvoiceStatus::Draft).is_ok());
    assert!(require_draft(InvoiceStatus::Approved).is_err());
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_invoice_entries_always_balance(
        amounts in prop::collection::vec((amount(), amount()), 1..8),
        rate_bp in 5_000i64..30_000,
        purchase in any::<bool>(),
    ) {
        let kind = if purchase { InvoiceKind::Purchase } else { InvoiceKind::Sales };
        let lines: Vec<PostingLine> = amounts
            .iter()
            .map(|(subtotal, tax)| line(*subtotal, Some("SR"), *tax))
            .collect();
        let journal = invoice_journal_lines(&posting(kind, Decimal::new(rate_bp, 4)), &lines).unwrap();

        let debits: Decimal = journal.iter().map(|l| l.debit_amount).sum();
        let credits: Decimal = journal.iter().map(|l| l.credit_amount).sum();
        prop_assert_eq!(debits, credits);
        prop_assert!(journal.iter().all(|l| l.debit_amount.is_zero() != l.credit_amount.is_zero()));
    }
}
