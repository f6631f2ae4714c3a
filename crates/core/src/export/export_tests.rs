use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sgbooks_shared::types::{AccountId, JournalEntryId, round_money};

use super::*;
use crate::accounts::AccountCategory;
use crate::reports::{AccountSnapshot, LedgerAccount, LedgerPosting, ReportService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot(code: &str, name: &str, category: AccountCategory, sub: &str, raw: Decimal) -> AccountSnapshot {
    AccountSnapshot {
        id: AccountId::new(),
        code: code.to_string(),
        name: name.to_string(),
        category,
        sub_type: Some(sub.to_string()),
        normal_balance: category.normal_balance(),
        raw_balance: raw,
    }
}

fn sample_accounts() -> Vec<AccountSnapshot> {
    vec![
        snapshot("1010", "Cash at Bank", AccountCategory::Asset, "Current Asset", dec!(15234.56)),
        snapshot("1200", "Trade Receivables", AccountCategory::Asset, "Current Asset", dec!(4800.00)),
        snapshot("1500", "Office Equipment", AccountCategory::Asset, "Fixed Asset", dec!(1234567.89)),
        snapshot("2010", "Trade Payables", AccountCategory::Liability, "Current Liability", dec!(-3200.00)),
        snapshot("3010", "Share Capital", AccountCategory::Equity, "Capital", dec!(-1240000.00)),
        snapshot("4010", "Sales", AccountCategory::Revenue, "Sales", dec!(-20000.00)),
        snapshot("6010", "Rent", AccountCategory::Expense, "Operating Expense", dec!(8597.55)),
    ]
}

fn balance_sheet() -> FinancialReport {
    ReportService::generate_balance_sheet("Acme Pte Ltd", date(2026, 12, 31), &sample_accounts(), None, false)
        .into()
}

fn long_ledger() -> FinancialReport {
    let postings = (0..200)
        .map(|i| LedgerPosting {
            entry_id: JournalEntryId::new(),
            entry_no: format!("JE-{i:06}"),
            entry_date: date(2026, 1, 1) + chrono::Days::new(i),
            description: Some(format!("Posting number {i}")),
            reference: None,
            debit: if i % 2 == 0 { dec!(100.00) } else { Decimal::ZERO },
            credit: if i % 2 == 0 { Decimal::ZERO } else { dec!(40.00) },
        })
        .collect();
    ReportService::generate_general_ledger(
        "Acme Pte Ltd",
        LedgerAccount {
            id: AccountId::new(),
            code: "1010".into(),
            name: "Cash at Bank".into(),
            category: AccountCategory::Asset,
        },
        date(2026, 1, 1),
        date(2026, 12, 31),
        dec!(500),
        postings,
    )
    .unwrap()
    .into()
}

fn find_amount(range: &calamine::Range<Data>, label: &str, column: usize) -> Option<Decimal> {
    range.rows().find_map(|row| {
        let matches = row.iter().any(|c| matches!(c, Data::String(s) if s == label));
        match (matches, row.get(column)) {
            (true, Some(Data::Float(f))) => Decimal::try_from(*f).ok().map(round_money),
            _ => None,
        }
    })
}

#[test]
fn test_excel_round_trip_reproduces_totals() {
    let report = balance_sheet();
    let FinancialReport::BalanceSheet(bs) = &report else {
        unreachable!()
    };
    let bytes = ReportEngine::new().export_report(&report, ExportFormat::Excel).unwrap();

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Balance Sheet".to_string()]);
    let range = workbook.worksheet_range("Balance Sheet").unwrap();

    assert_eq!(find_amount(&range, "Total Assets", 2), Some(bs.totals.total_assets));
    assert_eq!(find_amount(&range, "Total Liabilities", 2), Some(bs.totals.total_liabilities));
    assert_eq!(find_amount(&range, "Total Equity", 2), Some(bs.totals.total_equity));
    assert_eq!(
        find_amount(&range, "Total Liabilities and Equity", 2),
        Some(bs.totals.total_liabilities_and_equity)
    );
    assert_eq!(find_amount(&range, "Office Equipment", 2), Some(dec!(1234567.89)));
}

#[test]
fn test_excel_trial_balance_columns() {
    let tb = ReportService::generate_trial_balance("Acme Pte Ltd", date(2026, 12, 31), &sample_accounts(), false);
    let expected = (tb.total_debit, tb.total_credit);
    let bytes = ReportEngine::new()
        .export_report(&tb.into(), ExportFormat::Excel)
        .unwrap();

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Trial Balance").unwrap();
    assert_eq!(find_amount(&range, "Total", 3), Some(expected.0));
    assert_eq!(find_amount(&range, "Total", 4), Some(expected.1));
}

#[test]
fn test_pdf_is_loadable() {
    let bytes = ReportEngine::new().export_report(&balance_sheet(), ExportFormat::Pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_pdf_long_report_spans_pages() {
    let bytes = ReportEngine::new().export_report(&long_ledger(), ExportFormat::Pdf).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(doc.get_pages().len() > 1);
}

/// Every string drawn on every page, in content-stream order.
fn pdf_strings(bytes: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let mut strings = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let content = lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        for operation in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(lopdf::Object::String(bytes, _)) = operation.operands.first() {
                strings.push(String::from_utf8_lossy(bytes).into_owned());
            }
        }
    }
    strings
}

#[test]
fn test_pdf_prints_wide_amounts_and_headers_in_full() {
    let accounts = vec![
        snapshot("1010", "Cash at Bank", AccountCategory::Asset, "Current Asset", dec!(-1234567890.12)),
        snapshot("2010", "Overdraft", AccountCategory::Liability, "Current Liability", dec!(1234567890.12)),
    ];
    let prior = vec![snapshot("1010", "Cash at Bank", AccountCategory::Asset, "Current Asset", dec!(5))];
    let pl = ReportService::generate_profit_and_loss(
        "Acme Pte Ltd",
        date(2026, 1, 1),
        date(2026, 12, 31),
        &[snapshot("4010", "Sales", AccountCategory::Revenue, "Sales", dec!(-98765432109.87))],
        Some((date(2025, 1, 1), date(2025, 12, 31), &[])),
        false,
    )
    .unwrap();
    let bs = ReportService::generate_balance_sheet(
        "Acme Pte Ltd",
        date(2026, 12, 31),
        &accounts,
        Some((date(2025, 12, 31), &prior)),
        false,
    );

    let engine = ReportEngine::new();
    let strings = pdf_strings(&engine.export_report(&bs.into(), ExportFormat::Pdf).unwrap());
    assert!(strings.iter().any(|s| s == "-1,234,567,890.12"));

    let strings = pdf_strings(&engine.export_report(&pl.into(), ExportFormat::Pdf).unwrap());
    assert!(strings.iter().any(|s| s == "2025-01-01 to 2025-12-31"));
    assert!(strings.iter().any(|s| s == "98,765,432,109.87"));
}

#[test]
fn test_csv_export() {
    let bytes = ReportEngine::new().export_report(&balance_sheet(), ExportFormat::Csv).unwrap();
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let records: Vec<::csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(&records[0][0], "Acme Pte Ltd");
    assert_eq!(&records[1][0], "Balance Sheet");
    assert_eq!(records[3].iter().collect::<Vec<_>>(), vec!["Code", "Account", "2026-12-31"]);
    let office = records.iter().find(|r| r.get(0) == Some("1500")).unwrap();
    assert_eq!(&office[2], "1234567.89");
}

#[test]
fn test_json_export_keeps_shape() {
    let bytes = ReportEngine::new().export_report(&balance_sheet(), ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["title"], "Balance Sheet");
    assert_eq!(value["company_name"], "Acme Pte Ltd");
    assert!(value["assets"]["accounts"].is_array());
}

#[test]
fn test_format_parsing() {
    assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
    assert!(matches!(
        "docx".parse::<ExportFormat>(),
        Err(ExportError::UnsupportedFormat(_))
    ));
    assert_eq!(ExportFormat::Excel.extension(), "xlsx");
}

#[test]
fn test_sheet_name_sanitized() {
    assert_eq!(excel::sheet_name("General Ledger - 1010 Cash/Bank [SGD]"), "General Ledger - 1010 CashBank");
    assert_eq!(excel::sheet_name("???"), "Report");
}

#[test]
fn test_layout_groups_subsections() {
    let table = ReportTable::from(&balance_sheet());
    let labels: Vec<_> = table
        .rows
        .iter()
        .filter(|r| r.style == RowStyle::Subtotal)
        .filter_map(|r| match &r.cells[1] {
            Cell::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    assert!(labels.contains(&"Total Current Asset"));
    assert!(labels.contains(&"Total Fixed Asset"));
    assert!(table.rows.iter().all(|r| r.cells.len() == table.columns.len()));
}
