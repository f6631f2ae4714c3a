//! Tests for the journal entry manager.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::Arc;
use sgbooks_core::ledger::JournalType;
use sgbooks_db::entities::{journal_entry_lines, sea_orm_active_enums};

use super::*;
use crate::dto::JournalLineDto;

fn header(is_posted: bool, is_reversed: bool) -> journal_entries::Model {
    let now = chrono::Utc::now().into();
    journal_entries::Model {
        id: Uuid::now_v7(),
        entry_no: "JE-000042".to_string(),
        journal_type: sea_orm_active_enums::JournalType::General,
        entry_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        fiscal_period_id: Uuid::now_v7(),
        description: "Accrued audit fee".to_string(),
        reference: None,
        is_posted,
        posted_at: None,
        is_reversed,
        reversing_entry_id: None,
        source_type: None,
        source_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn manager_returning(entry: journal_entries::Model) -> JournalEntryManager {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![entry]])
        .append_query_results([Vec::<journal_entry_lines::Model>::new()])
        .into_connection());
    JournalEntryManager::new(db)
}

fn dto_line(debit: Decimal, credit: Decimal) -> JournalLineDto {
    JournalLineDto {
        account_id: Uuid::now_v7(),
        description: None,
        debit_amount: debit,
        credit_amount: credit,
        currency_code: "SGD".into(),
        exchange_rate: Decimal::ONE,
        tax_code: None,
        tax_amount: Decimal::ZERO,
    }
}

#[tokio::test]
async fn test_unbalanced_entry_rejected_before_any_query() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let manager = JournalEntryManager::new(db);

    let err = manager
        .create_entry(JournalEntryDto {
            journal_type: JournalType::General,
            entry_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            description: "Accrual".into(),
            reference: None,
            lines: vec![
                dto_line(dec!(500), Decimal::ZERO),
                dto_line(Decimal::ZERO, dec!(450)),
            ],
        })
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_post_already_posted_entry() {
    let manager = manager_returning(header(true, false));
    let err = manager.post_entry(Uuid::now_v7()).await.unwrap_err();
    assert!(err.messages()[0].contains("JE-000042"));
}

#[tokio::test]
async fn test_reverse_requires_posted_entry() {
    let manager = manager_returning(header(false, false));
    let err = manager
        .reverse_entry(Uuid::now_v7(), NaiveDate::from_ymd_opt(2026, 4, 30).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_user_error());
    assert!(err.messages()[0].contains("JE-000042"));
}

#[tokio::test]
async fn test_reverse_twice_rejected() {
    let manager = manager_returning(header(true, true));
    let err = manager
        .reverse_entry(Uuid::now_v7(), NaiveDate::from_ymd_opt(2026, 4, 30).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_get_missing_entry_is_not_found() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<journal_entries::Model>::new()])
        .into_connection());
    let manager = JournalEntryManager::new(db);

    let err = manager.get_entry(Uuid::now_v7()).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}
