//! Tests for account repository.

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use std::sync::Arc;
use std::collections::BTreeMap;

use super::*;

fn sample_account(code: &str) -> accounts::Model {
    let now = chrono::Utc::now().into();
    accounts::Model {
        id: Uuid::now_v7(),
        code: code.to_string(),
        name: "Cash at Bank".to_string(),
        account_type: AccountCategory::Asset,
        sub_type: None,
        parent_id: None,
        description: None,
        is_active: true,
        is_control_account: false,
        is_bank_account: true,
        gst_applicable: false,
        tax_treatment: None,
        report_group: None,
        opening_balance: dec!(1000.00),
        opening_balance_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        created_at: now,
        updated_at: now,
    }
}

fn create_input(code: &str) -> CreateAccountInput {
    CreateAccountInput {
        code: code.to_string(),
        name: "Cash at Bank".to_string(),
        account_type: AccountCategory::Asset,
        sub_type: None,
        parent_id: None,
        description: None,
        is_control_account: false,
        is_bank_account: true,
        gst_applicable: false,
        tax_treatment: None,
        report_group: None,
        opening_balance: Decimal::ZERO,
        opening_balance_date: None,
    }
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(count))])
}

#[rstest]
#[case(None, None, true)]
#[case(None, NaiveDate::from_ymd_opt(2026, 3, 31), true)]
#[case(NaiveDate::from_ymd_opt(2026, 1, 1), None, true)]
#[case(NaiveDate::from_ymd_opt(2026, 1, 1), NaiveDate::from_ymd_opt(2026, 1, 1), true)]
#[case(NaiveDate::from_ymd_opt(2026, 4, 1), NaiveDate::from_ymd_opt(2026, 3, 31), false)]
fn test_opening_applies(
    #[case] opening: Option<NaiveDate>,
    #[case] date: Option<NaiveDate>,
    #[case] expected: bool,
) {
    assert_eq!(opening_applies(opening, date), expected);
}

#[test]
fn test_error_mapping() {
    let err: AppError = AccountError::DuplicateCode("1010".into()).into();
    assert_eq!(err.error_code(), "CONFLICT");

    let err: AppError = AccountError::AccountNotFound(Uuid::nil()).into();
    assert_eq!(err.error_code(), "NOT_FOUND");

    let err: AppError = AccountError::NonZeroBalance {
        code: "1010".into(),
        balance: dec!(5),
    }
    .into();
    assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
    assert_eq!(
        err.messages(),
        vec!["Cannot deactivate account 1010: balance is 5".to_string()]
    );
}

#[tokio::test]
async fn test_create_rejects_duplicate_code() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_account("1010")]])
        .into_connection());
    let repo = AccountRepository::new(db.clone());

    let result = repo.create_account(db.as_ref(), create_input("1010")).await;
    assert!(matches!(result, Err(AccountError::DuplicateCode(code)) if code == "1010"));
}

#[tokio::test]
async fn test_create_rejects_missing_parent() {
    let parent_id = Uuid::now_v7();
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection());
    let repo = AccountRepository::new(db.clone());

    let mut input = create_input("1011");
    input.parent_id = Some(parent_id);
    let result = repo.create_account(db.as_ref(), input).await;
    assert!(matches!(result, Err(AccountError::ParentNotFound(id)) if id == parent_id));
}

#[tokio::test]
async fn test_update_blocks_type_change_with_lines() {
    let account = sample_account("1010");
    let id = account.id;
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .append_query_results([vec![count_row(3)]])
        .into_connection());
    let repo = AccountRepository::new(db.clone());

    let input = UpdateAccountInput {
        account_type: Some(AccountCategory::Expense),
        ..UpdateAccountInput::default()
    };
    let result = repo.update_account(db.as_ref(), id, input).await;
    assert!(matches!(result, Err(AccountError::HasJournalLines(3))));
}

#[tokio::test]
async fn test_update_missing_account() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection());
    let repo = AccountRepository::new(db.clone());

    let id = Uuid::now_v7();
    let result = repo
        .update_account(db.as_ref(), id, UpdateAccountInput::default())
        .await;
    assert!(matches!(result, Err(AccountError::AccountNotFound(missing)) if missing == id));
}

#[tokio::test]
async fn test_update_rejects_self_parent() {
    let account = sample_account("1010");
    let id = account.id;
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account]])
        .into_connection());
    let repo = AccountRepository::new(db.clone());

    let input = UpdateAccountInput {
        parent_id: Some(Some(id)),
        ..UpdateAccountInput::default()
    };
    let result = repo.update_account(db.as_ref(), id, input).await;
    assert!(matches!(result, Err(AccountError::SelfParent)));
}
