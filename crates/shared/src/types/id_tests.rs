use super::*;
use std::str::FromStr;

#[test]
fn test_new_ids_are_time_ordered() {
    let first = JournalEntryId::new();
    let second = JournalEntryId::new();
    assert!(first <= second);
    assert_eq!(first.into_inner().get_version_num(), 7);
}

#[test]
fn test_uuid_round_trips_through_conversions() {
    let uuid = Uuid::from_u128(42);
    let account: AccountId = uuid.into();
    assert_eq!(Uuid::from(account), uuid);
    assert_eq!(AccountId::from_uuid(uuid), account);
}

#[test]
fn test_display_matches_uuid() {
    let uuid = Uuid::from_u128(7);
    assert_eq!(FiscalPeriodId::from_uuid(uuid).to_string(), uuid.to_string());
}

#[test]
fn test_parse() {
    let uuid = Uuid::now_v7();
    assert_eq!(AccountId::from_str(&uuid.to_string()).unwrap().into_inner(), uuid);
    assert!(AccountId::from_str("1100").is_err());
}

#[test]
fn test_serializes_as_bare_uuid() {
    let uuid = Uuid::from_u128(1);
    let json = serde_json::to_string(&FiscalYearId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
