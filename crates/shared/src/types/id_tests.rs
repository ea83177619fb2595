use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = RunId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = RunId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(RunId::from_str("invalid").is_err());
}

#[test]
fn test_typed_number_roundtrip() {
    let ledger = LedgerNumber::from_str(" 43 ").unwrap();
    assert_eq!(ledger, LedgerNumber::new(43));
    assert_eq!(ledger.value(), 43);
    assert_eq!(ledger.to_string(), "43");
}

#[test]
fn test_typed_number_ordering() {
    assert!(BatchNumber::new(2) > BatchNumber::new(1));
    assert!(BatchNumber::from_str("two").is_err());
}

#[test]
fn test_typed_code_normalizes() {
    let code = AccountCode::new(" 9700a ");
    assert_eq!(code.as_str(), "9700A");
    assert_eq!(code, AccountCode::from("9700A"));
    assert!(!code.is_empty());
    assert!(CostCentreCode::new("   ").is_empty());
}

#[test]
fn test_currency_code_display() {
    let eur = CurrencyCode::from("eur");
    assert_eq!(format!("{eur}"), "EUR");
}

#[test]
fn test_typed_code_serializes_transparently() {
    let code = CostCentreCode::new("4300");
    let json = serde_json::to_string(&code).unwrap();
    assert_eq!(json, "\"4300\"");
    let back: CostCentreCode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, code);
}
