//! Unit tests for row mapping. No database required.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ledgerclose_core::ledger::{
    Account, AccountKind, Batch, BatchKind, BatchOrigin, BatchStatus, GlmKey, GlmRecord,
    JournalLine,
};
use ledgerclose_core::store::StoreError;
use ledgerclose_shared::types::{BatchNumber, LedgerNumber};
use rust_decimal_macros::dec;
use sea_orm::TryIntoModel;

use super::*;

fn ledger() -> LedgerNumber {
    LedgerNumber::new(43)
}

fn period_row(period: i32, base: rust_decimal::Decimal) -> glm_periods::Model {
    glm_periods::Model {
        ledger_number: 43,
        year: 2026,
        account_code: "0200".to_string(),
        cost_centre_code: "4300".to_string(),
        period_number: period,
        closing_balance: base,
        closing_foreign: dec!(0),
    }
}

#[test]
fn test_glm_rows_fill_gaps() {
    let header = glm::Model {
        ledger_number: 43,
        year: 2026,
        account_code: "0200".to_string(),
        cost_centre_code: "4300".to_string(),
        start_balance: dec!(10),
        start_foreign: dec!(0),
    };
    let rows = vec![period_row(3, dec!(25)), period_row(5, dec!(40))];

    let record = glm_from_rows(header, &rows, 6);

    assert_eq!(record.start_balance, dec!(10));
    assert_eq!(
        record.closing,
        vec![dec!(10), dec!(10), dec!(25), dec!(25), dec!(40), dec!(40)]
    );
}

#[test]
fn test_glm_written_one_row_per_period() {
    let mut record = GlmRecord::new(GlmKey::new(2026, "0200".into(), "4300".into()), 4);
    record.apply(2, dec!(7), dec!(0));

    let (header, rows) = glm_to_active(ledger(), &record);
    let header = header.try_into_model().unwrap();
    assert_eq!(header.account_code, "0200");
    assert_eq!(rows.len(), 4);

    let rows: Vec<glm_periods::Model> = rows
        .into_iter()
        .map(|r| r.try_into_model().unwrap())
        .collect();
    assert_eq!(rows[0].closing_balance, dec!(0));
    assert_eq!(rows[3].period_number, 4);
    assert_eq!(rows[3].closing_balance, dec!(7));

    let restored = glm_from_rows(header, &rows, 4);
    assert_eq!(restored, record);
}

#[test]
fn test_batch_lines_numbered_and_restored_in_order() {
    let batch = Batch {
        number: BatchNumber::new(12),
        kind: BatchKind::Gift,
        origin: BatchOrigin::Manual,
        year: 2026,
        period: 3,
        description: "Gifts".to_string(),
        status: BatchStatus::Posted,
        lines: vec![
            JournalLine::debit("0200", "4300", dec!(50)),
            JournalLine::credit("0100", "4300", dec!(50)).with_narrative("donor"),
        ],
    };

    let (header, lines) = batch_to_active(ledger(), &batch);
    let header = header.try_into_model().unwrap();
    assert_eq!(header.kind, "gift");
    assert_eq!(header.status, "posted");

    let mut lines: Vec<journal_lines::Model> = lines
        .into_iter()
        .map(|l| l.try_into_model().unwrap())
        .collect();
    assert_eq!(lines[1].line_number, 2);
    lines.reverse();

    assert_eq!(batch_from_rows(header, lines).unwrap(), batch);
}

#[test]
fn test_unknown_enum_value_is_corrupt() {
    let row = accounts::Model {
        ledger_number: 43,
        code: "0200".to_string(),
        name: "Bank".to_string(),
        kind: "cash".to_string(),
        foreign_currency: None,
        is_suspense: false,
        is_active: true,
    };

    let err = account_from_model(row).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(ref m) if m.contains("accounts.kind")));
}

#[test]
fn test_account_mapping() {
    let account = Account::new("0210", "Bank USD", AccountKind::Asset).in_currency("usd");
    let row = account_to_active(ledger(), &account).try_into_model().unwrap();

    assert_eq!(row.foreign_currency.as_deref(), Some("USD"));
    assert_eq!(account_from_model(row).unwrap(), account);
}

#[test]
fn test_period_mapping() {
    let row = accounting_periods::Model {
        ledger_number: 43,
        period_number: 2,
        name: "February 2026".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        status: "closed".to_string(),
    };

    let period = period_from_model(row).unwrap();
    assert!(!period.is_open());
    assert_eq!(period.number, 2);
}

#[test]
fn test_changes() {
    let before: BTreeMap<i32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
    let after: BTreeMap<i32, &str> = [(1, "a"), (2, "B"), (4, "d")].into_iter().collect();

    let diff = changes(&before, &after);
    assert_eq!(diff.stale, vec![&2, &3]);
    assert_eq!(diff.fresh, vec![&"B", &"d"]);

    assert!(changes(&before, &before).is_empty());
}
