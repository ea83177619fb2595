//! Tests for the ledger book aggregate.

use ledgerclose_shared::types::{AccountCode, BatchNumber, CostCentreCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{BatchKind, BatchStatus, GlmKey, JournalLine, LedgerFlag, PostingService};
use crate::test_support::{BANK, EXPENSE, MAIN_CC, demo_book, post_gift};

#[test]
fn test_batch_numbers_are_sequential() {
    let mut book = demo_book();
    let lines = || {
        vec![
            JournalLine::debit(EXPENSE, MAIN_CC, dec!(1)),
            JournalLine::credit(BANK, MAIN_CC, dec!(1)),
        ]
    };

    let first = book.add_batch(BatchKind::Gl, 1, "a", lines());
    let second = book.add_batch(BatchKind::Gift, 1, "b", lines());

    assert_eq!(first, BatchNumber::new(1));
    assert_eq!(second, BatchNumber::new(2));
    assert_eq!(book.ledger.last_batch_number, 2);
    assert_eq!(book.batch(first).unwrap().year, 2026);
}

#[test]
fn test_unposted_batches_filters_kind_and_period() {
    let mut book = demo_book();
    let lines = || {
        vec![
            JournalLine::debit(EXPENSE, MAIN_CC, dec!(1)),
            JournalLine::credit(BANK, MAIN_CC, dec!(1)),
        ]
    };

    let gl = book.add_batch(BatchKind::Gl, 1, "gl", lines());
    book.add_batch(BatchKind::Gl, 2, "later", lines());
    book.add_batch(BatchKind::Gift, 1, "gift", lines());
    let posted = book.add_batch(BatchKind::Gl, 1, "posted", lines());
    PostingService::post(&mut book, posted).unwrap();

    let found: Vec<_> = book
        .unposted_batches(BatchKind::Gl, 2026, 1)
        .map(|b| b.number)
        .collect();
    assert_eq!(found, vec![gl]);
    assert_eq!(book.batch(posted).unwrap().status, BatchStatus::Posted);
}

#[test]
fn test_glm_entry_sized_to_all_periods() {
    let mut book = demo_book();
    let key = GlmKey::new(2026, AccountCode::from(BANK), CostCentreCode::from(MAIN_CC));

    let record = book.glm_entry(key.clone());
    assert_eq!(record.closing.len(), 16);
    assert!(book.glm(2026, &key.account, &key.cost_centre).is_some());
}

#[test]
fn test_balances_and_trial_balance() {
    let mut book = demo_book();
    post_gift(&mut book, 1, MAIN_CC, dec!(100));
    post_gift(&mut book, 2, "4310", dec!(50));

    let bank = AccountCode::from(BANK);
    assert_eq!(book.account_balance(2026, &bank, 1), dec!(100));
    assert_eq!(book.account_balance(2026, &bank, 2), dec!(150));
    assert_eq!(book.account_balance(2025, &bank, 2), Decimal::ZERO);
    assert_eq!(book.trial_balance(2026, 2), Decimal::ZERO);
}

#[test]
fn test_flags() {
    let mut book = demo_book();
    let flag = LedgerFlag::Revaluation { year: 2026, period: 1 };

    assert!(!book.has_flag(flag));
    book.set_flag(flag);
    assert!(book.has_flag(flag));
    assert!(!book.has_flag(LedgerFlag::Revaluation { year: 2026, period: 2 }));
}
