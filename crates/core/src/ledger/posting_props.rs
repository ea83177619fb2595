//! Property-based tests for posting.
//!
//! - Posted books always have a zero trial balance
//! - Balances are cumulative over periods
//! - Rejected batches leave the book untouched

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{BatchKind, JournalLine, PostingService};
use crate::test_support::{BANK, EXPENSE, GIFT_INCOME, MAIN_CC, demo_book, post};

/// Amounts from 0.01 to 100,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Last period the demo ledger accepts postings for while it sits on period 1.
const LAST_POSTABLE: i32 = 5;

/// Periods inside the demo ledger's posting window.
fn postable_period() -> impl Strategy<Value = i32> {
    1i32..=LAST_POSTABLE
}

#[test]
fn test_posting_window_matches_demo_ledger() {
    assert_eq!(demo_book().ledger.last_postable_period(), LAST_POSTABLE);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_trial_balance_stays_zero(
        postings in prop::collection::vec((postable_period(), amount(), amount()), 1..12),
    ) {
        let mut book = demo_book();
        for (period, gift, spend) in &postings {
            post(
                &mut book,
                BatchKind::Gl,
                *period,
                vec![
                    JournalLine::debit(BANK, MAIN_CC, *gift),
                    JournalLine::credit(GIFT_INCOME, MAIN_CC, *gift),
                    JournalLine::debit(EXPENSE, MAIN_CC, *spend),
                    JournalLine::credit(BANK, MAIN_CC, *spend),
                ],
            );
        }

        for period in 1..=16 {
            prop_assert_eq!(book.trial_balance(2026, period), Decimal::ZERO);
        }
    }

    #[test]
    fn prop_balance_is_cumulative(
        postings in prop::collection::vec((postable_period(), amount()), 1..12),
        at_period in 1i32..=16,
    ) {
        let mut book = demo_book();
        for (period, gift) in &postings {
            post(
                &mut book,
                BatchKind::Gift,
                *period,
                vec![
                    JournalLine::debit(BANK, MAIN_CC, *gift),
                    JournalLine::credit(GIFT_INCOME, MAIN_CC, *gift),
                ],
            );
        }

        let expected: Decimal = postings
            .iter()
            .filter(|(period, _)| *period <= at_period)
            .map(|(_, gift)| *gift)
            .sum();
        prop_assert_eq!(book.account_balance(2026, &BANK.into(), at_period), expected);
    }

    #[test]
    fn prop_unbalanced_batch_rejected(debit in amount(), credit in amount()) {
        prop_assume!(debit != credit);
        let mut book = demo_book();
        let number = book.add_batch(
            BatchKind::Gl,
            1,
            "unbalanced",
            vec![
                JournalLine::debit(BANK, MAIN_CC, debit),
                JournalLine::credit(GIFT_INCOME, MAIN_CC, credit),
            ],
        );
        let before = book.clone();

        prop_assert!(PostingService::post(&mut book, number).is_err());
        prop_assert_eq!(book, before);
    }
}
