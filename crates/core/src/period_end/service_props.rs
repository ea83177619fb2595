//! Property-based tests for `PeriodEndService`.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::report::RunReport;
use super::service::PeriodEndService;
use super::verification::VerificationCode;
use crate::ledger::{BatchKind, JournalLine, LedgerBook};
use crate::test_support::{BANK, DEPT_CC, EXPENSE, FOREIGN_CC, MAIN_CC, demo_book, post_gift};

/// Strategy for positive amounts with two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a cost centre of the demo ledger.
fn arb_cost_centre() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(MAIN_CC), Just(DEPT_CC), Just(FOREIGN_CC)]
}

fn month_end_ok(service: &PeriodEndService, book: &mut LedgerBook) -> bool {
    let report = service.month_end(book, false).unwrap();
    assert!(report.succeeded(), "{:?}", report.verification);
    report.year_end.is_some()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After N successful month-ends the period has moved N steps and a
    /// year-end fired once for every final period crossed.
    #[test]
    fn prop_month_ends_advance_period(n in 0usize..40) {
        let service = PeriodEndService::default();
        let mut book = demo_book();

        let mut year_ends = 0;
        for _ in 0..n {
            if month_end_ok(&service, &mut book) {
                year_ends += 1;
            }
        }

        let n = i32::try_from(n).unwrap();
        prop_assert_eq!(book.ledger.current_period, n % 12 + 1);
        prop_assert_eq!(book.ledger.current_financial_year, 2026 + n / 12);
        prop_assert_eq!(year_ends, n / 12);
    }

    /// An unposted GL or gift batch in the current period always blocks and
    /// never moves the ledger.
    #[test]
    fn prop_unposted_batch_blocks(
        period in 1i32..=12,
        gift in any::<bool>(),
        amount in arb_amount(),
    ) {
        let service = PeriodEndService::default();
        let mut book = demo_book();
        while book.ledger.current_period < period {
            month_end_ok(&service, &mut book);
        }

        let kind = if gift { BatchKind::Gift } else { BatchKind::Gl };
        book.add_batch(
            kind,
            period,
            "pending",
            vec![
                JournalLine::debit(EXPENSE, MAIN_CC, amount),
                JournalLine::credit(BANK, MAIN_CC, amount),
            ],
        );
        let before = book.clone();

        let report = service.month_end(&mut book, false).unwrap();
        let code = if gift {
            VerificationCode::UnpostedGiftBatches
        } else {
            VerificationCode::UnpostedGlBatches
        };
        prop_assert!(!report.succeeded());
        prop_assert!(report.verification.contains(code));
        prop_assert_eq!(book, before);
    }

    /// Whatever was booked during the year, year-end leaves income and
    /// expense at zero and both years balanced.
    #[test]
    fn prop_year_end_balances(
        gifts in prop::collection::vec((1i32..=12, arb_cost_centre(), arb_amount()), 0..20),
    ) {
        let service = PeriodEndService::default();
        let mut book = demo_book();

        for period in 1..=12 {
            for (_, cost_centre, amount) in gifts.iter().filter(|(p, _, _)| *p == period) {
                post_gift(&mut book, period, cost_centre, *amount);
            }
            month_end_ok(&service, &mut book);
        }

        prop_assert_eq!(book.ledger.current_financial_year, 2027);
        prop_assert!(book.trial_balance(2026, 12).is_zero());
        prop_assert!(book.trial_balance(2027, 0).is_zero());
        for record in book.records_for_year(2026) {
            let kind = book.account(&record.key.account).map(|a| a.kind);
            if kind.is_some_and(|k| k.is_income_expense()) {
                prop_assert!(record.balance_at(12).is_zero());
            }
            let carried = book
                .glm(2027, &record.key.account, &record.key.cost_centre)
                .map_or(Decimal::ZERO, |r| r.start_balance);
            prop_assert_eq!(carried, record.balance_at(12));
        }
    }
}
