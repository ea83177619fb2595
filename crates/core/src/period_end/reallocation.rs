//! Year-end reallocation of income and expense into retained earnings.

use std::collections::BTreeMap;

use ledgerclose_shared::types::{BatchNumber, CostCentreCode};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::PeriodEndError;
use crate::ledger::{BatchOrigin, JournalLine, LedgerBook, PostingService};

/// Zeroes every income and expense balance at the final period and posts
/// the net per target cost centre to retained earnings.
///
/// The batch is posted in the final period. Returns `None` when there is
/// nothing to reallocate.
pub(crate) fn run(book: &mut LedgerBook) -> Result<Option<BatchNumber>, PeriodEndError> {
    let ledger = &book.ledger;
    let year = ledger.current_financial_year;
    let final_period = ledger.number_of_accounting_periods;

    let mut lines = Vec::new();
    let mut net: BTreeMap<CostCentreCode, Decimal> = BTreeMap::new();

    for record in book.records_for_year(year) {
        let income_expense = book
            .account(&record.key.account)
            .is_some_and(|a| a.kind.is_income_expense());
        if !income_expense {
            continue;
        }

        let balance = record.balance_at(final_period);
        if balance.is_zero() {
            continue;
        }

        let target = book
            .cost_centre(&record.key.cost_centre)
            .map_or(&record.key.cost_centre, |c| c.reallocation_target())
            .clone();

        lines.push(JournalLine::signed(
            record.key.account.clone(),
            record.key.cost_centre.clone(),
            -balance,
        ));
        *net.entry(target).or_default() += balance;
    }

    for (cost_centre, amount) in net {
        if !amount.is_zero() {
            lines.push(JournalLine::signed(
                ledger.retained_earnings_account.clone(),
                cost_centre,
                amount,
            ));
        }
    }

    if lines.is_empty() {
        return Ok(None);
    }

    let number = book.add_generated_batch(
        BatchOrigin::Reallocation,
        final_period,
        format!("Year-end reallocation {year}"),
        lines,
    );
    PostingService::post_generated(book, number)?;

    debug!(ledger = %book.number(), batch = %number, year, "Reallocation batch posted");

    Ok(Some(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountKind, BatchKind};
    use crate::test_support::{
        BANK, DEPT_CC, EXPENSE, GIFT_INCOME, MAIN_CC, RETAINED, demo_book, post, post_gift,
    };
    use ledgerclose_shared::types::AccountCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_income_expense_zeroed_into_target() {
        let mut book = demo_book();
        post_gift(&mut book, 1, MAIN_CC, dec!(100));
        post_gift(&mut book, 3, DEPT_CC, dec!(50));
        post(
            &mut book,
            BatchKind::Gl,
            2,
            vec![
                JournalLine::debit(EXPENSE, DEPT_CC, dec!(20)),
                JournalLine::credit(BANK, DEPT_CC, dec!(20)),
            ],
        );

        let number = run(&mut book).unwrap().unwrap();
        assert_eq!(book.batch(number).unwrap().period, 12);

        for record in book.records_for_year(2026) {
            let kind = book.account(&record.key.account).unwrap().kind;
            if kind.is_income_expense() {
                assert!(record.balance_at(12).is_zero(), "{:?}", record.key);
            }
        }

        // Department reallocates to the main cost centre: 150 - 20 = 130 surplus.
        let retained = book
            .glm(2026, &AccountCode::from(RETAINED), &MAIN_CC.into())
            .unwrap();
        assert_eq!(retained.balance_at(12), dec!(-130));
        assert!(book.glm(2026, &AccountCode::from(RETAINED), &DEPT_CC.into()).is_none());
        assert!(book.trial_balance(2026, 12).is_zero());
        // Balance sheet accounts untouched.
        assert_eq!(book.account_balance(2026, &AccountCode::from(BANK), 12), dec!(130));
        assert_eq!(
            book.account(&AccountCode::from(GIFT_INCOME)).unwrap().kind,
            AccountKind::Income
        );
    }

    #[test]
    fn test_nothing_to_reallocate() {
        let mut book = demo_book();
        assert_eq!(run(&mut book).unwrap(), None);
    }
}
