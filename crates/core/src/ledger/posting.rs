//! Posting batches into the general ledger master.

use ledgerclose_shared::types::BatchNumber;
use tracing::debug;

use super::balance::GlmKey;
use super::batch::BatchStatus;
use super::book::LedgerBook;
use super::error::PostingError;
use super::validation::validate_lines;

/// Which period rules apply to a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostingMode {
    /// Open periods between the current period and the last forward period.
    Regular,
    /// Any period of the year, closed or not. Used by period-end itself.
    PeriodEnd,
}

/// Posts and cancels batches.
pub struct PostingService;

impl PostingService {
    /// Posts an unposted batch.
    ///
    /// Everything is validated before the first balance changes, so a
    /// failed posting leaves the book untouched.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` if the batch is missing or not unposted, lies
    /// outside the open posting window, does not balance, or references
    /// unknown or inactive accounts and cost centres.
    pub fn post(book: &mut LedgerBook, number: BatchNumber) -> Result<(), PostingError> {
        Self::post_with(book, number, PostingMode::Regular)
    }

    /// Posts a batch generated by period-end processing.
    ///
    /// Such batches may target the period being closed.
    pub(crate) fn post_generated(
        book: &mut LedgerBook,
        number: BatchNumber,
    ) -> Result<(), PostingError> {
        Self::post_with(book, number, PostingMode::PeriodEnd)
    }

    /// Cancels an unposted batch.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` if the batch is missing or not unposted.
    pub fn cancel(book: &mut LedgerBook, number: BatchNumber) -> Result<(), PostingError> {
        let batch = book
            .batches
            .get_mut(&number)
            .ok_or(PostingError::BatchNotFound(number))?;

        if batch.status != BatchStatus::Unposted {
            return Err(PostingError::NotUnposted {
                batch: number,
                status: batch.status,
            });
        }

        batch.status = BatchStatus::Cancelled;
        Ok(())
    }

    fn post_with(
        book: &mut LedgerBook,
        number: BatchNumber,
        mode: PostingMode,
    ) -> Result<(), PostingError> {
        let batch = book
            .batch(number)
            .ok_or(PostingError::BatchNotFound(number))?;

        if batch.status != BatchStatus::Unposted {
            return Err(PostingError::NotUnposted {
                batch: number,
                status: batch.status,
            });
        }

        let ledger = &book.ledger;
        if batch.year != ledger.current_financial_year {
            return Err(PostingError::WrongYear {
                batch_year: batch.year,
                ledger_year: ledger.current_financial_year,
            });
        }

        let (first, last) = match mode {
            PostingMode::Regular => (ledger.current_period, ledger.last_postable_period()),
            PostingMode::PeriodEnd => (1, ledger.total_periods()),
        };
        if batch.period < first || batch.period > last {
            return Err(PostingError::PeriodOutOfRange {
                period: batch.period,
                first,
                last,
            });
        }

        if mode == PostingMode::Regular && !book.period(batch.period).is_some_and(|p| p.is_open()) {
            return Err(PostingError::PeriodClosed(batch.period));
        }

        validate_lines(&batch.lines)?;

        for line in &batch.lines {
            let account = book
                .account(&line.account)
                .ok_or_else(|| PostingError::UnknownAccount(line.account.clone()))?;
            if !account.is_active {
                return Err(PostingError::InactiveAccount(line.account.clone()));
            }

            let cost_centre = book
                .cost_centre(&line.cost_centre)
                .ok_or_else(|| PostingError::UnknownCostCentre(line.cost_centre.clone()))?;
            if !cost_centre.is_active {
                return Err(PostingError::InactiveCostCentre(line.cost_centre.clone()));
            }
        }

        // Validation passed; apply.
        let year = batch.year;
        let period = batch.period;
        let postings: Vec<_> = batch
            .lines
            .iter()
            .map(|line| {
                (
                    GlmKey::new(year, line.account.clone(), line.cost_centre.clone()),
                    line.signed_amount(),
                    line.signed_foreign_amount(),
                )
            })
            .collect();

        for (key, amount, foreign) in postings {
            book.glm_entry(key).apply(period, amount, foreign);
        }

        if let Some(batch) = book.batches.get_mut(&number) {
            batch.status = BatchStatus::Posted;
        }

        debug!(
            ledger = %book.number(),
            batch = %number,
            year,
            period,
            "Batch posted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::batch::BatchKind;
    use crate::ledger::entry::JournalLine;
    use crate::ledger::types::Account;
    use crate::ledger::validation::LedgerValidationError;
    use crate::test_support::{demo_book, BANK, EXPENSE, GIFT_INCOME, MAIN_CC};
    use ledgerclose_shared::types::{AccountCode, CostCentreCode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn expense_lines(amount: Decimal) -> Vec<JournalLine> {
        vec![
            JournalLine::debit(EXPENSE, MAIN_CC, amount),
            JournalLine::credit(BANK, MAIN_CC, amount),
        ]
    }

    #[test]
    fn test_post_updates_balances_from_period_onwards() {
        let mut book = demo_book();
        let batch = book.add_batch(BatchKind::Gl, 1, "Rent", expense_lines(dec!(100)));
        PostingService::post(&mut book, batch).unwrap();

        let bank = AccountCode::from(BANK);
        assert_eq!(book.account_balance(2026, &bank, 1), dec!(-100));
        assert_eq!(book.account_balance(2026, &bank, 16), dec!(-100));
        assert_eq!(book.trial_balance(2026, 1), Decimal::ZERO);
        assert_eq!(book.batch(batch).unwrap().status, BatchStatus::Posted);
    }

    #[test]
    fn test_post_forward_period() {
        let mut book = demo_book();
        let batch = book.add_batch(BatchKind::Gl, 4, "Prepaid", expense_lines(dec!(10)));
        PostingService::post(&mut book, batch).unwrap();

        let expense = AccountCode::from(EXPENSE);
        assert_eq!(book.account_balance(2026, &expense, 3), Decimal::ZERO);
        assert_eq!(book.account_balance(2026, &expense, 4), dec!(10));
    }

    #[test]
    fn test_post_twice_rejected() {
        let mut book = demo_book();
        let batch = book.add_batch(BatchKind::Gl, 1, "Rent", expense_lines(dec!(100)));
        PostingService::post(&mut book, batch).unwrap();

        assert_eq!(
            PostingService::post(&mut book, batch),
            Err(PostingError::NotUnposted {
                batch,
                status: BatchStatus::Posted
            })
        );
    }

    #[test]
    fn test_post_outside_window_rejected() {
        let mut book = demo_book();
        // Current period 1 with 4 forward periods: window is 1..=5
        let batch = book.add_batch(BatchKind::Gl, 6, "Too far", expense_lines(dec!(1)));
        assert!(matches!(
            PostingService::post(&mut book, batch),
            Err(PostingError::PeriodOutOfRange { period: 6, first: 1, last: 5 })
        ));
    }

    #[test]
    fn test_unbalanced_batch_leaves_book_untouched() {
        let mut book = demo_book();
        let batch = book.add_batch(
            BatchKind::Gift,
            1,
            "Gifts",
            vec![
                JournalLine::debit(BANK, MAIN_CC, dec!(50)),
                JournalLine::credit(GIFT_INCOME, MAIN_CC, dec!(40)),
            ],
        );
        let before = book.clone();

        let err = PostingService::post(&mut book, batch).unwrap_err();
        assert!(matches!(
            err,
            PostingError::Invalid(LedgerValidationError::Unbalanced { .. })
        ));
        assert_eq!(book, before);
    }

    #[test]
    fn test_unknown_master_data_rejected() {
        let mut book = demo_book();
        let batch = book.add_batch(
            BatchKind::Gl,
            1,
            "Bad",
            vec![
                JournalLine::debit("9999", MAIN_CC, dec!(5)),
                JournalLine::credit(BANK, "0000", dec!(5)),
            ],
        );
        assert_eq!(
            PostingService::post(&mut book, batch),
            Err(PostingError::UnknownAccount(AccountCode::from("9999")))
        );

        let batch = book.add_batch(
            BatchKind::Gl,
            1,
            "Bad",
            vec![
                JournalLine::debit(EXPENSE, MAIN_CC, dec!(5)),
                JournalLine::credit(BANK, "0000", dec!(5)),
            ],
        );
        assert_eq!(
            PostingService::post(&mut book, batch),
            Err(PostingError::UnknownCostCentre(CostCentreCode::from("0000")))
        );
    }

    #[test]
    fn test_inactive_account_rejected() {
        let mut book = demo_book();
        let mut closed = Account::new("0150", "Old bank", crate::ledger::types::AccountKind::Asset);
        closed.is_active = false;
        book.add_account(closed);

        let batch = book.add_batch(
            BatchKind::Gl,
            1,
            "Old",
            vec![
                JournalLine::debit("0150", MAIN_CC, dec!(5)),
                JournalLine::credit(BANK, MAIN_CC, dec!(5)),
            ],
        );
        assert_eq!(
            PostingService::post(&mut book, batch),
            Err(PostingError::InactiveAccount(AccountCode::from("0150")))
        );
    }

    #[test]
    fn test_closed_period_rejects_regular_posting() {
        let mut book = demo_book();
        book.period_mut(2).unwrap().status = crate::fiscal::PeriodStatus::Closed;
        let batch = book.add_batch(BatchKind::Gl, 2, "Late", expense_lines(dec!(5)));

        assert_eq!(
            PostingService::post(&mut book, batch),
            Err(PostingError::PeriodClosed(2))
        );
        // Period-end postings may still target it.
        PostingService::post_generated(&mut book, batch).unwrap();
    }

    #[test]
    fn test_cancel() {
        let mut book = demo_book();
        let batch = book.add_batch(BatchKind::Ap, 1, "Invoice", expense_lines(dec!(5)));
        PostingService::cancel(&mut book, batch).unwrap();

        assert_eq!(book.batch(batch).unwrap().status, BatchStatus::Cancelled);
        assert!(PostingService::cancel(&mut book, batch).is_err());
        assert!(PostingService::post(&mut book, batch).is_err());
    }
}
