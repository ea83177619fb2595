//! Rolling a ledger over into its next financial year.

use tracing::debug;

use crate::fiscal::roll_forward_one_year;
use crate::ledger::{GlmKey, GlmRecord, LedgerBook};

/// Counts reported by a rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Rollover {
    pub records_carried: usize,
    pub forward_batches_moved: usize,
}

/// Opens the next financial year.
///
/// Expects reallocation to have run, so income and expense balances at the
/// final period are zero and carry nothing into the new year.
pub(crate) fn roll_over(book: &mut LedgerBook) -> Rollover {
    let old_year = book.ledger.current_financial_year;

    let rollover = Rollover {
        records_carried: initialise_balances(book),
        forward_batches_moved: move_forward_batches(book),
    };

    roll_forward_one_year(&mut book.periods);

    let ledger = &mut book.ledger;
    ledger.current_financial_year = old_year + 1;
    ledger.current_period = 1;
    ledger.provisional_year_end = false;
    book.flags.retain(|flag| flag.year() > old_year);

    debug!(
        ledger = %book.number(),
        year = old_year + 1,
        records = rollover.records_carried,
        forward_batches = rollover.forward_batches_moved,
        "New financial year opened"
    );

    rollover
}

/// Creates next year's master records from this year's.
///
/// The start balance is the closing balance of the final period. Period
/// `k` of the new year takes the old balance of period `final + k`, which
/// holds forward postings; periods past the old range repeat the last one.
fn initialise_balances(book: &mut LedgerBook) -> usize {
    let ledger = &book.ledger;
    let old_year = ledger.current_financial_year;
    let final_period = ledger.number_of_accounting_periods;
    let total = ledger.total_periods();

    let new_records: Vec<GlmRecord> = book
        .records_for_year(old_year)
        .filter(|record| !record.is_empty())
        .map(|old| {
            let key = GlmKey::new(
                old_year + 1,
                old.key.account.clone(),
                old.key.cost_centre.clone(),
            );
            GlmRecord {
                key,
                start_balance: old.balance_at(final_period),
                start_foreign: old.foreign_balance_at(final_period),
                closing: (1..=total)
                    .map(|k| old.balance_at(final_period + k))
                    .collect(),
                closing_foreign: (1..=total)
                    .map(|k| old.foreign_balance_at(final_period + k))
                    .collect(),
            }
        })
        .collect();

    let carried = new_records.len();
    for record in new_records {
        book.balances.insert(record.key.clone(), record);
    }
    carried
}

/// Moves batches in forward periods into the new year.
fn move_forward_batches(book: &mut LedgerBook) -> usize {
    let old_year = book.ledger.current_financial_year;
    let final_period = book.ledger.number_of_accounting_periods;

    let mut moved = 0;
    for batch in book.batches.values_mut() {
        if batch.year == old_year && batch.period > final_period {
            batch.year = old_year + 1;
            batch.period -= final_period;
            moved += 1;
        }
    }
    moved
}
