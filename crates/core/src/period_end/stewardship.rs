//! Stewardship: month-end transfer of foreign cost centre activity.
//!
//! Income and expense booked on a foreign cost centre during the period is
//! moved to the ICH clearing account on the standard cost centre, one
//! clearing line per foreign cost centre.

use std::collections::BTreeMap;

use ledgerclose_shared::types::{BatchNumber, CostCentreCode};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::PeriodEndError;
use crate::ledger::{BatchOrigin, CostCentreKind, JournalLine, LedgerBook, PostingService};

/// Generates and posts the stewardship batch for the current period.
///
/// Returns `None` when no foreign cost centre had income or expense activity.
pub(crate) fn run(book: &mut LedgerBook) -> Result<Option<BatchNumber>, PeriodEndError> {
    let ledger = &book.ledger;
    let year = ledger.current_financial_year;
    let period = ledger.current_period;

    let mut lines = Vec::new();
    let mut net: BTreeMap<CostCentreCode, Decimal> = BTreeMap::new();

    for record in book.records_for_year(year) {
        let foreign = book
            .cost_centre(&record.key.cost_centre)
            .is_some_and(|c| c.kind == CostCentreKind::Foreign);
        let income_expense = book
            .account(&record.key.account)
            .is_some_and(|a| a.kind.is_income_expense());
        if !foreign || !income_expense {
            continue;
        }

        let activity = record.activity_in(period);
        if activity.is_zero() {
            continue;
        }

        lines.push(JournalLine::signed(
            record.key.account.clone(),
            record.key.cost_centre.clone(),
            -activity,
        ));
        *net.entry(record.key.cost_centre.clone()).or_default() += activity;
    }

    for (cost_centre, amount) in net {
        if amount.is_zero() {
            continue;
        }
        lines.push(
            JournalLine::signed(
                ledger.ich_clearing_account.clone(),
                ledger.standard_cost_centre.clone(),
                amount,
            )
            .with_narrative(format!("Stewardship {cost_centre}")),
        );
    }

    if lines.is_empty() {
        return Ok(None);
    }

    let number = book.add_generated_batch(
        BatchOrigin::Stewardship,
        period,
        format!("Stewardship period {period}"),
        lines,
    );
    PostingService::post_generated(book, number)?;

    debug!(ledger = %book.number(), batch = %number, period, "Stewardship batch posted");

    Ok(Some(number))
}
