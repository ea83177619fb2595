//! Foreign-currency revaluation.
//!
//! Balances of foreign-currency accounts are restated at the corporate rate
//! effective at the end of the current period. The difference is booked
//! against the forex gains/losses account on the standard cost centre.

use ledgerclose_shared::types::{AccountCode, BatchNumber, CostCentreCode, CurrencyCode};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::error::PeriodEndError;
use crate::currency::{CurrencyService, RateType, find_rate};
use crate::ledger::{BatchOrigin, GlmRecord, JournalLine, LedgerBook, PostingService};

/// One account/cost centre restated by revaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevaluationAdjustment {
    /// Foreign-currency account.
    pub account: AccountCode,
    /// Cost centre.
    pub cost_centre: CostCentreCode,
    /// Currency of the account.
    pub currency: CurrencyCode,
    /// Foreign balance at period end.
    pub foreign_balance: Decimal,
    /// Base balance before revaluation.
    pub base_balance: Decimal,
    /// Corporate rate used.
    pub rate: Decimal,
    /// Amount booked: revalued base balance minus `base_balance`.
    pub difference: Decimal,
}

/// Records of foreign-currency accounts in the current year that carry a
/// foreign or base balance at the end of the current period, with the
/// currency of their account.
///
/// A record whose foreign balance is back to zero still qualifies while a
/// base residual remains on it.
pub(crate) fn candidates(book: &LedgerBook) -> impl Iterator<Item = (&CurrencyCode, &GlmRecord)> {
    let period = book.ledger.current_period;
    book.records_for_year(book.ledger.current_financial_year)
        .filter_map(move |record| {
            let currency = book
                .account(&record.key.account)?
                .foreign_currency
                .as_ref()?;
            let held = !record.foreign_balance_at(period).is_zero()
                || !record.balance_at(period).is_zero();
            held.then_some((currency, record))
        })
}

/// Computes the adjustments for the current period without changing the book.
///
/// Records already carried at the current rate produce no adjustment.
pub(crate) fn compute(book: &LedgerBook) -> Result<Vec<RevaluationAdjustment>, PeriodEndError> {
    let ledger = &book.ledger;
    let period = book
        .current_period()
        .ok_or(PeriodEndError::PeriodMissing(ledger.current_period))?;

    let mut adjustments = Vec::new();
    for (currency, record) in candidates(book) {
        let rate = find_rate(
            &book.exchange_rates,
            currency,
            &ledger.base_currency,
            RateType::Corporate,
            period.end_date,
        )
        .ok_or_else(|| PeriodEndError::MissingRate {
            from: currency.clone(),
            to: ledger.base_currency.clone(),
            date: period.end_date,
        })?;

        let foreign_balance = record.foreign_balance_at(period.number);
        let base_balance = record.balance_at(period.number);
        let difference = CurrencyService::to_base(foreign_balance, rate) - base_balance;

        if !difference.is_zero() {
            adjustments.push(RevaluationAdjustment {
                account: record.key.account.clone(),
                cost_centre: record.key.cost_centre.clone(),
                currency: currency.clone(),
                foreign_balance,
                base_balance,
                rate,
                difference,
            });
        }
    }

    Ok(adjustments)
}

/// Books `adjustments` in one posted GL batch in the current period.
pub(crate) fn post(
    book: &mut LedgerBook,
    adjustments: &[RevaluationAdjustment],
) -> Result<Option<BatchNumber>, PeriodEndError> {
    if adjustments.is_empty() {
        return Ok(None);
    }

    let ledger = &book.ledger;
    let forex = ledger.forex_gains_losses_account.clone();
    let standard = ledger.standard_cost_centre.clone();
    let period = ledger.current_period;

    let mut lines = Vec::with_capacity(adjustments.len() * 2);
    for adj in adjustments {
        let narrative = format!(
            "Revaluation {} {} at {}",
            adj.currency, adj.foreign_balance, adj.rate
        );
        lines.push(
            JournalLine::signed(adj.account.clone(), adj.cost_centre.clone(), adj.difference)
                .with_narrative(narrative.clone()),
        );
        lines.push(
            JournalLine::signed(forex.clone(), standard.clone(), -adj.difference)
                .with_narrative(narrative),
        );
    }

    let number = book.add_generated_batch(
        BatchOrigin::Revaluation,
        period,
        format!("Revaluation period {period}"),
        lines,
    );
    PostingService::post_generated(book, number)?;

    debug!(
        ledger = %book.number(),
        batch = %number,
        adjustments = adjustments.len(),
        "Revaluation batch posted"
    );

    Ok(Some(number))
}
