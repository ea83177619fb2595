//! General ledger master: per-period balances of an account on a cost centre.
//!
//! Balances are signed, debit positive. `closing[i]` is the cumulative
//! closing balance of period `i + 1`, so period activity is the difference
//! between two neighbouring entries.

use ledgerclose_shared::types::{AccountCode, CostCentreCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies a general ledger master record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GlmKey {
    /// Financial year.
    pub year: i32,
    /// Account.
    pub account: AccountCode,
    /// Cost centre.
    pub cost_centre: CostCentreCode,
}

impl GlmKey {
    /// Creates a key.
    #[must_use]
    pub fn new(year: i32, account: AccountCode, cost_centre: CostCentreCode) -> Self {
        Self {
            year,
            account,
            cost_centre,
        }
    }
}

/// Balances of one account on one cost centre for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlmRecord {
    /// Record key.
    pub key: GlmKey,
    /// Balance brought forward, base currency.
    pub start_balance: Decimal,
    /// Balance brought forward, foreign currency.
    pub start_foreign: Decimal,
    /// Cumulative closing balance per period, base currency.
    pub closing: Vec<Decimal>,
    /// Cumulative closing balance per period, foreign currency.
    pub closing_foreign: Vec<Decimal>,
}

/// Zero-based index of a 1-based period number.
fn index(period: i32) -> Option<usize> {
    usize::try_from(period).ok()?.checked_sub(1)
}

impl GlmRecord {
    /// Creates an empty record covering `periods` periods.
    #[must_use]
    pub fn new(key: GlmKey, periods: usize) -> Self {
        Self {
            key,
            start_balance: Decimal::ZERO,
            start_foreign: Decimal::ZERO,
            closing: vec![Decimal::ZERO; periods],
            closing_foreign: vec![Decimal::ZERO; periods],
        }
    }

    /// Creates a record whose every period starts from the given balances.
    #[must_use]
    pub fn brought_forward(key: GlmKey, periods: usize, base: Decimal, foreign: Decimal) -> Self {
        Self {
            key,
            start_balance: base,
            start_foreign: foreign,
            closing: vec![base; periods],
            closing_foreign: vec![foreign; periods],
        }
    }

    /// Closing base balance of `period`; period 0 is the start balance.
    ///
    /// Periods past the last one held report the last balance.
    #[must_use]
    pub fn balance_at(&self, period: i32) -> Decimal {
        Self::lookup(&self.closing, self.start_balance, period)
    }

    /// Closing foreign balance of `period`; period 0 is the start balance.
    #[must_use]
    pub fn foreign_balance_at(&self, period: i32) -> Decimal {
        Self::lookup(&self.closing_foreign, self.start_foreign, period)
    }

    /// Base-currency movement within `period`.
    #[must_use]
    pub fn activity_in(&self, period: i32) -> Decimal {
        self.balance_at(period) - self.balance_at(period - 1)
    }

    fn lookup(values: &[Decimal], start: Decimal, period: i32) -> Decimal {
        match index(period) {
            None => start,
            Some(i) => values
                .get(i)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(start),
        }
    }

    /// Adds signed amounts to `period` and every later period.
    pub fn apply(&mut self, period: i32, amount: Decimal, foreign_amount: Decimal) {
        let Some(from) = index(period) else {
            return;
        };
        for value in self.closing.iter_mut().skip(from) {
            *value += amount;
        }
        for value in self.closing_foreign.iter_mut().skip(from) {
            *value += foreign_amount;
        }
    }

    /// Returns true if every stored balance is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_balance.is_zero()
            && self.start_foreign.is_zero()
            && self.closing.iter().all(Decimal::is_zero)
            && self.closing_foreign.iter().all(Decimal::is_zero)
    }
}
