//! Exchange rate types and lookup.

use chrono::NaiveDate;
use ledgerclose_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which rate table a rate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    /// Day-to-day transaction rate.
    Daily,
    /// Rate fixed by the organisation for reporting and revaluation.
    Corporate,
}

impl RateType {
    /// Returns the string representation of the rate type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Corporate => "corporate",
        }
    }

    /// Parses a rate type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "corporate" => Some(Self::Corporate),
            _ => None,
        }
    }
}

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
    /// Rate table.
    pub rate_type: RateType,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub fn new(
        from_currency: impl Into<CurrencyCode>,
        to_currency: impl Into<CurrencyCode>,
        rate: Decimal,
        effective_date: NaiveDate,
        rate_type: RateType,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            effective_date,
            rate_type,
        }
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.rate.is_zero() {
            return None;
        }
        Some(Self {
            from_currency: self.to_currency.clone(),
            to_currency: self.from_currency.clone(),
            rate: Decimal::ONE / self.rate,
            effective_date: self.effective_date,
            rate_type: self.rate_type,
        })
    }
}

/// Finds the rate converting `from` into `to` that is in force on `on`.
///
/// The latest rate of the given type with `effective_date <= on` wins. When
/// only the opposite pair is recorded its inverse is used. Same-currency
/// lookups return one.
#[must_use]
pub fn find_rate(
    rates: &[ExchangeRate],
    from: &CurrencyCode,
    to: &CurrencyCode,
    rate_type: RateType,
    on: NaiveDate,
) -> Option<Decimal> {
    if from == to {
        return Some(Decimal::ONE);
    }

    let latest = |a: &CurrencyCode, b: &CurrencyCode| {
        rates
            .iter()
            .filter(|r| {
                r.rate_type == rate_type
                    && &r.from_currency == a
                    && &r.to_currency == b
                    && r.effective_date <= on
            })
            .max_by_key(|r| r.effective_date)
    };

    if let Some(direct) = latest(from, to) {
        return Some(direct.rate);
    }

    latest(to, from)
        .and_then(ExchangeRate::inverse)
        .map(|r| r.rate)
}
