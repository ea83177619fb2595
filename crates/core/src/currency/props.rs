//! Property-based tests for currency arithmetic and rate lookup.

use chrono::{Days, NaiveDate};
use ledgerclose_shared::types::CurrencyCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::exchange::{ExchangeRate, RateType, find_rate};
use super::service::{CurrencyService, MONEY_DECIMAL_PLACES};

/// Signed amounts from -1,000,000.00 to 1,000,000.00.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Positive rates from 0.0001 to 10000.0000.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Base amounts never carry more than two decimal places.
    #[test]
    fn prop_to_base_rounds_to_cents(amount in signed_amount(), rate in positive_rate()) {
        let base = CurrencyService::to_base(amount, rate);
        prop_assert!(base.scale() <= MONEY_DECIMAL_PLACES);
    }

    /// Rounding moves the exact product by at most half a cent.
    #[test]
    fn prop_rounding_error_at_most_half_cent(amount in signed_amount(), rate in positive_rate()) {
        let exact = amount * rate;
        let rounded = CurrencyService::to_base(amount, rate);
        prop_assert!((rounded - exact).abs() <= Decimal::new(5, 3));
    }

    /// Debits and credits of equal size convert to equal and opposite amounts.
    #[test]
    fn prop_to_base_is_odd(amount in signed_amount(), rate in positive_rate()) {
        prop_assert_eq!(
            CurrencyService::to_base(-amount, rate),
            -CurrencyService::to_base(amount, rate)
        );
    }

    /// The latest rate effective on the lookup date is the one returned.
    #[test]
    fn prop_find_rate_picks_latest_effective(
        rates in prop::collection::vec(positive_rate(), 1..10),
        lookup in 0u64..20,
    ) {
        let table: Vec<ExchangeRate> = rates
            .iter()
            .zip(0u64..)
            .map(|(rate, day)| {
                ExchangeRate::new(
                    "USD",
                    "EUR",
                    *rate,
                    base_date() + Days::new(day * 2),
                    RateType::Corporate,
                )
            })
            .collect();
        let on = base_date() + Days::new(lookup);

        let expected = table
            .iter()
            .filter(|r| r.effective_date <= on)
            .max_by_key(|r| r.effective_date)
            .map(|r| r.rate);
        let found = find_rate(
            &table,
            &CurrencyCode::from("USD"),
            &CurrencyCode::from("EUR"),
            RateType::Corporate,
            on,
        );

        prop_assert_eq!(found, expected);
    }
}
