//! Currency arithmetic with Banker's Rounding.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places kept for ledger amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Currency arithmetic used by posting and revaluation.
///
/// All rounding uses `MidpointNearestEven` (Banker's Rounding), so repeated
/// conversions do not drift in one direction.
pub struct CurrencyService;

impl CurrencyService {
    /// Converts `amount` at `rate` and rounds to `decimal_places`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use ledgerclose_core::currency::CurrencyService;
    ///
    /// assert_eq!(CurrencyService::convert(dec!(100), dec!(1.5), 2), dec!(150.00));
    /// ```
    #[must_use]
    pub fn convert(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
        Self::round(amount * rate, decimal_places)
    }

    /// Converts a foreign amount into the ledger's base currency.
    #[must_use]
    pub fn to_base(foreign_amount: Decimal, rate: Decimal) -> Decimal {
        Self::convert(foreign_amount, rate, MONEY_DECIMAL_PLACES)
    }

    /// Rounds a value using Banker's Rounding.
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }
}
