//! Exchange rates and currency arithmetic.

pub mod exchange;
pub mod service;

pub use exchange::{ExchangeRate, RateType, find_rate};
pub use service::{CurrencyService, MONEY_DECIMAL_PLACES};

#[cfg(test)]
mod props;
