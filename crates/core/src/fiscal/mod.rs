//! Accounting period calendar.

pub mod period;

pub use period::{AccountingPeriod, PeriodStatus, generate_monthly_periods, roll_forward_one_year};
