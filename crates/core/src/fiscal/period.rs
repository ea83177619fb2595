//! Accounting period types and calendar generation.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts postings.
    Open,
    /// Period has been through month-end.
    Closed,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// One accounting period of a ledger.
///
/// Periods after the ledger's final period are forward-posting periods that
/// belong to the next financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Period number, starting at 1.
    pub number: i32,
    /// Display name (e.g. "January 2026").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl AccountingPeriod {
    /// Returns true if transactions can be posted to this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Generates `count` consecutive monthly periods starting at `start_date`.
///
/// The first period runs from `start_date` to the end of its month; every
/// later period covers a full calendar month.
#[must_use]
pub fn generate_monthly_periods(start_date: NaiveDate, count: i32) -> Vec<AccountingPeriod> {
    let mut periods = Vec::new();
    let mut current = start_date;

    for number in 1..=count {
        let period_end = last_day_of_month(current.year(), current.month());

        periods.push(AccountingPeriod {
            number,
            name: format!("{} {}", month_name(current.month()), current.year()),
            start_date: current,
            end_date: period_end,
            status: PeriodStatus::Open,
        });

        // Move to first day of next month
        match period_end.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    periods
}

/// Moves every period one year later and reopens it.
///
/// Month-end dates stay on the last day of their month, so February follows
/// leap years.
pub fn roll_forward_one_year(periods: &mut [AccountingPeriod]) {
    for period in periods.iter_mut() {
        let was_month_end =
            period.end_date == last_day_of_month(period.end_date.year(), period.end_date.month());

        period.start_date = add_one_year(period.start_date);
        period.end_date = if was_month_end {
            last_day_of_month(period.end_date.year() + 1, period.end_date.month())
        } else {
            add_one_year(period.end_date)
        };
        period.name = format!(
            "{} {}",
            month_name(period.start_date.month()),
            period.start_date.year()
        );
        period.status = PeriodStatus::Open;
    }
}

fn add_one_year(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(date)
}

/// Returns the last day of a month.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Returns month name.
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
