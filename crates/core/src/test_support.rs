//! Shared fixtures for unit tests.

use chrono::NaiveDate;
use ledgerclose_shared::types::{BatchNumber, CurrencyCode, LedgerNumber};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::currency::{ExchangeRate, RateType};
use crate::ledger::{
    Account, AccountKind, BatchKind, CostCentre, JournalLine, LedgerBook, PostingService,
};
use crate::setup::{CreateLedgerInput, LedgerSetup};

pub const GIFT_INCOME: &str = "0100";
pub const BANK: &str = "0200";
pub const USD_BANK: &str = "0210";
pub const EXPENSE: &str = "4100";
pub const FOREX: &str = "5003";
pub const ICH: &str = "8500";
pub const RETAINED: &str = "9700";
pub const SUSPENSE: &str = "9800";

pub const MAIN_CC: &str = "4300";
pub const DEPT_CC: &str = "4310";
pub const FOREIGN_CC: &str = "7300";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ledger 43 in EUR: 12 periods from 2026-01-01, 4 forward periods.
pub fn demo_input() -> CreateLedgerInput {
    CreateLedgerInput {
        number: LedgerNumber::new(43),
        name: "Demo".to_string(),
        base_currency: CurrencyCode::from("EUR"),
        year_start: date(2026, 1, 1),
        number_of_accounting_periods: 12,
        number_fwd_posting_periods: 4,
        retained_earnings_account: RETAINED.into(),
        forex_gains_losses_account: FOREX.into(),
        ich_clearing_account: ICH.into(),
        standard_cost_centre: MAIN_CC.into(),
        accounts: vec![
            Account::new(GIFT_INCOME, "Gifts", AccountKind::Income),
            Account::new(BANK, "Bank", AccountKind::Asset),
            Account::new(USD_BANK, "Bank USD", AccountKind::Asset).in_currency("USD"),
            Account::new(EXPENSE, "Expenses", AccountKind::Expense),
            Account::new(FOREX, "Exchange gains/losses", AccountKind::Expense),
            Account::new(ICH, "ICH clearing", AccountKind::Liability),
            Account::new(RETAINED, "Retained earnings", AccountKind::Equity),
            Account::new(SUSPENSE, "Suspense", AccountKind::Asset).suspense(),
        ],
        cost_centres: vec![
            CostCentre::new(MAIN_CC, "Main"),
            CostCentre::new(DEPT_CC, "Department").reallocating_to(MAIN_CC),
            CostCentre::new(FOREIGN_CC, "Field partner").foreign(),
        ],
        exchange_rates: vec![ExchangeRate::new(
            "USD",
            "EUR",
            dec!(0.9),
            date(2025, 12, 1),
            RateType::Corporate,
        )],
    }
}

pub fn demo_book() -> LedgerBook {
    LedgerSetup::create(demo_input()).unwrap()
}

/// Adds and posts a batch.
pub fn post(
    book: &mut LedgerBook,
    kind: BatchKind,
    period: i32,
    lines: Vec<JournalLine>,
) -> BatchNumber {
    let number = book.add_batch(kind, period, "test", lines);
    PostingService::post(book, number).unwrap();
    number
}

/// Posts a gift of `amount` to `cost_centre` in `period`.
pub fn post_gift(book: &mut LedgerBook, period: i32, cost_centre: &str, amount: Decimal) {
    post(
        book,
        BatchKind::Gift,
        period,
        vec![
            JournalLine::debit(BANK, cost_centre, amount),
            JournalLine::credit(GIFT_INCOME, cost_centre, amount),
        ],
    );
}
