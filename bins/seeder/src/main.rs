//! Database seeder for LedgerClose development and testing.
//!
//! Seeds demo ledger 43 (EUR, calendar year 2026, 4 forward periods) with a
//! chart of accounts, a foreign cost centre, a corporate USD rate and a
//! handful of batches so every month-end check has something to report.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use ledgerclose_core::currency::{ExchangeRate, RateType};
use ledgerclose_core::ledger::{
    Account, AccountKind, BatchKind, CostCentre, JournalLine, LedgerBook, PostingService,
};
use ledgerclose_core::setup::{CreateLedgerInput, LedgerSetup};
use ledgerclose_core::store::{LedgerStore, StoreError};
use ledgerclose_db::SeaOrmLedgerStore;
use ledgerclose_shared::types::{CurrencyCode, LedgerNumber};
use rust_decimal_macros::dec;

/// Demo ledger number (consistent for all seeds)
const DEMO_LEDGER: i32 = 43;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    println!("Connecting to database...");
    let db = ledgerclose_db::connect(&database_url).await?;
    let store = SeaOrmLedgerStore::new(db);

    println!("Building demo ledger {DEMO_LEDGER}...");
    let book = demo_ledger()?;

    match store.create(&book).await {
        Ok(()) => println!("  Created ledger {DEMO_LEDGER} with {} batches", book.batches.len()),
        Err(StoreError::AlreadyExists(_)) => {
            println!("  Ledger {DEMO_LEDGER} already exists, skipping...");
        }
        Err(e) => return Err(e.into()),
    }

    println!("Seeding complete!");
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("invalid date {y}-{m}-{d}"))
}

fn demo_input() -> anyhow::Result<CreateLedgerInput> {
    Ok(CreateLedgerInput {
        number: LedgerNumber::new(DEMO_LEDGER),
        name: "Demo Mission".to_string(),
        base_currency: CurrencyCode::from("EUR"),
        year_start: date(2026, 1, 1)?,
        number_of_accounting_periods: 12,
        number_fwd_posting_periods: 4,
        retained_earnings_account: "9700".into(),
        forex_gains_losses_account: "5003".into(),
        ich_clearing_account: "8500".into(),
        standard_cost_centre: "4300".into(),
        accounts: vec![
            Account::new("0100", "Gifts", AccountKind::Income),
            Account::new("0200", "Bank", AccountKind::Asset),
            Account::new("0210", "Bank USD", AccountKind::Asset).in_currency("USD"),
            Account::new("4100", "Ministry expenses", AccountKind::Expense),
            Account::new("5003", "Exchange gains/losses", AccountKind::Expense),
            Account::new("8500", "ICH clearing", AccountKind::Liability),
            Account::new("9700", "Retained earnings", AccountKind::Equity),
            Account::new("9800", "Suspense", AccountKind::Asset).suspense(),
        ],
        cost_centres: vec![
            CostCentre::new("4300", "Main"),
            CostCentre::new("4310", "Youth work").reallocating_to("4300"),
            CostCentre::new("7300", "Field partner").foreign(),
        ],
        exchange_rates: vec![
            ExchangeRate::new("USD", "EUR", dec!(0.92), date(2025, 12, 1)?, RateType::Corporate),
            ExchangeRate::new("USD", "EUR", dec!(0.95), date(2026, 1, 31)?, RateType::Corporate),
        ],
    })
}

fn demo_ledger() -> anyhow::Result<LedgerBook> {
    let mut book = LedgerSetup::create(demo_input()?)?;

    // Posted activity in January
    let posted = [
        book.add_batch(
            BatchKind::Gift,
            1,
            "January gifts",
            vec![
                JournalLine::debit("0200", "4300", dec!(1200)),
                JournalLine::credit("0100", "4300", dec!(900)),
                JournalLine::credit("0100", "4310", dec!(300)),
            ],
        ),
        book.add_batch(
            BatchKind::Gl,
            1,
            "Field partner support",
            vec![
                JournalLine::debit("4100", "7300", dec!(400)),
                JournalLine::credit("0200", "4300", dec!(400)),
            ],
        ),
        book.add_batch(
            BatchKind::Gl,
            1,
            "USD donation",
            vec![
                JournalLine::debit("0210", "4300", dec!(460)).with_foreign(dec!(500)),
                JournalLine::credit("0100", "4300", dec!(460)),
            ],
        ),
        // Next year's rent, paid in advance
        book.add_batch(
            BatchKind::Gl,
            13,
            "Rent January 2027",
            vec![
                JournalLine::debit("4100", "4300", dec!(250)),
                JournalLine::credit("0200", "4300", dec!(250)),
            ],
        ),
    ];
    for number in posted {
        PostingService::post(&mut book, number)?;
    }

    // Left unposted so month-end has something to refuse
    book.add_batch(
        BatchKind::Gl,
        1,
        "Pending correction",
        vec![
            JournalLine::debit("0100", "4300", dec!(20)),
            JournalLine::credit("9800", "4300", dec!(20)),
        ],
    );
    book.add_batch(
        BatchKind::Ap,
        1,
        "Supplier invoice",
        vec![
            JournalLine::debit("4100", "4300", dec!(75)),
            JournalLine::credit("0200", "4300", dec!(75)),
        ],
    );

    Ok(book)
}
