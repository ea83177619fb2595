//! LedgerClose command-line runner.
//!
//! Usage:
//!   ledgerclose status    --ledger N
//!   ledgerclose month-end --ledger N [--info]
//!   ledgerclose year-end  --ledger N [--info]
//!   ledgerclose revalue   --ledger N [--info]
//!   ledgerclose post      --ledger N --batch B
//!
//! Exit codes: 0 success, 2 blocked by critical results, 1 error.

mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerclose_core::period_end::{PeriodEndService, RunReport};
use ledgerclose_core::store::PeriodEndRunner;
use ledgerclose_db::{SeaOrmLedgerStore, connect_with};
use ledgerclose_shared::config::LoggingConfig;
use ledgerclose_shared::types::BatchNumber;
use ledgerclose_shared::{AppConfig, AppError};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            if code == 1 {
                error!(error = %err, "Run failed");
                eprintln!("error: {err:#}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load_from(cli.config.as_deref()).map_err(AppError::from)?;
    init_tracing(&config.logging);

    let db = connect_with(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Connected to database");

    let runner = PeriodEndRunner::new(
        SeaOrmLedgerStore::new(db),
        PeriodEndService::new(config.period_end),
    );
    let ledger = cli.command.ledger();

    match cli.command {
        Command::Status(_) => {
            let status = runner.status(ledger).await.map_err(AppError::from)?;
            emit(cli.json, &status, output::status(&status))?;
        }
        Command::MonthEnd(args) => {
            let report = runner
                .month_end(ledger, args.info)
                .await
                .map_err(AppError::from)?;
            emit(cli.json, &report, output::month_end(&report))?;
            check(&report)?;
        }
        Command::YearEnd(args) => {
            let report = runner
                .year_end(ledger, args.info)
                .await
                .map_err(AppError::from)?;
            emit(cli.json, &report, output::year_end(&report))?;
            check(&report)?;
        }
        Command::Revalue(args) => {
            let report = runner
                .revalue(ledger, args.info)
                .await
                .map_err(AppError::from)?;
            emit(cli.json, &report, output::revaluation(&report))?;
            check(&report)?;
        }
        Command::Post { batch, .. } => {
            let batch = BatchNumber::new(batch);
            runner
                .post_batch(ledger, batch)
                .await
                .map_err(AppError::from)?;
            println!("posted batch {batch} in ledger {ledger}");
        }
    }

    Ok(())
}

/// Installs the subscriber; `RUST_LOG` overrides the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn emit(json: bool, value: &impl Serialize, text: String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{text}");
    }
    Ok(())
}

/// Turns critical results into the blocked exit code.
fn check(report: &impl RunReport) -> anyhow::Result<()> {
    if report.succeeded() {
        return Ok(());
    }
    let critical = report.verification().critical().count();
    Err(AppError::Blocked(format!("{critical} critical result(s)")).into())
}
