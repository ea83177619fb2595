//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use ledgerclose_shared::types::LedgerNumber;

/// Period-end closing for general ledgers.
#[derive(Debug, Parser)]
#[command(name = "ledgerclose", version, about)]
pub struct Cli {
    /// Configuration file layered over `config/default`.
    #[arg(long, global = true, env = "LEDGERCLOSE_CONFIG")]
    pub config: Option<String>,

    /// Print reports as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations on one ledger.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current period and what month-end would report.
    Status(LedgerArg),
    /// Close the current period.
    MonthEnd(RunArgs),
    /// Close the financial year after its final period.
    YearEnd(RunArgs),
    /// Revalue foreign-currency balances of the current period.
    Revalue(RunArgs),
    /// Post an unposted batch.
    Post {
        #[command(flatten)]
        target: LedgerArg,
        /// Batch number.
        #[arg(long, short = 'b')]
        batch: i32,
    },
}

/// Selects the ledger.
#[derive(Debug, Clone, Copy, Args)]
pub struct LedgerArg {
    /// Ledger number.
    #[arg(long, short = 'l')]
    pub ledger: i32,
}

impl LedgerArg {
    pub fn number(self) -> LedgerNumber {
        LedgerNumber::new(self.ledger)
    }
}

/// Ledger plus report-only switch.
#[derive(Debug, Clone, Copy, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: LedgerArg,

    /// Run the checks only; change nothing.
    #[arg(long)]
    pub info: bool,
}

impl Command {
    /// Ledger the command works on.
    pub fn ledger(&self) -> LedgerNumber {
        match self {
            Self::Status(target) | Self::Post { target, .. } => target.number(),
            Self::MonthEnd(args) | Self::YearEnd(args) | Self::Revalue(args) => {
                args.target.number()
            }
        }
    }
}
