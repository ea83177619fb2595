//! `SeaORM` entities, one module per table.

pub mod accounting_periods;
pub mod accounts;
pub mod batches;
pub mod cost_centres;
pub mod exchange_rates;
pub mod glm;
pub mod glm_periods;
pub mod journal_lines;
pub mod ledger_flags;
pub mod ledgers;
