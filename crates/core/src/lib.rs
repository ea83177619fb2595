//! Core period-end logic for LedgerClose.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, closing rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Ledger book, batches, balances and posting
//! - `currency` - Exchange rates and rounding
//! - `fiscal` - Accounting period calendar
//! - `period_end` - Month-end / year-end state machine and its checks
//! - `setup` - Creating a new ledger
//! - `store` - Transactional storage seam and the in-memory store

pub mod currency;
pub mod fiscal;
pub mod ledger;
pub mod period_end;
pub mod setup;
pub mod store;

#[cfg(test)]
mod test_support;
