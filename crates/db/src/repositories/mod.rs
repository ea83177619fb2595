//! Ledger persistence.
//!
//! `mapping` converts between rows and core types; `ledger` implements the
//! transactional `LedgerStore` on top of it.

pub mod ledger;
pub mod mapping;

pub use ledger::{SeaOrmLedgerStore, SeaOrmTx};
