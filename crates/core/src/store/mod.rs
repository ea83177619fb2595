//! Transactional storage seam.
//!
//! A `LedgerStore` hands out one ledger book per transaction. The
//! `PeriodEndRunner` loads the book, runs an operation and commits only
//! when the operation changed the ledger successfully.

pub mod error;
pub mod memory;
pub mod runner;

use async_trait::async_trait;
use ledgerclose_shared::types::LedgerNumber;

use crate::ledger::LedgerBook;

pub use error::{RunError, StoreError};
pub use memory::InMemoryLedgerStore;
pub use runner::{LedgerStatus, PeriodEndRunner};

/// Storage of ledger books with explicit transactions.
///
/// Implementations must hold the ledger exclusively from `begin` until
/// `commit` or `rollback`, so two runs on one ledger never interleave.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open transaction.
    type Tx: Send;

    /// Stores a new ledger.
    async fn create(&self, book: &LedgerBook) -> Result<(), StoreError>;

    /// Starts a transaction and loads the ledger.
    async fn begin(&self, ledger: LedgerNumber) -> Result<(Self::Tx, LedgerBook), StoreError>;

    /// Writes `book` and commits.
    async fn commit(&self, tx: Self::Tx, book: &LedgerBook) -> Result<(), StoreError>;

    /// Discards the transaction.
    async fn rollback(&self, tx: Self::Tx) -> Result<(), StoreError>;
}
