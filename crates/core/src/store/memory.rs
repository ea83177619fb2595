//! In-memory ledger store.
//!
//! Each ledger sits behind its own async mutex; a transaction is the owned
//! lock guard, so a second run on the same ledger waits until the first
//! commits or rolls back. Runs on different ledgers proceed in parallel.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ledgerclose_shared::types::LedgerNumber;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LedgerStore, StoreError};
use crate::ledger::LedgerBook;

/// Ledger store kept in process memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    ledgers: Arc<DashMap<LedgerNumber, Arc<Mutex<LedgerBook>>>>,
}

/// Transaction on an in-memory ledger.
#[derive(Debug)]
pub struct MemoryTx {
    guard: OwnedMutexGuard<LedgerBook>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the committed state of a ledger.
    pub async fn snapshot(&self, ledger: LedgerNumber) -> Option<LedgerBook> {
        let cell = self.ledgers.get(&ledger).map(|entry| Arc::clone(entry.value()))?;
        let book = cell.lock().await;
        Some(book.clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    type Tx = MemoryTx;

    async fn create(&self, book: &LedgerBook) -> Result<(), StoreError> {
        match self.ledgers.entry(book.number()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(book.number())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(book.clone())));
                Ok(())
            }
        }
    }

    async fn begin(&self, ledger: LedgerNumber) -> Result<(MemoryTx, LedgerBook), StoreError> {
        // The map guard must be released before awaiting the ledger lock.
        let cell = self
            .ledgers
            .get(&ledger)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(StoreError::LedgerNotFound(ledger))?;

        let guard = cell.lock_owned().await;
        let book = guard.clone();
        Ok((MemoryTx { guard }, book))
    }

    async fn commit(&self, mut tx: MemoryTx, book: &LedgerBook) -> Result<(), StoreError> {
        *tx.guard = book.clone();
        Ok(())
    }

    async fn rollback(&self, tx: MemoryTx) -> Result<(), StoreError> {
        drop(tx);
        Ok(())
    }
}
