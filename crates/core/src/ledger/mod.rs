//! General ledger bookkeeping for a single ledger.
//!
//! - Ledger header, accounts and cost centres
//! - Batches and their journal lines
//! - General ledger master balances
//! - The `LedgerBook` aggregate loaded per transaction
//! - Posting and batch validation

pub mod balance;
pub mod batch;
pub mod book;
pub mod entry;
pub mod error;
pub mod posting;
pub mod types;
pub mod validation;

pub use balance::{GlmKey, GlmRecord};
pub use batch::{Batch, BatchKind, BatchOrigin, BatchStatus};
pub use book::LedgerBook;
pub use entry::{EntryType, JournalLine};
pub use error::PostingError;
pub use posting::PostingService;
pub use types::{Account, AccountKind, CostCentre, CostCentreKind, Ledger, LedgerFlag};
pub use validation::{LedgerValidationError, validate_lines};

#[cfg(test)]
#[path = "book_tests.rs"]
mod book_tests;
#[cfg(test)]
mod posting_props;
