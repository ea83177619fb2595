//! Creating a new ledger with its calendar and master data.

pub mod error;
pub mod service;
pub mod types;

pub use error::SetupError;
pub use service::LedgerSetup;
pub use types::CreateLedgerInput;
