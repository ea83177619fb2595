//! Store and runner errors.

use ledgerclose_shared::AppError;
use ledgerclose_shared::types::LedgerNumber;
use thiserror::Error;

use crate::ledger::PostingError;
use crate::period_end::PeriodEndError;

/// Errors raised by a `LedgerStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Ledger does not exist.
    #[error("Ledger {0} not found")]
    LedgerNotFound(LedgerNumber),

    /// Ledger already exists.
    #[error("Ledger {0} already exists")]
    AlreadyExists(LedgerNumber),

    /// Another transaction changed the ledger first.
    #[error("Concurrent update of ledger {0}")]
    Conflict(LedgerNumber),

    /// Stored data cannot be mapped back into the domain.
    #[error("Invalid stored data: {0}")]
    Corrupt(String),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LedgerNotFound(_) => "LEDGER_NOT_FOUND",
            Self::AlreadyExists(_) => "LEDGER_EXISTS",
            Self::Conflict(_) => "CONFLICT",
            Self::Corrupt(_) => "CORRUPT_DATA",
            Self::Backend(_) => "STORAGE_ERROR",
        }
    }
}

/// Errors raised by `PeriodEndRunner`.
#[derive(Debug, Error)]
pub enum RunError {
    /// Loading or saving the ledger failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The period-end operation failed.
    #[error(transparent)]
    PeriodEnd(#[from] PeriodEndError),

    /// Posting a batch failed.
    #[error(transparent)]
    Posting(#[from] PostingError),
}

impl RunError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.error_code(),
            Self::PeriodEnd(e) => e.error_code(),
            Self::Posting(e) => e.error_code(),
        }
    }
}

impl From<RunError> for AppError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Store(StoreError::LedgerNotFound(n)) => {
                Self::NotFound(format!("Ledger {n}"))
            }
            RunError::Store(StoreError::Conflict(n)) => {
                Self::Conflict(format!("Concurrent update of ledger {n}"))
            }
            RunError::Store(e) => Self::Database(e.to_string()),
            RunError::PeriodEnd(e) => Self::BusinessRule(e.to_string()),
            RunError::Posting(e) => Self::Validation(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period_end::ClosePhase;

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = RunError::from(StoreError::LedgerNotFound(LedgerNumber::new(9))).into();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.exit_code(), 1);

        let run = RunError::from(PeriodEndError::InvalidTransition {
            from: ClosePhase::Open,
            to: ClosePhase::Closed,
        });
        assert_eq!(run.error_code(), "INVALID_TRANSITION");
        assert!(matches!(AppError::from(run), AppError::BusinessRule(_)));
    }
}
