//! Posting error types.
//!
//! Errors raised while adding a batch to a ledger book or posting it into
//! the general ledger master.

use ledgerclose_shared::types::{AccountCode, BatchNumber, CostCentreCode};
use thiserror::Error;

use super::batch::BatchStatus;
use super::validation::LedgerValidationError;

/// Errors that can occur while posting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostingError {
    // ========== Batch state ==========
    /// Batch does not exist in the ledger.
    #[error("Batch {0} not found")]
    BatchNotFound(BatchNumber),

    /// Batch has already left the unposted state.
    #[error("Batch {batch} cannot be posted: it is {status:?}")]
    NotUnposted {
        /// Batch number.
        batch: BatchNumber,
        /// Current status.
        status: BatchStatus,
    },

    // ========== Period errors ==========
    /// Batch belongs to another financial year.
    #[error("Batch year {batch_year} does not match the ledger year {ledger_year}")]
    WrongYear {
        /// Year on the batch.
        batch_year: i32,
        /// Current financial year of the ledger.
        ledger_year: i32,
    },

    /// Period is outside the postable window.
    #[error("Period {period} is outside the postable range {first}..={last}")]
    PeriodOutOfRange {
        /// Requested period.
        period: i32,
        /// First postable period.
        first: i32,
        /// Last postable period.
        last: i32,
    },

    /// Period has been closed by month-end.
    #[error("Period {0} is closed")]
    PeriodClosed(i32),

    // ========== Master data errors ==========
    /// Account does not exist.
    #[error("Account {0} not found")]
    UnknownAccount(AccountCode),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountCode),

    /// Cost centre does not exist.
    #[error("Cost centre {0} not found")]
    UnknownCostCentre(CostCentreCode),

    /// Cost centre is inactive.
    #[error("Cost centre {0} is inactive")]
    InactiveCostCentre(CostCentreCode),

    // ========== Line errors ==========
    /// Lines violate the balance rules.
    #[error(transparent)]
    Invalid(#[from] LedgerValidationError),
}

impl PostingError {
    /// Returns the error code for reports and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BatchNotFound(_) => "BATCH_NOT_FOUND",
            Self::NotUnposted { .. } => "BATCH_NOT_UNPOSTED",
            Self::WrongYear { .. } => "WRONG_YEAR",
            Self::PeriodOutOfRange { .. } => "PERIOD_OUT_OF_RANGE",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::UnknownAccount(_) => "ACCOUNT_NOT_FOUND",
            Self::InactiveAccount(_) => "ACCOUNT_INACTIVE",
            Self::UnknownCostCentre(_) => "COST_CENTRE_NOT_FOUND",
            Self::InactiveCostCentre(_) => "COST_CENTRE_INACTIVE",
            Self::Invalid(LedgerValidationError::Unbalanced { .. }) => "UNBALANCED_BATCH",
            Self::Invalid(_) => "INVALID_LINES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PostingError::BatchNotFound(BatchNumber::new(1)).error_code(),
            "BATCH_NOT_FOUND"
        );
        assert_eq!(PostingError::PeriodClosed(3).error_code(), "PERIOD_CLOSED");
        assert_eq!(
            PostingError::Invalid(LedgerValidationError::Unbalanced {
                debits: Decimal::new(100, 2),
                credits: Decimal::new(50, 2),
            })
            .error_code(),
            "UNBALANCED_BATCH"
        );
        assert_eq!(
            PostingError::Invalid(LedgerValidationError::NoEntries).error_code(),
            "INVALID_LINES"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PostingError::PeriodOutOfRange {
            period: 9,
            first: 2,
            last: 6,
        };
        assert_eq!(err.to_string(), "Period 9 is outside the postable range 2..=6");

        let err = PostingError::UnknownAccount(AccountCode::from("9999"));
        assert_eq!(err.to_string(), "Account 9999 not found");
    }
}
