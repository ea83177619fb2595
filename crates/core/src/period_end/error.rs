//! Period-end error types.
//!
//! Conditions that stop a run are reported as verification results, not
//! errors. These errors mean the run itself could not be carried out.

use chrono::NaiveDate;
use ledgerclose_shared::types::CurrencyCode;
use thiserror::Error;

use super::state::ClosePhase;
use crate::ledger::PostingError;

/// Errors that abort a period-end run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodEndError {
    /// The state machine was asked for a move it does not allow.
    #[error("Invalid period-end transition from {from} to {to}")]
    InvalidTransition {
        /// Current phase.
        from: ClosePhase,
        /// Requested phase.
        to: ClosePhase,
    },

    /// The ledger points at a period it does not hold.
    #[error("Period {0} is not defined for this ledger")]
    PeriodMissing(i32),

    /// No corporate rate is recorded for a currency on the given date.
    #[error("No corporate exchange rate from {from} to {to} on or before {date}")]
    MissingRate {
        /// Foreign currency.
        from: CurrencyCode,
        /// Base currency.
        to: CurrencyCode,
        /// Period end date.
        date: NaiveDate,
    },

    /// A batch generated by the run could not be posted.
    #[error(transparent)]
    Posting(#[from] PostingError),
}

impl PeriodEndError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::PeriodMissing(_) => "PERIOD_MISSING",
            Self::MissingRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::Posting(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerclose_shared::types::BatchNumber;

    #[test]
    fn test_error_codes() {
        let err = PeriodEndError::InvalidTransition {
            from: ClosePhase::Closed,
            to: ClosePhase::Closing,
        };
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "Invalid period-end transition from closed to closing"
        );

        let err = PeriodEndError::from(PostingError::BatchNotFound(BatchNumber::new(7)));
        assert_eq!(err.error_code(), "BATCH_NOT_FOUND");
    }
}
