//! Ledger setup errors.

use ledgerclose_shared::types::{AccountCode, CostCentreCode};
use thiserror::Error;

/// Errors raised while creating a ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Ledger name is blank.
    #[error("Ledger name is required")]
    NameRequired,

    /// Base currency is blank.
    #[error("Base currency is required")]
    BaseCurrencyRequired,

    /// Number of regular periods out of range.
    #[error("Number of accounting periods must be between 1 and {max}, got {got}")]
    InvalidPeriodCount {
        /// Requested count.
        got: i32,
        /// Upper bound.
        max: i32,
    },

    /// Number of forward posting periods out of range.
    #[error("Number of forward posting periods must be between 0 and {max}, got {got}")]
    InvalidForwardPeriodCount {
        /// Requested count.
        got: i32,
        /// Upper bound.
        max: i32,
    },

    /// The same account code appears twice.
    #[error("Account {0} is defined more than once")]
    DuplicateAccount(AccountCode),

    /// The same cost centre code appears twice.
    #[error("Cost centre {0} is defined more than once")]
    DuplicateCostCentre(CostCentreCode),

    /// A ledger-level account is not part of the chart.
    #[error("{role} account {code} is not defined")]
    MissingAccount {
        /// What the account is used for.
        role: &'static str,
        /// Configured code.
        code: AccountCode,
    },

    /// The retained earnings account must be an equity account.
    #[error("Retained earnings account {0} must be an equity account")]
    RetainedEarningsNotEquity(AccountCode),

    /// The standard cost centre is not defined.
    #[error("Standard cost centre {0} is not defined")]
    MissingStandardCostCentre(CostCentreCode),

    /// The standard cost centre must be local.
    #[error("Standard cost centre {0} must be a local cost centre")]
    StandardCostCentreNotLocal(CostCentreCode),

    /// A reallocation target does not exist.
    #[error("Cost centre {cost_centre} reallocates to unknown cost centre {target}")]
    UnknownReallocationTarget {
        /// Cost centre carrying the reference.
        cost_centre: CostCentreCode,
        /// Missing target.
        target: CostCentreCode,
    },
}

impl SetupError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NameRequired => "NAME_REQUIRED",
            Self::BaseCurrencyRequired => "BASE_CURRENCY_REQUIRED",
            Self::InvalidPeriodCount { .. } => "INVALID_PERIOD_COUNT",
            Self::InvalidForwardPeriodCount { .. } => "INVALID_FORWARD_PERIOD_COUNT",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::DuplicateCostCentre(_) => "DUPLICATE_COST_CENTRE",
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::RetainedEarningsNotEquity(_) => "RETAINED_EARNINGS_NOT_EQUITY",
            Self::MissingStandardCostCentre(_) => "MISSING_STANDARD_COST_CENTRE",
            Self::StandardCostCentreNotLocal(_) => "STANDARD_COST_CENTRE_NOT_LOCAL",
            Self::UnknownReallocationTarget { .. } => "UNKNOWN_REALLOCATION_TARGET",
        }
    }
}
