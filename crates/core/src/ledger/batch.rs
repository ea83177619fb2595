//! Batches: groups of journal lines posted together.

use ledgerclose_shared::types::BatchNumber;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntryType, JournalLine};

/// Sub-system a batch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    /// General ledger journal batch.
    Gl,
    /// Gift batch from gift processing.
    Gift,
    /// Accounts payable document batch.
    Ap,
}

impl BatchKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gl => "gl",
            Self::Gift => "gift",
            Self::Ap => "ap",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gl" => Some(Self::Gl),
            "gift" => Some(Self::Gift),
            "ap" => Some(Self::Ap),
            _ => None,
        }
    }
}

/// Posting status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Entered but not yet in the balances.
    Unposted,
    /// Posted to the balances (immutable).
    Posted,
    /// Abandoned without posting (immutable).
    Cancelled,
}

impl BatchStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unposted => "unposted",
            Self::Posted => "posted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unposted" => Some(Self::Unposted),
            "posted" => Some(Self::Posted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Who produced a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOrigin {
    /// Entered by a user or an upstream sub-system.
    Manual,
    /// Month-end stewardship transfer.
    Stewardship,
    /// Foreign-currency revaluation.
    Revaluation,
    /// Year-end reallocation to retained earnings.
    Reallocation,
}

impl BatchOrigin {
    /// Returns the string representation of the origin.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Stewardship => "stewardship",
            Self::Revaluation => "revaluation",
            Self::Reallocation => "reallocation",
        }
    }

    /// Parses an origin from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "stewardship" => Some(Self::Stewardship),
            "revaluation" => Some(Self::Revaluation),
            "reallocation" => Some(Self::Reallocation),
            _ => None,
        }
    }
}

/// A batch of journal lines belonging to one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Ledger-wide batch number.
    pub number: BatchNumber,
    /// Sub-system.
    pub kind: BatchKind,
    /// Producer.
    pub origin: BatchOrigin,
    /// Financial year the batch posts into.
    pub year: i32,
    /// Period the batch posts into.
    pub period: i32,
    /// Description.
    pub description: String,
    /// Posting status.
    pub status: BatchStatus,
    /// Journal lines.
    pub lines: Vec<JournalLine>,
}

impl Batch {
    /// Returns true while the batch still has to be posted or cancelled.
    #[must_use]
    pub fn is_unposted(&self) -> bool {
        self.status == BatchStatus::Unposted
    }

    /// Sum of debit lines.
    #[must_use]
    pub fn debit_total(&self) -> Decimal {
        self.side_total(EntryType::Debit)
    }

    /// Sum of credit lines.
    #[must_use]
    pub fn credit_total(&self) -> Decimal {
        self.side_total(EntryType::Credit)
    }

    fn side_total(&self, side: EntryType) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.entry_type == side)
            .map(|l| l.amount)
            .sum()
    }
}
