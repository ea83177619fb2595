//! Balance rules for batches.

use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::{EntryType, JournalLine};

/// Validation errors for journal lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerValidationError {
    /// Lines do not balance.
    #[error("Batch is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Batch has no lines.
    #[error("Batch must have at least one line")]
    NoEntries,

    /// Batch has only one side (all debits or all credits).
    #[error("Batch must have both debit and credit lines")]
    SingleSided,

    /// Line amount is zero or negative.
    #[error("Line amount must be positive")]
    InvalidAmount,
}

/// Validates that a set of journal lines is balanced.
///
/// # Errors
///
/// Returns an error if the lines are not balanced or violate business rules.
pub fn validate_lines(lines: &[JournalLine]) -> Result<(), LedgerValidationError> {
    if lines.is_empty() {
        return Err(LedgerValidationError::NoEntries);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerValidationError::InvalidAmount);
        }

        match line.entry_type {
            EntryType::Debit => {
                total_debits += line.amount;
                has_debit = true;
            }
            EntryType::Credit => {
                total_credits += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerValidationError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}
