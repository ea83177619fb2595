//! Period-end state machine.
//!
//! ```text
//! Open -> Closing -> Closed -> Open                        (regular period)
//!                          -> YearEndPending               (manual year-end)
//!                          -> YearEndProcessing -> NewYearOpen
//! YearEndPending -> YearEndProcessing -> NewYearOpen
//! ```
//!
//! `Closing -> Open` records a run that was stopped by critical results or
//! that only reported.

use std::fmt;

use serde::Serialize;

use super::error::PeriodEndError;
use crate::ledger::Ledger;

/// Phase of the current accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClosePhase {
    /// The period accepts postings.
    Open,
    /// Checks are running.
    Closing,
    /// The period is closed.
    Closed,
    /// The final period is closed; year-end has not run.
    YearEndPending,
    /// Year-end is running.
    YearEndProcessing,
    /// The first period of the new year is open.
    NewYearOpen,
}

impl ClosePhase {
    /// Phase a ledger rests in between runs.
    #[must_use]
    pub fn of(ledger: &Ledger) -> Self {
        if ledger.provisional_year_end {
            Self::YearEndPending
        } else {
            Self::Open
        }
    }

    /// Returns true if the machine may move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open | Self::NewYearOpen, Self::Closing)
                | (Self::Closing, Self::Open | Self::Closed)
                | (
                    Self::Closed,
                    Self::Open | Self::YearEndPending | Self::YearEndProcessing
                )
                | (Self::YearEndPending, Self::YearEndProcessing)
                | (Self::YearEndProcessing, Self::NewYearOpen)
        )
    }

    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::YearEndPending => "year_end_pending",
            Self::YearEndProcessing => "year_end_processing",
            Self::NewYearOpen => "new_year_open",
        }
    }
}

impl fmt::Display for ClosePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the phases one run passes through.
#[derive(Debug, Clone)]
pub struct CloseStateMachine {
    trail: Vec<ClosePhase>,
}

impl CloseStateMachine {
    /// Starts in `phase`.
    #[must_use]
    pub fn start(phase: ClosePhase) -> Self {
        Self { trail: vec![phase] }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ClosePhase {
        self.trail.last().copied().unwrap_or(ClosePhase::Open)
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodEndError::InvalidTransition` for a move the machine
    /// does not allow; the phase is left unchanged.
    pub fn advance(&mut self, next: ClosePhase) -> Result<(), PeriodEndError> {
        let from = self.phase();
        if !from.can_transition_to(next) {
            return Err(PeriodEndError::InvalidTransition { from, to: next });
        }
        self.trail.push(next);
        Ok(())
    }

    /// Phases traversed, starting phase first.
    #[must_use]
    pub fn trail(&self) -> &[ClosePhase] {
        &self.trail
    }

    /// Consumes the machine, returning the phases traversed.
    #[must_use]
    pub fn into_trail(self) -> Vec<ClosePhase> {
        self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ClosePhase::Open, ClosePhase::Closing, true)]
    #[case(ClosePhase::Closing, ClosePhase::Closed, true)]
    #[case(ClosePhase::Closing, ClosePhase::Open, true)]
    #[case(ClosePhase::Closed, ClosePhase::Open, true)]
    #[case(ClosePhase::Closed, ClosePhase::YearEndProcessing, true)]
    #[case(ClosePhase::Closed, ClosePhase::YearEndPending, true)]
    #[case(ClosePhase::YearEndPending, ClosePhase::YearEndProcessing, true)]
    #[case(ClosePhase::YearEndProcessing, ClosePhase::NewYearOpen, true)]
    #[case(ClosePhase::NewYearOpen, ClosePhase::Closing, true)]
    #[case(ClosePhase::Open, ClosePhase::Closed, false)]
    #[case(ClosePhase::Open, ClosePhase::YearEndProcessing, false)]
    #[case(ClosePhase::YearEndPending, ClosePhase::Closing, false)]
    #[case(ClosePhase::Closed, ClosePhase::Closing, false)]
    #[case(ClosePhase::NewYearOpen, ClosePhase::YearEndProcessing, false)]
    fn test_transitions(#[case] from: ClosePhase, #[case] to: ClosePhase, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_machine_records_trail() {
        let mut machine = CloseStateMachine::start(ClosePhase::Open);
        machine.advance(ClosePhase::Closing).unwrap();
        machine.advance(ClosePhase::Closed).unwrap();
        machine.advance(ClosePhase::YearEndProcessing).unwrap();
        machine.advance(ClosePhase::NewYearOpen).unwrap();

        assert_eq!(machine.phase(), ClosePhase::NewYearOpen);
        assert_eq!(machine.trail().len(), 5);
    }

    #[test]
    fn test_illegal_transition_is_error() {
        let mut machine = CloseStateMachine::start(ClosePhase::YearEndPending);
        let err = machine.advance(ClosePhase::Closing).unwrap_err();

        assert_eq!(
            err,
            PeriodEndError::InvalidTransition {
                from: ClosePhase::YearEndPending,
                to: ClosePhase::Closing,
            }
        );
        assert_eq!(machine.phase(), ClosePhase::YearEndPending);
    }
}
