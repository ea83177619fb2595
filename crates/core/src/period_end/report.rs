//! Results returned by period-end runs.

use ledgerclose_shared::types::{BatchNumber, LedgerNumber, RunId};
use serde::Serialize;

use super::revaluation::RevaluationAdjustment;
use super::state::ClosePhase;
use super::verification::VerificationResults;

/// Outcome of a month-end run.
#[derive(Debug, Clone, Serialize)]
pub struct MonthEndReport {
    /// Identifies the run in logs.
    pub run_id: RunId,
    /// Ledger processed.
    pub ledger: LedgerNumber,
    /// Financial year of the period processed.
    pub year: i32,
    /// Period processed.
    pub period: i32,
    /// Batches generated and posted by the run.
    pub batch_numbers: Vec<BatchNumber>,
    /// True when `batch_numbers` holds the stewardship batch.
    pub stewardship_batch: bool,
    /// Check results, in the order produced.
    pub verification: VerificationResults,
    /// Phases traversed.
    pub phases: Vec<ClosePhase>,
    /// Nothing was changed because the run only reported.
    pub info_only: bool,
    /// Year-end triggered by closing the final period.
    pub year_end: Option<YearEndReport>,
}

/// Outcome of a year-end run.
#[derive(Debug, Clone, Serialize)]
pub struct YearEndReport {
    /// Identifies the run in logs.
    pub run_id: RunId,
    /// Ledger processed.
    pub ledger: LedgerNumber,
    /// Year being closed.
    pub closed_year: i32,
    /// Reallocation batch, if anything was reallocated.
    pub reallocation_batch: Option<BatchNumber>,
    /// Master records created for the new year.
    pub records_carried: usize,
    /// Forward-period batches moved into the new year.
    pub forward_batches_moved: usize,
    /// Check results, in the order produced.
    pub verification: VerificationResults,
    /// Phases traversed.
    pub phases: Vec<ClosePhase>,
    /// Nothing was changed because the run only reported.
    pub info_only: bool,
}

/// Outcome of a revaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct RevaluationReport {
    /// Identifies the run in logs.
    pub run_id: RunId,
    /// Ledger processed.
    pub ledger: LedgerNumber,
    /// Financial year revalued.
    pub year: i32,
    /// Period revalued.
    pub period: i32,
    /// Posted adjustment batch, if any.
    pub batch_number: Option<BatchNumber>,
    /// Adjustments computed.
    pub adjustments: Vec<RevaluationAdjustment>,
    /// Check results.
    pub verification: VerificationResults,
    /// Nothing was changed because the run only reported.
    pub info_only: bool,
}

/// Common view of a report used by runners and the CLI.
pub trait RunReport {
    /// Check results.
    fn verification(&self) -> &VerificationResults;

    /// Returns true if the run was report-only.
    fn is_info_only(&self) -> bool;

    /// Returns true if no critical result stopped the run.
    fn succeeded(&self) -> bool {
        !self.verification().has_critical()
    }

    /// Returns true if the ledger was changed and must be saved.
    fn changed_ledger(&self) -> bool {
        self.succeeded() && !self.is_info_only()
    }
}

impl RunReport for MonthEndReport {
    fn verification(&self) -> &VerificationResults {
        &self.verification
    }

    fn is_info_only(&self) -> bool {
        self.info_only
    }
}

impl RunReport for YearEndReport {
    fn verification(&self) -> &VerificationResults {
        &self.verification
    }

    fn is_info_only(&self) -> bool {
        self.info_only
    }
}

impl RunReport for RevaluationReport {
    fn verification(&self) -> &VerificationResults {
        &self.verification
    }

    fn is_info_only(&self) -> bool {
        self.info_only
    }
}
