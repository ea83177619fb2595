//! Month-end and year-end closing.
//!
//! `PeriodEndService` runs the checks, drives the `CloseStateMachine` and
//! applies stewardship, reallocation, revaluation and the new-year rollover
//! to a `LedgerBook`.

pub mod checks;
pub mod error;
pub mod reallocation;
pub mod report;
pub mod revaluation;
pub mod service;
pub mod state;
pub mod stewardship;
pub mod verification;
pub mod year_end;


#[cfg(test)]
#[path = "service_props.rs"]
mod service_props;

pub use error::PeriodEndError;
pub use report::{MonthEndReport, RevaluationReport, RunReport, YearEndReport};
pub use revaluation::RevaluationAdjustment;
pub use service::PeriodEndService;
pub use state::{ClosePhase, CloseStateMachine};
pub use verification::{Severity, VerificationCode, VerificationResult, VerificationResults};
