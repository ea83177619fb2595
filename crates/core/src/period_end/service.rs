//! Period-end orchestration.
//!
//! Each operation checks the ledger, works on a copy of the book and
//! replaces the caller's book only when no critical result was found. A
//! blocked or report-only run leaves the book exactly as it was.

use ledgerclose_shared::config::PeriodEndSettings;
use ledgerclose_shared::types::{BatchNumber, RunId};
use tracing::{info, warn};

use super::checks;
use super::error::PeriodEndError;
use super::reallocation;
use super::report::{MonthEndReport, RevaluationReport, YearEndReport};
use super::revaluation;
use super::state::{ClosePhase, CloseStateMachine};
use super::stewardship;
use super::verification::{VerificationCode, VerificationResult, VerificationResults};
use super::year_end;
use crate::fiscal::PeriodStatus;
use crate::ledger::{LedgerBook, LedgerFlag};

/// Runs month-end, year-end and revaluation against a ledger book.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodEndService {
    settings: PeriodEndSettings,
}

impl PeriodEndService {
    /// Creates a service with the given switches.
    #[must_use]
    pub fn new(settings: PeriodEndSettings) -> Self {
        Self { settings }
    }

    /// Active switches.
    #[must_use]
    pub fn settings(&self) -> &PeriodEndSettings {
        &self.settings
    }

    /// Closes the current period.
    ///
    /// Runs the month-end checks; when none is critical and `info_only` is
    /// false, posts the stewardship batch, closes the period and advances
    /// the ledger. Closing the final period either runs year-end (automatic
    /// mode) or leaves the ledger waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `PeriodEndError` when a generated batch cannot be posted or
    /// the ledger calendar is inconsistent. The book is unchanged.
    pub fn month_end(
        &self,
        book: &mut LedgerBook,
        info_only: bool,
    ) -> Result<MonthEndReport, PeriodEndError> {
        let ledger = &book.ledger;
        let mut report = MonthEndReport {
            run_id: RunId::new(),
            ledger: ledger.number,
            year: ledger.current_financial_year,
            period: ledger.current_period,
            batch_numbers: Vec::new(),
            stewardship_batch: false,
            verification: checks::month_end(book, &self.settings),
            phases: Vec::new(),
            info_only,
            year_end: None,
        };
        let mut machine = CloseStateMachine::start(ClosePhase::of(ledger));

        info!(
            run_id = %report.run_id,
            ledger = %report.ledger,
            year = report.year,
            period = report.period,
            info_only,
            "Month-end started"
        );

        // A ledger waiting for year-end cannot start closing; the checks
        // already report why.
        if machine.phase() == ClosePhase::YearEndPending {
            return Ok(Self::finish_month_end(report, machine));
        }

        machine.advance(ClosePhase::Closing)?;
        if report.verification.has_critical() || info_only {
            if ledger.is_final_period() && self.settings.auto_year_end {
                report
                    .verification
                    .extend(checks::year_end_readiness(book));
            }
            machine.advance(ClosePhase::Open)?;
            return Ok(Self::finish_month_end(report, machine));
        }

        let mut work = book.clone();

        if self.settings.stewardship
            && let Some(number) = stewardship::run(&mut work)?
        {
            report.batch_numbers.push(number);
            report.stewardship_batch = true;
            report.verification.push(VerificationResult::status(
                VerificationCode::BatchGenerated,
                format!("ledger {} period {}", report.ledger, report.period),
                format!("stewardship batch {number} posted"),
            ));
        }

        work.period_mut(report.period)
            .ok_or(PeriodEndError::PeriodMissing(report.period))?
            .status = PeriodStatus::Closed;
        machine.advance(ClosePhase::Closed)?;

        if work.ledger.is_final_period() {
            work.ledger.provisional_year_end = true;

            if self.settings.auto_year_end {
                let year_end = self.close_year(&mut work, &mut machine, report.run_id, false)?;
                let blocked = year_end.verification.has_critical();
                report.verification.extend(year_end.verification.clone());
                report.year_end = Some(year_end);
                if blocked {
                    return Ok(Self::finish_month_end(report, machine));
                }
            } else {
                machine.advance(ClosePhase::YearEndPending)?;
            }
        } else {
            work.ledger.current_period += 1;
            machine.advance(ClosePhase::Open)?;
        }

        *book = work;
        Ok(Self::finish_month_end(report, machine))
    }

    /// Closes the financial year of a ledger whose final period is closed.
    ///
    /// # Errors
    ///
    /// Returns `PeriodEndError` when the reallocation batch cannot be
    /// posted. The book is unchanged.
    pub fn year_end(
        &self,
        book: &mut LedgerBook,
        info_only: bool,
    ) -> Result<YearEndReport, PeriodEndError> {
        let mut machine = CloseStateMachine::start(ClosePhase::of(&book.ledger));
        let mut work = book.clone();
        let mut report = self.close_year(&mut work, &mut machine, RunId::new(), info_only)?;
        report.phases = machine.into_trail();

        if report.verification.has_critical() {
            warn!(ledger = %report.ledger, year = report.closed_year, "Year-end blocked");
        } else if !info_only {
            *book = work;
        }
        Ok(report)
    }

    /// Revalues foreign-currency balances of the current period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodEndError::MissingRate` when a currency has no
    /// corporate rate at the period end date. The book is unchanged.
    pub fn revalue(
        &self,
        book: &mut LedgerBook,
        info_only: bool,
    ) -> Result<RevaluationReport, PeriodEndError> {
        let ledger = &book.ledger;
        let mut report = RevaluationReport {
            run_id: RunId::new(),
            ledger: ledger.number,
            year: ledger.current_financial_year,
            period: ledger.current_period,
            batch_number: None,
            adjustments: Vec::new(),
            verification: VerificationResults::new(),
            info_only,
        };
        let ctx = format!("ledger {} period {}", report.ledger, report.period);

        if ledger.provisional_year_end {
            report.verification.push(VerificationResult::critical(
                VerificationCode::YearEndPending,
                ctx,
                "period is closed and waiting for year-end",
            ));
            return Ok(report);
        }

        report.adjustments = revaluation::compute(book)?;
        if info_only {
            return Ok(report);
        }

        let mut work = book.clone();
        report.batch_number = revaluation::post(&mut work, &report.adjustments)?;
        work.set_flag(LedgerFlag::Revaluation {
            year: report.year,
            period: report.period,
        });

        if let Some(number) = report.batch_number {
            report.verification.push(VerificationResult::status(
                VerificationCode::BatchGenerated,
                ctx,
                format!("revaluation batch {number} posted"),
            ));
        }

        info!(
            run_id = %report.run_id,
            ledger = %report.ledger,
            period = report.period,
            adjustments = report.adjustments.len(),
            "Revaluation completed"
        );

        *book = work;
        Ok(report)
    }

    /// Year-end steps shared by both entry points.
    ///
    /// Mutates `work` only when the checks pass and `info_only` is false.
    fn close_year(
        &self,
        work: &mut LedgerBook,
        machine: &mut CloseStateMachine,
        run_id: RunId,
        info_only: bool,
    ) -> Result<YearEndReport, PeriodEndError> {
        let mut report = YearEndReport {
            run_id,
            ledger: work.number(),
            closed_year: work.ledger.current_financial_year,
            reallocation_batch: None,
            records_carried: 0,
            forward_batches_moved: 0,
            verification: checks::year_end(work),
            phases: Vec::new(),
            info_only,
        };
        let start = machine.trail().len();

        if report.verification.has_critical() || info_only {
            return Ok(report);
        }

        machine.advance(ClosePhase::YearEndProcessing)?;
        report.reallocation_batch = reallocation::run(work)?;

        let rollover = year_end::roll_over(work);
        report.records_carried = rollover.records_carried;
        report.forward_batches_moved = rollover.forward_batches_moved;
        machine.advance(ClosePhase::NewYearOpen)?;

        report.phases = machine.trail()[start - 1..].to_vec();
        if let Some(number) = report.reallocation_batch {
            report.verification.push(VerificationResult::status(
                VerificationCode::BatchGenerated,
                format!("ledger {} year {}", report.ledger, report.closed_year),
                format!("reallocation batch {number} posted"),
            ));
        }

        info!(
            run_id = %run_id,
            ledger = %report.ledger,
            year = report.closed_year,
            records = report.records_carried,
            "Year-end completed"
        );

        Ok(report)
    }

    fn finish_month_end(mut report: MonthEndReport, machine: CloseStateMachine) -> MonthEndReport {
        report.phases = machine.into_trail();

        if report.verification.has_critical() {
            warn!(
                run_id = %report.run_id,
                ledger = %report.ledger,
                period = report.period,
                critical = report.verification.critical().count(),
                "Month-end blocked"
            );
        } else if !report.info_only {
            info!(
                run_id = %report.run_id,
                ledger = %report.ledger,
                period = report.period,
                batches = ?report.batch_numbers.iter().copied().map(BatchNumber::value).collect::<Vec<_>>(),
                "Month-end completed"
            );
        }
        report
    }
}
