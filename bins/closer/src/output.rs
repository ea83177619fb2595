//! Text rendering of run reports.
//!
//! Verification results print one per line as
//! `SEVERITY CODE context: message`.

use std::fmt::Write;

use ledgerclose_core::period_end::{
    ClosePhase, MonthEndReport, RevaluationReport, RunReport, VerificationResults, YearEndReport,
};
use ledgerclose_core::store::LedgerStatus;
use ledgerclose_shared::types::BatchNumber;

/// Renders the status of a ledger.
pub fn status(status: &LedgerStatus) -> String {
    let ledger = &status.ledger;
    let mut out = format!(
        "ledger {} ({}) year {} period {}",
        ledger.number, ledger.name, ledger.current_financial_year, ledger.current_period
    );
    if let Some(period) = &status.period {
        let _ = write!(
            out,
            " [{} {}..{} {}]",
            period.name,
            period.start_date,
            period.end_date,
            period.status.as_str()
        );
    }
    if ledger.provisional_year_end {
        out.push_str(" provisional year-end");
    }
    out.push('\n');
    push_results(&mut out, &status.checks);
    out
}

/// Renders a month-end report.
pub fn month_end(report: &MonthEndReport) -> String {
    let mut out = format!(
        "month-end ledger {} year {} period {}: {}\n",
        report.ledger,
        report.year,
        report.period,
        outcome(report)
    );
    if !report.batch_numbers.is_empty() {
        let kind = if report.stewardship_batch {
            " (stewardship)"
        } else {
            ""
        };
        let _ = writeln!(out, "batches: {}{kind}", batches(&report.batch_numbers));
    }
    push_phases(&mut out, &report.phases);
    push_results(&mut out, &report.verification);
    // The year-end results are already part of the month-end results.
    if let Some(year_end) = &report.year_end {
        push_year_end_summary(&mut out, year_end);
    }
    out
}

/// Renders a year-end report.
pub fn year_end(report: &YearEndReport) -> String {
    let mut out = String::new();
    push_year_end_summary(&mut out, report);
    push_results(&mut out, &report.verification);
    out
}

fn push_year_end_summary(out: &mut String, report: &YearEndReport) {
    let _ = writeln!(
        out,
        "year-end ledger {} year {}: {}",
        report.ledger,
        report.closed_year,
        outcome(report)
    );
    if let Some(batch) = report.reallocation_batch {
        let _ = writeln!(out, "reallocation batch: {batch}");
    }
    if report.succeeded() && !report.info_only {
        let _ = writeln!(
            out,
            "records carried: {}, forward batches moved: {}",
            report.records_carried, report.forward_batches_moved
        );
    }
    push_phases(out, &report.phases);
}

/// Renders a revaluation report.
pub fn revaluation(report: &RevaluationReport) -> String {
    let mut out = format!(
        "revaluation ledger {} year {} period {}: {}\n",
        report.ledger,
        report.year,
        report.period,
        outcome(report)
    );
    for adj in &report.adjustments {
        let _ = writeln!(
            out,
            "  {}/{} {} {} @ {} base {} difference {}",
            adj.account,
            adj.cost_centre,
            adj.currency,
            adj.foreign_balance,
            adj.rate,
            adj.base_balance,
            adj.difference
        );
    }
    if let Some(batch) = report.batch_number {
        let _ = writeln!(out, "batch: {batch}");
    }
    push_results(&mut out, &report.verification);
    out
}

fn outcome(report: &impl RunReport) -> &'static str {
    if !report.succeeded() {
        "blocked"
    } else if report.is_info_only() {
        "checked"
    } else {
        "done"
    }
}

fn batches(numbers: &[BatchNumber]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_phases(out: &mut String, phases: &[ClosePhase]) {
    if phases.is_empty() {
        return;
    }
    let trail = phases
        .iter()
        .map(ClosePhase::as_str)
        .collect::<Vec<_>>()
        .join(" -> ");
    let _ = writeln!(out, "phases: {trail}");
}

fn push_results(out: &mut String, results: &VerificationResults) {
    for result in results.iter() {
        let _ = writeln!(out, "{result}");
    }
}
