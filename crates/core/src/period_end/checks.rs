//! Checks run before a period or year is closed.

use ledgerclose_shared::config::PeriodEndSettings;

use super::revaluation;
use super::verification::{Severity, VerificationCode, VerificationResult, VerificationResults};
use crate::ledger::{AccountKind, BatchKind, LedgerBook, LedgerFlag};

fn context(book: &LedgerBook) -> String {
    format!(
        "ledger {} period {}",
        book.number(),
        book.ledger.current_period
    )
}

/// Runs the month-end checks in order.
#[must_use]
pub fn month_end(book: &LedgerBook, settings: &PeriodEndSettings) -> VerificationResults {
    let mut results = VerificationResults::new();
    let ctx = context(book);

    if book.ledger.provisional_year_end {
        results.push(VerificationResult::critical(
            VerificationCode::YearEndPending,
            &ctx,
            format!(
                "financial year {} is waiting for year-end",
                book.ledger.current_financial_year
            ),
        ));
        return results;
    }

    unposted(book, BatchKind::Gl, Severity::Critical, &ctx, &mut results);
    suspense(book, &ctx, &mut results);
    unposted(book, BatchKind::Gift, Severity::Critical, &ctx, &mut results);
    unposted(book, BatchKind::Ap, Severity::Status, &ctx, &mut results);

    let severity = if settings.strict_revaluation {
        Severity::Critical
    } else {
        Severity::Status
    };
    pending_revaluation(book, severity, &ctx, &mut results);

    results
}

/// Runs the year-end checks.
#[must_use]
pub fn year_end(book: &LedgerBook) -> VerificationResults {
    let mut results = VerificationResults::new();
    let ledger = &book.ledger;
    let ctx = format!(
        "ledger {} year {}",
        book.number(),
        ledger.current_financial_year
    );

    if !ledger.provisional_year_end {
        results.push(VerificationResult::critical(
            VerificationCode::NotAtYearEnd,
            &ctx,
            format!(
                "period {} of {} is still open",
                ledger.current_period, ledger.number_of_accounting_periods
            ),
        ));
    }

    retained_earnings(book, &ctx, &mut results);
    results
}

/// Year-end checks that do not depend on the ledger already waiting for
/// year-end. Month-end reports them ahead of closing the final period.
#[must_use]
pub fn year_end_readiness(book: &LedgerBook) -> VerificationResults {
    let mut results = VerificationResults::new();
    let ctx = format!(
        "ledger {} year {}",
        book.number(),
        book.ledger.current_financial_year
    );
    retained_earnings(book, &ctx, &mut results);
    results
}

fn retained_earnings(book: &LedgerBook, ctx: &str, results: &mut VerificationResults) {
    let retained = &book.ledger.retained_earnings_account;
    match book.account(retained) {
        Some(account) if account.is_active && account.kind == AccountKind::Equity => {}
        Some(_) => results.push(VerificationResult::critical(
            VerificationCode::RetainedEarningsMissing,
            ctx,
            format!("retained earnings account {retained} is not an active equity account"),
        )),
        None => results.push(VerificationResult::critical(
            VerificationCode::RetainedEarningsMissing,
            ctx,
            format!("retained earnings account {retained} does not exist"),
        )),
    }
}

fn unposted(
    book: &LedgerBook,
    kind: BatchKind,
    severity: Severity,
    ctx: &str,
    results: &mut VerificationResults,
) {
    let numbers: Vec<String> = book
        .unposted_batches(
            kind,
            book.ledger.current_financial_year,
            book.ledger.current_period,
        )
        .map(|b| b.number.to_string())
        .collect();

    if numbers.is_empty() {
        return;
    }

    let (code, singular, plural) = match kind {
        BatchKind::Gl => (VerificationCode::UnpostedGlBatches, "GL batch", "GL batches"),
        BatchKind::Gift => (VerificationCode::UnpostedGiftBatches, "gift batch", "gift batches"),
        BatchKind::Ap => (VerificationCode::UnpostedApDocuments, "AP document", "AP documents"),
    };
    let noun = if numbers.len() == 1 { singular } else { plural };

    results.push(VerificationResult::with_severity(
        code,
        severity,
        ctx,
        format!("unposted {noun}: {}", numbers.join(", ")),
    ));
}

fn suspense(book: &LedgerBook, ctx: &str, results: &mut VerificationResults) {
    let ledger = &book.ledger;
    let severity = if ledger.is_final_period() {
        Severity::Critical
    } else {
        Severity::Status
    };

    for record in book.records_for_year(ledger.current_financial_year) {
        let is_suspense = book
            .account(&record.key.account)
            .is_some_and(|a| a.is_suspense);
        if !is_suspense {
            continue;
        }

        let balance = record.balance_at(ledger.current_period);
        if !balance.is_zero() {
            results.push(VerificationResult::with_severity(
                VerificationCode::SuspenseBalance,
                severity,
                ctx,
                format!(
                    "suspense account {} on cost centre {} has balance {balance}",
                    record.key.account, record.key.cost_centre
                ),
            ));
        }
    }
}

fn pending_revaluation(
    book: &LedgerBook,
    severity: Severity,
    ctx: &str,
    results: &mut VerificationResults,
) {
    let ledger = &book.ledger;
    let flag = LedgerFlag::Revaluation {
        year: ledger.current_financial_year,
        period: ledger.current_period,
    };
    if book.has_flag(flag) {
        return;
    }

    let mut currencies: Vec<String> = revaluation::candidates(book)
        .map(|(currency, _)| currency.to_string())
        .collect();
    currencies.sort();
    currencies.dedup();

    if !currencies.is_empty() {
        results.push(VerificationResult::with_severity(
            VerificationCode::RevaluationPending,
            severity,
            ctx,
            format!(
                "foreign-currency balances in {} have not been revalued",
                currencies.join(", ")
            ),
        ));
    }
}
