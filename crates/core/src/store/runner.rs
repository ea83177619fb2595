//! Runs period-end operations inside store transactions.

use ledgerclose_shared::types::{BatchNumber, LedgerNumber};
use serde::Serialize;
use tracing::{debug, warn};

use super::{LedgerStore, RunError};
use crate::fiscal::AccountingPeriod;
use crate::ledger::{Ledger, LedgerBook, PostingService};
use crate::period_end::{
    MonthEndReport, PeriodEndError, PeriodEndService, RevaluationReport, RunReport,
    VerificationResults, YearEndReport, checks,
};

/// Where a ledger stands, with the checks month-end would run now.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatus {
    /// Ledger header.
    pub ledger: Ledger,
    /// Current period.
    pub period: Option<AccountingPeriod>,
    /// Result of the month-end checks.
    pub checks: VerificationResults,
}

/// Applies `PeriodEndService` operations to stored ledgers.
///
/// Each call is one transaction: committed when the operation succeeded
/// and changed the ledger, rolled back otherwise.
pub struct PeriodEndRunner<S> {
    store: S,
    service: PeriodEndService,
}

impl<S: LedgerStore> PeriodEndRunner<S> {
    /// Creates a runner.
    pub fn new(store: S, service: PeriodEndService) -> Self {
        Self { store, service }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs month-end on a ledger.
    pub async fn month_end(
        &self,
        ledger: LedgerNumber,
        info_only: bool,
    ) -> Result<MonthEndReport, RunError> {
        self.run(ledger, |service, book| service.month_end(book, info_only))
            .await
    }

    /// Runs year-end on a ledger.
    pub async fn year_end(
        &self,
        ledger: LedgerNumber,
        info_only: bool,
    ) -> Result<YearEndReport, RunError> {
        self.run(ledger, |service, book| service.year_end(book, info_only))
            .await
    }

    /// Revalues a ledger's foreign-currency balances.
    pub async fn revalue(
        &self,
        ledger: LedgerNumber,
        info_only: bool,
    ) -> Result<RevaluationReport, RunError> {
        self.run(ledger, |service, book| service.revalue(book, info_only))
            .await
    }

    /// Reports the ledger position without changing anything.
    pub async fn status(&self, ledger: LedgerNumber) -> Result<LedgerStatus, RunError> {
        let (tx, book) = self.store.begin(ledger).await?;
        let status = LedgerStatus {
            ledger: book.ledger.clone(),
            period: book.current_period().cloned(),
            checks: checks::month_end(&book, self.service.settings()),
        };
        self.store.rollback(tx).await?;
        Ok(status)
    }

    /// Posts an unposted batch.
    pub async fn post_batch(
        &self,
        ledger: LedgerNumber,
        batch: BatchNumber,
    ) -> Result<(), RunError> {
        let (tx, mut book) = self.store.begin(ledger).await?;

        match PostingService::post(&mut book, batch) {
            Ok(()) => {
                self.store.commit(tx, &book).await?;
                Ok(())
            }
            Err(e) => {
                self.store.rollback(tx).await?;
                Err(e.into())
            }
        }
    }

    async fn run<R, F>(&self, ledger: LedgerNumber, operation: F) -> Result<R, RunError>
    where
        R: RunReport,
        F: FnOnce(&PeriodEndService, &mut LedgerBook) -> Result<R, PeriodEndError>,
    {
        let (tx, mut book) = self.store.begin(ledger).await?;

        match operation(&self.service, &mut book) {
            Ok(report) if report.changed_ledger() => {
                self.store.commit(tx, &book).await?;
                debug!(ledger = %ledger, "Transaction committed");
                Ok(report)
            }
            Ok(report) => {
                self.store.rollback(tx).await?;
                debug!(ledger = %ledger, "Transaction rolled back");
                Ok(report)
            }
            Err(e) => {
                self.store.rollback(tx).await?;
                warn!(ledger = %ledger, error = %e, "Period-end run failed");
                Err(e.into())
            }
        }
    }
}
