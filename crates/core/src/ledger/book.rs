//! The ledger book: everything period-end reads and writes for one ledger.
//!
//! A book is loaded inside a store transaction, changed in memory and
//! written back on commit. Period-end operations work on a clone and only
//! replace the caller's book when they succeed.

use std::collections::{BTreeMap, BTreeSet};

use ledgerclose_shared::types::{AccountCode, BatchNumber, CostCentreCode, LedgerNumber};
use rust_decimal::Decimal;

use super::balance::{GlmKey, GlmRecord};
use super::batch::{Batch, BatchKind, BatchOrigin, BatchStatus};
use super::entry::JournalLine;
use super::types::{Account, CostCentre, Ledger, LedgerFlag};
use crate::currency::ExchangeRate;
use crate::fiscal::AccountingPeriod;

/// In-memory state of one ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerBook {
    /// Ledger header and period pointer.
    pub ledger: Ledger,
    /// Accounting periods ordered by number (regular then forward).
    pub periods: Vec<AccountingPeriod>,
    /// Chart of accounts.
    pub accounts: BTreeMap<AccountCode, Account>,
    /// Cost centres.
    pub cost_centres: BTreeMap<CostCentreCode, CostCentre>,
    /// Batches of every status.
    pub batches: BTreeMap<BatchNumber, Batch>,
    /// General ledger master records.
    pub balances: BTreeMap<GlmKey, GlmRecord>,
    /// Exchange rates known to the ledger.
    pub exchange_rates: Vec<ExchangeRate>,
    /// Ledger init flags.
    pub flags: BTreeSet<LedgerFlag>,
}

impl LedgerBook {
    /// Creates a book with no master data.
    #[must_use]
    pub fn new(ledger: Ledger, periods: Vec<AccountingPeriod>) -> Self {
        Self {
            ledger,
            periods,
            accounts: BTreeMap::new(),
            cost_centres: BTreeMap::new(),
            batches: BTreeMap::new(),
            balances: BTreeMap::new(),
            exchange_rates: Vec::new(),
            flags: BTreeSet::new(),
        }
    }

    /// Ledger number.
    #[must_use]
    pub fn number(&self) -> LedgerNumber {
        self.ledger.number
    }

    // ========== Periods ==========

    /// Finds a period by number.
    #[must_use]
    pub fn period(&self, number: i32) -> Option<&AccountingPeriod> {
        self.periods.iter().find(|p| p.number == number)
    }

    /// Finds a period by number for modification.
    pub fn period_mut(&mut self, number: i32) -> Option<&mut AccountingPeriod> {
        self.periods.iter_mut().find(|p| p.number == number)
    }

    /// The period the ledger currently posts into.
    #[must_use]
    pub fn current_period(&self) -> Option<&AccountingPeriod> {
        self.period(self.ledger.current_period)
    }

    // ========== Master data ==========

    /// Adds or replaces an account.
    pub fn add_account(&mut self, account: Account) {
        self.accounts.insert(account.code.clone(), account);
    }

    /// Adds or replaces a cost centre.
    pub fn add_cost_centre(&mut self, cost_centre: CostCentre) {
        self.cost_centres
            .insert(cost_centre.code.clone(), cost_centre);
    }

    /// Records an exchange rate.
    pub fn add_exchange_rate(&mut self, rate: ExchangeRate) {
        self.exchange_rates.push(rate);
    }

    /// Looks up an account.
    #[must_use]
    pub fn account(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.get(code)
    }

    /// Looks up a cost centre.
    #[must_use]
    pub fn cost_centre(&self, code: &CostCentreCode) -> Option<&CostCentre> {
        self.cost_centres.get(code)
    }

    // ========== Batches ==========

    /// Hands out the next batch number.
    pub fn next_batch_number(&mut self) -> BatchNumber {
        self.ledger.last_batch_number += 1;
        BatchNumber::new(self.ledger.last_batch_number)
    }

    /// Adds an unposted batch for the current financial year.
    ///
    /// Periods beyond the final period address next year's forward periods.
    pub fn add_batch(
        &mut self,
        kind: BatchKind,
        period: i32,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
    ) -> BatchNumber {
        self.insert_batch(kind, BatchOrigin::Manual, period, description.into(), lines)
    }

    /// Adds an unposted GL batch produced by period-end processing.
    pub(crate) fn add_generated_batch(
        &mut self,
        origin: BatchOrigin,
        period: i32,
        description: String,
        lines: Vec<JournalLine>,
    ) -> BatchNumber {
        self.insert_batch(BatchKind::Gl, origin, period, description, lines)
    }

    fn insert_batch(
        &mut self,
        kind: BatchKind,
        origin: BatchOrigin,
        period: i32,
        description: String,
        lines: Vec<JournalLine>,
    ) -> BatchNumber {
        let number = self.next_batch_number();
        self.batches.insert(
            number,
            Batch {
                number,
                kind,
                origin,
                year: self.ledger.current_financial_year,
                period,
                description,
                status: BatchStatus::Unposted,
                lines,
            },
        );
        number
    }

    /// Looks up a batch.
    #[must_use]
    pub fn batch(&self, number: BatchNumber) -> Option<&Batch> {
        self.batches.get(&number)
    }

    /// Unposted batches of a kind in one period.
    pub fn unposted_batches(
        &self,
        kind: BatchKind,
        year: i32,
        period: i32,
    ) -> impl Iterator<Item = &Batch> {
        self.batches
            .values()
            .filter(move |b| b.kind == kind && b.year == year && b.period == period)
            .filter(|b| b.is_unposted())
    }

    // ========== Balances ==========

    /// Looks up a general ledger master record.
    #[must_use]
    pub fn glm(&self, year: i32, account: &AccountCode, cost_centre: &CostCentreCode) -> Option<&GlmRecord> {
        self.balances
            .get(&GlmKey::new(year, account.clone(), cost_centre.clone()))
    }

    /// Returns the record for `key`, creating an empty one when missing.
    pub fn glm_entry(&mut self, key: GlmKey) -> &mut GlmRecord {
        let periods = usize::try_from(self.ledger.total_periods()).unwrap_or(0);
        self.balances
            .entry(key.clone())
            .or_insert_with(|| GlmRecord::new(key, periods))
    }

    /// All master records of a financial year.
    pub fn records_for_year(&self, year: i32) -> impl Iterator<Item = &GlmRecord> {
        self.balances.values().filter(move |r| r.key.year == year)
    }

    /// Balance of an account over all cost centres at the end of `period`.
    #[must_use]
    pub fn account_balance(&self, year: i32, account: &AccountCode, period: i32) -> Decimal {
        self.records_for_year(year)
            .filter(|r| &r.key.account == account)
            .map(|r| r.balance_at(period))
            .sum()
    }

    /// Sum of all balances at the end of `period`; zero when the books balance.
    #[must_use]
    pub fn trial_balance(&self, year: i32, period: i32) -> Decimal {
        self.records_for_year(year).map(|r| r.balance_at(period)).sum()
    }

    // ========== Flags ==========

    /// Returns true if the flag is set.
    #[must_use]
    pub fn has_flag(&self, flag: LedgerFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Sets a flag.
    pub fn set_flag(&mut self, flag: LedgerFlag) {
        self.flags.insert(flag);
    }
}
