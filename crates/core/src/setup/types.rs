//! Input types for ledger setup.

use chrono::NaiveDate;
use ledgerclose_shared::types::{AccountCode, CostCentreCode, CurrencyCode, LedgerNumber};

use crate::currency::ExchangeRate;
use crate::ledger::{Account, CostCentre};

/// Everything needed to create a ledger.
#[derive(Debug, Clone)]
pub struct CreateLedgerInput {
    /// Ledger number.
    pub number: LedgerNumber,
    /// Display name.
    pub name: String,
    /// Base currency.
    pub base_currency: CurrencyCode,
    /// First day of the first financial year; its year names the financial year.
    pub year_start: NaiveDate,
    /// Regular periods per year, normally 12.
    pub number_of_accounting_periods: i32,
    /// Forward posting periods after the final period.
    pub number_fwd_posting_periods: i32,
    /// Target of the year-end reallocation.
    pub retained_earnings_account: AccountCode,
    /// Counter-account for revaluation adjustments.
    pub forex_gains_losses_account: AccountCode,
    /// Counter-account for stewardship transfers.
    pub ich_clearing_account: AccountCode,
    /// Cost centre for ledger-level postings.
    pub standard_cost_centre: CostCentreCode,
    /// Chart of accounts.
    pub accounts: Vec<Account>,
    /// Cost centres.
    pub cost_centres: Vec<CostCentre>,
    /// Initial exchange rates.
    pub exchange_rates: Vec<ExchangeRate>,
}
