//! Ledger creation.

use std::collections::BTreeSet;

use chrono::Datelike;
use tracing::info;

use super::error::SetupError;
use super::types::CreateLedgerInput;
use crate::fiscal::generate_monthly_periods;
use crate::ledger::{AccountKind, CostCentreKind, Ledger, LedgerBook};

/// Upper bound for regular periods per year.
pub const MAX_ACCOUNTING_PERIODS: i32 = 20;

/// Upper bound for forward posting periods.
pub const MAX_FWD_POSTING_PERIODS: i32 = 8;

/// Creates ledgers.
pub struct LedgerSetup;

impl LedgerSetup {
    /// Validates the input and builds a new ledger book positioned on
    /// period 1 of the year containing `year_start`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` describing the first invalid field.
    pub fn create(input: CreateLedgerInput) -> Result<LedgerBook, SetupError> {
        Self::validate(&input)?;

        let ledger = Ledger {
            number: input.number,
            name: input.name.trim().to_string(),
            base_currency: input.base_currency,
            current_financial_year: input.year_start.year(),
            current_period: 1,
            number_of_accounting_periods: input.number_of_accounting_periods,
            number_fwd_posting_periods: input.number_fwd_posting_periods,
            provisional_year_end: false,
            last_batch_number: 0,
            retained_earnings_account: input.retained_earnings_account,
            forex_gains_losses_account: input.forex_gains_losses_account,
            ich_clearing_account: input.ich_clearing_account,
            standard_cost_centre: input.standard_cost_centre,
        };

        let periods = generate_monthly_periods(input.year_start, ledger.total_periods());
        let mut book = LedgerBook::new(ledger, periods);

        for account in input.accounts {
            book.add_account(account);
        }
        for cost_centre in input.cost_centres {
            book.add_cost_centre(cost_centre);
        }
        for rate in input.exchange_rates {
            book.add_exchange_rate(rate);
        }

        info!(
            ledger = %book.number(),
            year = book.ledger.current_financial_year,
            periods = book.periods.len(),
            "Ledger created"
        );

        Ok(book)
    }

    fn validate(input: &CreateLedgerInput) -> Result<(), SetupError> {
        if input.name.trim().is_empty() {
            return Err(SetupError::NameRequired);
        }
        if input.base_currency.is_empty() {
            return Err(SetupError::BaseCurrencyRequired);
        }
        if !(1..=MAX_ACCOUNTING_PERIODS).contains(&input.number_of_accounting_periods) {
            return Err(SetupError::InvalidPeriodCount {
                got: input.number_of_accounting_periods,
                max: MAX_ACCOUNTING_PERIODS,
            });
        }
        if !(0..=MAX_FWD_POSTING_PERIODS).contains(&input.number_fwd_posting_periods) {
            return Err(SetupError::InvalidForwardPeriodCount {
                got: input.number_fwd_posting_periods,
                max: MAX_FWD_POSTING_PERIODS,
            });
        }

        let mut codes = BTreeSet::new();
        for account in &input.accounts {
            if !codes.insert(&account.code) {
                return Err(SetupError::DuplicateAccount(account.code.clone()));
            }
        }

        let find = |role: &'static str, code: &ledgerclose_shared::types::AccountCode| {
            input
                .accounts
                .iter()
                .find(|a| &a.code == code)
                .ok_or_else(|| SetupError::MissingAccount {
                    role,
                    code: code.clone(),
                })
        };

        let retained = find("Retained earnings", &input.retained_earnings_account)?;
        if retained.kind != AccountKind::Equity {
            return Err(SetupError::RetainedEarningsNotEquity(retained.code.clone()));
        }
        find("Forex gains/losses", &input.forex_gains_losses_account)?;
        find("ICH clearing", &input.ich_clearing_account)?;

        let mut centres = BTreeSet::new();
        for cost_centre in &input.cost_centres {
            if !centres.insert(&cost_centre.code) {
                return Err(SetupError::DuplicateCostCentre(cost_centre.code.clone()));
            }
        }

        let standard = input
            .cost_centres
            .iter()
            .find(|c| c.code == input.standard_cost_centre)
            .ok_or_else(|| SetupError::MissingStandardCostCentre(input.standard_cost_centre.clone()))?;
        if standard.kind != CostCentreKind::Local {
            return Err(SetupError::StandardCostCentreNotLocal(standard.code.clone()));
        }

        for cost_centre in &input.cost_centres {
            if let Some(target) = &cost_centre.reallocate_to
                && !centres.contains(target)
            {
                return Err(SetupError::UnknownReallocationTarget {
                    cost_centre: cost_centre.code.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(())
    }
}
