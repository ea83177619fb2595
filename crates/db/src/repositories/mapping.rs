//! Conversions between table rows and domain types.

use std::collections::BTreeMap;

use ledgerclose_core::currency::{ExchangeRate, RateType};
use ledgerclose_core::fiscal::{AccountingPeriod, PeriodStatus};
use ledgerclose_core::ledger::{
    Account, AccountKind, Batch, BatchKind, BatchOrigin, BatchStatus, CostCentre, CostCentreKind,
    EntryType, GlmKey, GlmRecord, JournalLine, Ledger, LedgerFlag,
};
use ledgerclose_core::store::StoreError;
use ledgerclose_shared::types::{BatchNumber, LedgerNumber};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::entities::{
    accounting_periods, accounts, batches, cost_centres, exchange_rates, glm, glm_periods,
    journal_lines, ledger_flags, ledgers,
};

fn corrupt(table: &str, column: &str, value: &str) -> StoreError {
    StoreError::Corrupt(format!("{table}.{column} has unknown value '{value}'"))
}

// ========== Ledger ==========

/// Maps a ledger row.
pub fn ledger_from_model(model: ledgers::Model) -> Ledger {
    Ledger {
        number: LedgerNumber::new(model.number),
        name: model.name,
        base_currency: model.base_currency.into(),
        current_financial_year: model.current_financial_year,
        current_period: model.current_period,
        number_of_accounting_periods: model.number_of_accounting_periods,
        number_fwd_posting_periods: model.number_fwd_posting_periods,
        provisional_year_end: model.provisional_year_end,
        last_batch_number: model.last_batch_number,
        retained_earnings_account: model.retained_earnings_account.into(),
        forex_gains_losses_account: model.forex_gains_losses_account.into(),
        ich_clearing_account: model.ich_clearing_account.into(),
        standard_cost_centre: model.standard_cost_centre.into(),
    }
}

/// Builds the row for a ledger; timestamps are left to the database.
pub fn ledger_to_active(ledger: &Ledger) -> ledgers::ActiveModel {
    ledgers::ActiveModel {
        number: Set(ledger.number.value()),
        name: Set(ledger.name.clone()),
        base_currency: Set(ledger.base_currency.to_string()),
        current_financial_year: Set(ledger.current_financial_year),
        current_period: Set(ledger.current_period),
        number_of_accounting_periods: Set(ledger.number_of_accounting_periods),
        number_fwd_posting_periods: Set(ledger.number_fwd_posting_periods),
        provisional_year_end: Set(ledger.provisional_year_end),
        last_batch_number: Set(ledger.last_batch_number),
        retained_earnings_account: Set(ledger.retained_earnings_account.to_string()),
        forex_gains_losses_account: Set(ledger.forex_gains_losses_account.to_string()),
        ich_clearing_account: Set(ledger.ich_clearing_account.to_string()),
        standard_cost_centre: Set(ledger.standard_cost_centre.to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
}

// ========== Calendar and master data ==========

/// Maps an accounting period row.
pub fn period_from_model(model: accounting_periods::Model) -> Result<AccountingPeriod, StoreError> {
    let status = PeriodStatus::parse(&model.status)
        .ok_or_else(|| corrupt("accounting_periods", "status", &model.status))?;
    Ok(AccountingPeriod {
        number: model.period_number,
        name: model.name,
        start_date: model.start_date,
        end_date: model.end_date,
        status,
    })
}

/// Builds the row for an accounting period.
pub fn period_to_active(
    ledger: LedgerNumber,
    period: &AccountingPeriod,
) -> accounting_periods::ActiveModel {
    accounting_periods::ActiveModel {
        ledger_number: Set(ledger.value()),
        period_number: Set(period.number),
        name: Set(period.name.clone()),
        start_date: Set(period.start_date),
        end_date: Set(period.end_date),
        status: Set(period.status.as_str().to_string()),
    }
}

/// Maps an account row.
pub fn account_from_model(model: accounts::Model) -> Result<Account, StoreError> {
    let kind =
        AccountKind::parse(&model.kind).ok_or_else(|| corrupt("accounts", "kind", &model.kind))?;
    Ok(Account {
        code: model.code.into(),
        name: model.name,
        kind,
        foreign_currency: model.foreign_currency.map(Into::into),
        is_suspense: model.is_suspense,
        is_active: model.is_active,
    })
}

/// Builds the row for an account.
pub fn account_to_active(ledger: LedgerNumber, account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        ledger_number: Set(ledger.value()),
        code: Set(account.code.to_string()),
        name: Set(account.name.clone()),
        kind: Set(account.kind.as_str().to_string()),
        foreign_currency: Set(account.foreign_currency.as_ref().map(ToString::to_string)),
        is_suspense: Set(account.is_suspense),
        is_active: Set(account.is_active),
    }
}

/// Maps a cost centre row.
pub fn cost_centre_from_model(model: cost_centres::Model) -> Result<CostCentre, StoreError> {
    let kind = CostCentreKind::parse(&model.kind)
        .ok_or_else(|| corrupt("cost_centres", "kind", &model.kind))?;
    Ok(CostCentre {
        code: model.code.into(),
        name: model.name,
        kind,
        reallocate_to: model.reallocate_to.map(Into::into),
        is_active: model.is_active,
    })
}

/// Builds the row for a cost centre.
pub fn cost_centre_to_active(
    ledger: LedgerNumber,
    cost_centre: &CostCentre,
) -> cost_centres::ActiveModel {
    cost_centres::ActiveModel {
        ledger_number: Set(ledger.value()),
        code: Set(cost_centre.code.to_string()),
        name: Set(cost_centre.name.clone()),
        kind: Set(cost_centre.kind.as_str().to_string()),
        reallocate_to: Set(cost_centre.reallocate_to.as_ref().map(ToString::to_string)),
        is_active: Set(cost_centre.is_active),
    }
}

/// Maps an exchange rate row.
pub fn rate_from_model(model: exchange_rates::Model) -> Result<ExchangeRate, StoreError> {
    let rate_type = RateType::parse(&model.rate_type)
        .ok_or_else(|| corrupt("exchange_rates", "rate_type", &model.rate_type))?;
    Ok(ExchangeRate::new(
        model.from_currency,
        model.to_currency,
        model.rate,
        model.effective_date,
        rate_type,
    ))
}

/// Builds the row for an exchange rate.
pub fn rate_to_active(ledger: LedgerNumber, rate: &ExchangeRate) -> exchange_rates::ActiveModel {
    exchange_rates::ActiveModel {
        ledger_number: Set(ledger.value()),
        from_currency: Set(rate.from_currency.to_string()),
        to_currency: Set(rate.to_currency.to_string()),
        rate_type: Set(rate.rate_type.as_str().to_string()),
        effective_date: Set(rate.effective_date),
        rate: Set(rate.rate),
    }
}

/// Maps a ledger flag row.
pub fn flag_from_model(model: &ledger_flags::Model) -> Result<LedgerFlag, StoreError> {
    LedgerFlag::parse_key(&model.flag).ok_or_else(|| corrupt("ledger_flags", "flag", &model.flag))
}

/// Builds the row for a ledger flag.
pub fn flag_to_active(ledger: LedgerNumber, flag: LedgerFlag) -> ledger_flags::ActiveModel {
    ledger_flags::ActiveModel {
        ledger_number: Set(ledger.value()),
        flag: Set(flag.key()),
    }
}

// ========== Batches ==========

/// Assembles a batch from its row and its line rows.
pub fn batch_from_rows(
    model: batches::Model,
    mut lines: Vec<journal_lines::Model>,
) -> Result<Batch, StoreError> {
    let kind = BatchKind::parse(&model.kind).ok_or_else(|| corrupt("batches", "kind", &model.kind))?;
    let origin = BatchOrigin::parse(&model.origin)
        .ok_or_else(|| corrupt("batches", "origin", &model.origin))?;
    let status = BatchStatus::parse(&model.status)
        .ok_or_else(|| corrupt("batches", "status", &model.status))?;

    lines.sort_by_key(|l| l.line_number);
    let lines = lines
        .into_iter()
        .map(|line| {
            let entry_type = EntryType::parse(&line.entry_type)
                .ok_or_else(|| corrupt("journal_lines", "entry_type", &line.entry_type))?;
            Ok(JournalLine {
                account: line.account_code.into(),
                cost_centre: line.cost_centre_code.into(),
                entry_type,
                amount: line.amount,
                foreign_amount: line.foreign_amount,
                narrative: line.narrative,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Batch {
        number: BatchNumber::new(model.batch_number),
        kind,
        origin,
        year: model.year,
        period: model.period,
        description: model.description,
        status,
        lines,
    })
}

/// Builds the batch row and its line rows.
pub fn batch_to_active(
    ledger: LedgerNumber,
    batch: &Batch,
) -> (batches::ActiveModel, Vec<journal_lines::ActiveModel>) {
    let header = batches::ActiveModel {
        ledger_number: Set(ledger.value()),
        batch_number: Set(batch.number.value()),
        kind: Set(batch.kind.as_str().to_string()),
        origin: Set(batch.origin.as_str().to_string()),
        year: Set(batch.year),
        period: Set(batch.period),
        description: Set(batch.description.clone()),
        status: Set(batch.status.as_str().to_string()),
    };

    let lines = batch
        .lines
        .iter()
        .zip(1..)
        .map(|(line, line_number)| journal_lines::ActiveModel {
            ledger_number: Set(ledger.value()),
            batch_number: Set(batch.number.value()),
            line_number: Set(line_number),
            account_code: Set(line.account.to_string()),
            cost_centre_code: Set(line.cost_centre.to_string()),
            entry_type: Set(line.entry_type.as_str().to_string()),
            amount: Set(line.amount),
            foreign_amount: Set(line.foreign_amount),
            narrative: Set(line.narrative.clone()),
        })
        .collect();

    (header, lines)
}

// ========== General ledger master ==========

/// Assembles a master record covering `periods` periods.
///
/// Periods without a row repeat the previous closing balance.
pub fn glm_from_rows(model: glm::Model, rows: &[glm_periods::Model], periods: usize) -> GlmRecord {
    let key = GlmKey::new(
        model.year,
        model.account_code.into(),
        model.cost_centre_code.into(),
    );

    let by_period: BTreeMap<i32, &glm_periods::Model> =
        rows.iter().map(|r| (r.period_number, r)).collect();

    let mut record = GlmRecord::new(key, periods);
    record.start_balance = model.start_balance;
    record.start_foreign = model.start_foreign;

    let mut base = model.start_balance;
    let mut foreign = model.start_foreign;
    for (period, (closing, closing_foreign)) in (1..).zip(
        record
            .closing
            .iter_mut()
            .zip(record.closing_foreign.iter_mut()),
    ) {
        if let Some(row) = by_period.get(&period) {
            base = row.closing_balance;
            foreign = row.closing_foreign;
        }
        *closing = base;
        *closing_foreign = foreign;
    }

    record
}

/// Builds the master row and one row per period.
pub fn glm_to_active(
    ledger: LedgerNumber,
    record: &GlmRecord,
) -> (glm::ActiveModel, Vec<glm_periods::ActiveModel>) {
    let key = &record.key;
    let header = glm::ActiveModel {
        ledger_number: Set(ledger.value()),
        year: Set(key.year),
        account_code: Set(key.account.to_string()),
        cost_centre_code: Set(key.cost_centre.to_string()),
        start_balance: Set(record.start_balance),
        start_foreign: Set(record.start_foreign),
    };

    let rows = record
        .closing
        .iter()
        .zip(&record.closing_foreign)
        .zip(1..)
        .map(|((base, foreign), period)| glm_periods::ActiveModel {
            ledger_number: Set(ledger.value()),
            year: Set(key.year),
            account_code: Set(key.account.to_string()),
            cost_centre_code: Set(key.cost_centre.to_string()),
            period_number: Set(period),
            closing_balance: Set(*base),
            closing_foreign: Set(*foreign),
        })
        .collect();

    (header, rows)
}

// ========== Diffing ==========

/// Rows to delete and rows to insert to turn `before` into `after`.
///
/// A changed entry appears in both lists: it is deleted and re-inserted.
#[derive(Debug)]
pub struct Changes<'a, K, V> {
    /// Keys removed or changed.
    pub stale: Vec<&'a K>,
    /// Values added or changed.
    pub fresh: Vec<&'a V>,
}

impl<K, V> Changes<'_, K, V> {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.stale.is_empty() && self.fresh.is_empty()
    }
}

/// Compares two keyed collections.
pub fn changes<'a, K: Ord, V: PartialEq>(
    before: &'a BTreeMap<K, V>,
    after: &'a BTreeMap<K, V>,
) -> Changes<'a, K, V> {
    let mut stale = Vec::new();
    let mut fresh = Vec::new();

    for (key, old) in before {
        match after.get(key) {
            None => stale.push(key),
            Some(new) if new != old => stale.push(key),
            Some(_) => {}
        }
    }
    for (key, new) in after {
        if before.get(key) != Some(new) {
            fresh.push(new);
        }
    }

    Changes { stale, fresh }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod mapping_tests;
