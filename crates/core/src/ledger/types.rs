//! Ledger master data: the ledger itself, accounts, cost centres and flags.

use ledgerclose_shared::types::{AccountCode, CostCentreCode, CurrencyCode, LedgerNumber};
use serde::{Deserialize, Serialize};

/// A ledger and its period pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Ledger number.
    pub number: LedgerNumber,
    /// Display name.
    pub name: String,
    /// Currency all balances are kept in.
    pub base_currency: CurrencyCode,
    /// Financial year currently being posted to.
    pub current_financial_year: i32,
    /// Period currently open for posting (1-based).
    pub current_period: i32,
    /// Number of regular periods per year (normally 12).
    pub number_of_accounting_periods: i32,
    /// Periods after the final period that accept next-year postings.
    pub number_fwd_posting_periods: i32,
    /// The final period is closed and the year-end has not run yet.
    pub provisional_year_end: bool,
    /// Last batch number handed out.
    pub last_batch_number: i32,
    /// Equity account receiving income and expense balances at year-end.
    pub retained_earnings_account: AccountCode,
    /// Account receiving revaluation differences.
    pub forex_gains_losses_account: AccountCode,
    /// Inter-ledger clearing account used by stewardship.
    pub ich_clearing_account: AccountCode,
    /// Cost centre used for ledger-level postings.
    pub standard_cost_centre: CostCentreCode,
}

impl Ledger {
    /// Returns true if the current period is the last regular period.
    #[must_use]
    pub fn is_final_period(&self) -> bool {
        self.current_period == self.number_of_accounting_periods
    }

    /// Total number of periods held: regular plus forward-posting.
    #[must_use]
    pub fn total_periods(&self) -> i32 {
        self.number_of_accounting_periods + self.number_fwd_posting_periods
    }

    /// Highest period number accepting postings right now.
    #[must_use]
    pub fn last_postable_period(&self) -> i32 {
        (self.current_period + self.number_fwd_posting_periods).min(self.total_periods())
    }

    /// Returns true if `period` belongs to the next financial year.
    #[must_use]
    pub fn is_forward_period(&self, period: i32) -> bool {
        period > self.number_of_accounting_periods
    }
}

/// Classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Asset (debit normal).
    Asset,
    /// Liability (credit normal).
    Liability,
    /// Equity (credit normal).
    Equity,
    /// Income (credit normal, closed at year-end).
    Income,
    /// Expense (debit normal, closed at year-end).
    Expense,
}

impl AccountKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Income and expense accounts are reallocated at year-end.
    #[must_use]
    pub fn is_income_expense(&self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }

    /// Returns true for accounts whose balance grows with debits.
    #[must_use]
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account code.
    pub code: AccountCode,
    /// Display name.
    pub name: String,
    /// Classification.
    pub kind: AccountKind,
    /// Currency the account is held in, when not the base currency.
    pub foreign_currency: Option<CurrencyCode>,
    /// Suspense marker: balances must be cleared before the year closes.
    pub is_suspense: bool,
    /// Inactive accounts reject postings.
    pub is_active: bool,
}

impl Account {
    /// Creates an active base-currency account.
    #[must_use]
    pub fn new(code: impl Into<AccountCode>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind,
            foreign_currency: None,
            is_suspense: false,
            is_active: true,
        }
    }

    /// Marks the account as held in a foreign currency.
    #[must_use]
    pub fn in_currency(mut self, currency: impl Into<CurrencyCode>) -> Self {
        self.foreign_currency = Some(currency.into());
        self
    }

    /// Marks the account as a suspense account.
    #[must_use]
    pub fn suspense(mut self) -> Self {
        self.is_suspense = true;
        self
    }
}

/// Whether a cost centre belongs to this ledger or to a partner ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCentreKind {
    /// Cost centre of this ledger.
    Local,
    /// Cost centre administered for another ledger; settled by stewardship.
    Foreign,
}

impl CostCentreKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Foreign => "foreign",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "foreign" => Some(Self::Foreign),
            _ => None,
        }
    }
}

/// A cost centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCentre {
    /// Cost centre code.
    pub code: CostCentreCode,
    /// Display name.
    pub name: String,
    /// Local or foreign.
    pub kind: CostCentreKind,
    /// Cost centre whose retained earnings receive this one's year-end result.
    pub reallocate_to: Option<CostCentreCode>,
    /// Inactive cost centres reject postings.
    pub is_active: bool,
}

impl CostCentre {
    /// Creates an active local cost centre.
    #[must_use]
    pub fn new(code: impl Into<CostCentreCode>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind: CostCentreKind::Local,
            reallocate_to: None,
            is_active: true,
        }
    }

    /// Marks the cost centre as foreign.
    #[must_use]
    pub fn foreign(mut self) -> Self {
        self.kind = CostCentreKind::Foreign;
        self
    }

    /// Sets the year-end reallocation target.
    #[must_use]
    pub fn reallocating_to(mut self, target: impl Into<CostCentreCode>) -> Self {
        self.reallocate_to = Some(target.into());
        self
    }

    /// Cost centre that receives this cost centre's year-end result.
    #[must_use]
    pub fn reallocation_target(&self) -> &CostCentreCode {
        self.reallocate_to.as_ref().unwrap_or(&self.code)
    }
}

/// Per-ledger markers recording that a step has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LedgerFlag {
    /// Revaluation has run for the given year and period.
    Revaluation {
        /// Financial year.
        year: i32,
        /// Period number.
        period: i32,
    },
}

impl LedgerFlag {
    /// Storage key of the flag (e.g. `REVAL:2026:3`).
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Revaluation { year, period } => format!("REVAL:{year}:{period}"),
        }
    }

    /// Parses a storage key.
    pub fn parse_key(key: &str) -> Option<Self> {
        let mut parts = key.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("REVAL"), Some(year), Some(period), None) => Some(Self::Revaluation {
                year: year.parse().ok()?,
                period: period.parse().ok()?,
            }),
            _ => None,
        }
    }

    /// Financial year the flag refers to.
    #[must_use]
    pub fn year(&self) -> i32 {
        match self {
            Self::Revaluation { year, .. } => *year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger {
            number: LedgerNumber::new(43),
            name: "Test".to_string(),
            base_currency: CurrencyCode::from("EUR"),
            current_financial_year: 2026,
            current_period: 12,
            number_of_accounting_periods: 12,
            number_fwd_posting_periods: 4,
            provisional_year_end: false,
            last_batch_number: 0,
            retained_earnings_account: AccountCode::from("9700"),
            forex_gains_losses_account: AccountCode::from("5003"),
            ich_clearing_account: AccountCode::from("8500"),
            standard_cost_centre: CostCentreCode::from("4300"),
        }
    }

    #[test]
    fn test_period_arithmetic() {
        let mut ledger = ledger();
        assert!(ledger.is_final_period());
        assert_eq!(ledger.total_periods(), 16);
        assert_eq!(ledger.last_postable_period(), 16);
        assert!(ledger.is_forward_period(13));
        assert!(!ledger.is_forward_period(12));

        ledger.current_period = 3;
        assert!(!ledger.is_final_period());
        assert_eq!(ledger.last_postable_period(), 7);
    }

    #[test]
    fn test_account_kind_rules() {
        assert!(AccountKind::Income.is_income_expense());
        assert!(AccountKind::Expense.is_income_expense());
        assert!(!AccountKind::Equity.is_income_expense());
        assert!(AccountKind::Asset.is_debit_normal());
        assert!(!AccountKind::Liability.is_debit_normal());
        assert_eq!(AccountKind::parse("Income"), Some(AccountKind::Income));
        assert_eq!(AccountKind::parse("other"), None);
    }

    #[test]
    fn test_reallocation_target_defaults_to_self() {
        let cc = CostCentre::new("4300", "Main");
        assert_eq!(cc.reallocation_target().as_str(), "4300");

        let child = CostCentre::new("4310", "Branch").reallocating_to("4300");
        assert_eq!(child.reallocation_target().as_str(), "4300");
    }

    #[test]
    fn test_flag_key_roundtrip() {
        let flag = LedgerFlag::Revaluation { year: 2026, period: 3 };
        assert_eq!(flag.key(), "REVAL:2026:3");
        assert_eq!(LedgerFlag::parse_key("REVAL:2026:3"), Some(flag));
        assert_eq!(LedgerFlag::parse_key("REVAL:x:3"), None);
        assert_eq!(LedgerFlag::parse_key("OTHER"), None);
    }
}
