//! Journal line domain types.

use ledgerclose_shared::types::{AccountCode, CostCentreCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/income).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/income).
    Credit,
}

impl EntryType {
    /// Returns the string representation of the side.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Parses a side from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Side that posts a signed (debit-positive) amount.
    #[must_use]
    pub fn for_signed(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::Credit
        } else {
            Self::Debit
        }
    }
}

/// One line of a batch.
///
/// Amounts are positive; the side decides the sign. Lines of a batch must
/// balance in base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account posted to.
    pub account: AccountCode,
    /// Cost centre posted to.
    pub cost_centre: CostCentreCode,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Amount in the ledger's base currency.
    pub amount: Decimal,
    /// Amount in the account's foreign currency, for foreign-currency accounts.
    pub foreign_amount: Option<Decimal>,
    /// Optional line narrative.
    pub narrative: Option<String>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        account: impl Into<AccountCode>,
        cost_centre: impl Into<CostCentreCode>,
        amount: Decimal,
    ) -> Self {
        Self::new(account, cost_centre, EntryType::Debit, amount)
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        account: impl Into<AccountCode>,
        cost_centre: impl Into<CostCentreCode>,
        amount: Decimal,
    ) -> Self {
        Self::new(account, cost_centre, EntryType::Credit, amount)
    }

    /// Creates the line that posts a signed (debit-positive) amount.
    #[must_use]
    pub fn signed(
        account: impl Into<AccountCode>,
        cost_centre: impl Into<CostCentreCode>,
        signed_amount: Decimal,
    ) -> Self {
        Self::new(
            account,
            cost_centre,
            EntryType::for_signed(signed_amount),
            signed_amount.abs(),
        )
    }

    fn new(
        account: impl Into<AccountCode>,
        cost_centre: impl Into<CostCentreCode>,
        entry_type: EntryType,
        amount: Decimal,
    ) -> Self {
        Self {
            account: account.into(),
            cost_centre: cost_centre.into(),
            entry_type,
            amount,
            foreign_amount: None,
            narrative: None,
        }
    }

    /// Attaches the foreign-currency amount.
    #[must_use]
    pub fn with_foreign(mut self, foreign_amount: Decimal) -> Self {
        self.foreign_amount = Some(foreign_amount);
        self
    }

    /// Attaches a narrative.
    #[must_use]
    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    /// Returns the signed base amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }

    /// Returns the signed foreign amount, zero when none is recorded.
    #[must_use]
    pub fn signed_foreign_amount(&self) -> Decimal {
        let amount = self.foreign_amount.unwrap_or(Decimal::ZERO);
        match self.entry_type {
            EntryType::Debit => amount,
            EntryType::Credit => -amount,
        }
    }
}
