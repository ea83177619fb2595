//! Verification results collected by period-end checks.
//!
//! Every check contributes a tagged result. `Status` results are
//! informational; a single `Critical` result stops the run.

use std::fmt;

use serde::Serialize;

/// How serious a verification result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Informational; the run may continue.
    Status,
    /// Blocking; the run must not change the ledger.
    Critical,
}

impl Severity {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "STATUS",
            Self::Critical => "CRITICAL",
        }
    }
}

/// What a verification result is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VerificationCode {
    /// The final period is closed and year-end has not run yet.
    YearEndPending,
    /// GL batches of the period are still unposted.
    UnpostedGlBatches,
    /// A suspense account carries a balance.
    SuspenseBalance,
    /// Gift batches of the period are still unposted.
    UnpostedGiftBatches,
    /// AP documents of the period are still unposted.
    UnpostedApDocuments,
    /// Foreign-currency balances have not been revalued for the period.
    RevaluationPending,
    /// Year-end requested before the final period was closed.
    NotAtYearEnd,
    /// The retained earnings account is not usable.
    RetainedEarningsMissing,
    /// A generated batch was created and posted.
    BatchGenerated,
}

impl VerificationCode {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YearEndPending => "YEAR_END_PENDING",
            Self::UnpostedGlBatches => "UNPOSTED_GL_BATCHES",
            Self::SuspenseBalance => "SUSPENSE_BALANCE",
            Self::UnpostedGiftBatches => "UNPOSTED_GIFT_BATCHES",
            Self::UnpostedApDocuments => "UNPOSTED_AP_DOCUMENTS",
            Self::RevaluationPending => "REVALUATION_PENDING",
            Self::NotAtYearEnd => "NOT_AT_YEAR_END",
            Self::RetainedEarningsMissing => "RETAINED_EARNINGS_MISSING",
            Self::BatchGenerated => "BATCH_GENERATED",
        }
    }
}

/// One tagged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Result code.
    pub code: VerificationCode,
    /// Severity.
    pub severity: Severity,
    /// Where the condition was found, e.g. `ledger 43 period 3`.
    pub context: String,
    /// Human-readable description.
    pub message: String,
}

impl VerificationResult {
    /// Creates an informational result.
    #[must_use]
    pub fn status(
        code: VerificationCode,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_severity(code, Severity::Status, context, message)
    }

    /// Creates a blocking result.
    #[must_use]
    pub fn critical(
        code: VerificationCode,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_severity(code, Severity::Critical, context, message)
    }

    /// Creates a result with an explicit severity.
    #[must_use]
    pub fn with_severity(
        code: VerificationCode,
        severity: Severity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            context: context.into(),
            message: message.into(),
        }
    }

    /// Returns true for blocking results.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.severity.as_str(),
            self.code.as_str(),
            self.context,
            self.message
        )
    }
}

/// Ordered collection of results from one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerificationResults(Vec<VerificationResult>);

impl VerificationResults {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: VerificationResult) {
        self.0.push(result);
    }

    /// Appends every result of another collection.
    pub fn extend(&mut self, other: VerificationResults) {
        self.0.extend(other.0);
    }

    /// Returns true if any result is critical.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.0.iter().any(VerificationResult::is_critical)
    }

    /// Returns true if a result with `code` is present.
    #[must_use]
    pub fn contains(&self, code: VerificationCode) -> bool {
        self.0.iter().any(|r| r.code == code)
    }

    /// Returns the result with `code`, if any.
    #[must_use]
    pub fn find(&self, code: VerificationCode) -> Option<&VerificationResult> {
        self.0.iter().find(|r| r.code == code)
    }

    /// Critical results only.
    pub fn critical(&self) -> impl Iterator<Item = &VerificationResult> {
        self.0.iter().filter(|r| r.is_critical())
    }

    /// All results in the order they were produced.
    pub fn iter(&self) -> impl Iterator<Item = &VerificationResult> {
        self.0.iter()
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for VerificationResults {
    type Item = VerificationResult;
    type IntoIter = std::vec::IntoIter<VerificationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
