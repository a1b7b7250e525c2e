//! Run reports.
//!
//! Every assertion made inside a case becomes an [`AssertionRecord`]; the
//! harness folds them into a [`CaseReport`] per case and a [`RunReport`]
//! per run. Reports are handed to a reporter and then dropped.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which assertion produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// `equal` / `equals`
    Equal,
    /// `notEqual`
    NotEqual,
    /// `ok`
    Ok,
    /// `error`
    Error,
    /// `pass`
    Pass,
    /// `fail`
    Fail,
    /// Misuse of `end` (called twice).
    End,
}

impl Operator {
    /// Name used in report diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionRecord {
    /// Whether the assertion held.
    pub ok: bool,
    /// Operator that produced it.
    pub operator: Operator,
    /// Message given by the case, or a default for the operator.
    pub message: String,
    /// Rendered actual value, for failed comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Rendered expected value, for failed comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl AssertionRecord {
    /// A passing record.
    #[must_use]
    pub fn pass(operator: Operator, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            operator,
            message: message.into(),
            actual: None,
            expected: None,
        }
    }

    /// A failing record.
    #[must_use]
    pub fn fail(operator: Operator, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            operator,
            message: message.into(),
            actual: None,
            expected: None,
        }
    }

    /// Attaches the compared values.
    #[must_use]
    pub fn with_values(mut self, actual: impl Into<String>, expected: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self.expected = Some(expected.into());
        self
    }
}

/// How a case finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Ended, and every assertion held.
    Passed,
    /// Ended with a failed assertion, panicked, or returned without ending.
    Failed,
    /// Did not signal completion in time.
    TimedOut {
        /// The limit that was exceeded, in milliseconds.
        after_ms: u64,
    },
    /// Not run.
    Skipped,
}

impl CaseOutcome {
    /// Returns true for outcomes that fail the run.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut { .. })
    }
}

/// Report for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// How it finished.
    pub outcome: CaseOutcome,
    /// Assertions in the order they were made.
    pub assertions: Vec<AssertionRecord>,
    /// Wall time spent on the case, in milliseconds.
    pub duration_ms: u64,
    /// Harness-level note, e.g. a panic message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl CaseReport {
    /// Report for a case that was skipped.
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: CaseOutcome::Skipped,
            assertions: Vec::new(),
            duration_ms: 0,
            diagnostic: None,
        }
    }

    /// Assertions that failed.
    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.assertions.iter().filter(|a| !a.ok)
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Case reports in execution order.
    pub cases: Vec<CaseReport>,
    /// Number of cases.
    pub total: usize,
    /// Cases that passed.
    pub passed: usize,
    /// Cases that failed or timed out.
    pub failed: usize,
    /// Cases that were skipped.
    pub skipped: usize,
    /// Wall time of the run, in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Builds a report, computing the totals.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, cases: Vec<CaseReport>, duration_ms: u64) -> Self {
        let total = cases.len();
        let passed = cases
            .iter()
            .filter(|c| c.outcome == CaseOutcome::Passed)
            .count();
        let failed = cases.iter().filter(|c| c.outcome.is_failure()).count();
        let skipped = total - passed - failed;

        Self {
            id: Uuid::now_v7(),
            started_at,
            cases,
            total,
            passed,
            failed,
            skipped,
            duration_ms,
        }
    }

    /// Check if no case failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Number of assertions across all cases.
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.cases.iter().map(|c| c.assertions.len()).sum()
    }

    /// Number of failed assertions across all cases.
    #[must_use]
    pub fn failed_assertion_count(&self) -> usize {
        self.cases
            .iter()
            .map(|c| c.failed_assertions().count())
            .sum()
    }

    /// Share of executed cases that passed, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            100.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }
}
