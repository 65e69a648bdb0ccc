//! Per-case results and the aggregate run report.
//!
//! A failed case never short-circuits the run; the report carries every
//! executed case with its triggering error, and the aggregate verdict is
//! derived from the per-case results.

use crate::result::ConducirResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Every operation completed
    Passed,
    /// An operation failed and the rest of the case was skipped
    Failed,
}

impl CaseStatus {
    /// Whether the case passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of running a single test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Outcome
    pub status: CaseStatus,
    /// Wall-clock duration of the case
    pub duration: Duration,
    /// Name of the operation that failed, if any
    pub failed_operation: Option<String>,
    /// Triggering error, if any
    pub error: Option<String>,
}

impl CaseResult {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Passed,
            duration,
            failed_operation: None,
            error: None,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        failed_operation: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Failed,
            duration,
            failed_operation,
            error: Some(error.into()),
        }
    }
}

/// Aggregate results of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-case results, in execution order
    pub results: Vec<CaseResult>,
    /// Wall-clock duration of the whole run
    pub duration: Duration,
}

impl RunReport {
    /// Create a report from executed case results
    #[must_use]
    pub fn new(results: Vec<CaseResult>, duration: Duration) -> Self {
        Self { results, duration }
    }

    /// Whether every executed case passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status.is_passed())
    }

    /// Count of passing cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Count of failing cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Total executed cases
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The failing cases
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results
            .iter()
            .filter(|r| !r.status.is_passed())
            .collect()
    }

    /// Serialize the report as pretty JSON for export by outer harnesses
    pub fn to_json(&self) -> ConducirResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary: one verdict line plus one line per failure
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} passed, {} failed ({} total)",
            self.passed_count(),
            self.failed_count(),
            self.total()
        );
        for failure in self.failures() {
            let operation = failure.failed_operation.as_deref().unwrap_or("?");
            let error = failure.error.as_deref().unwrap_or("unknown error");
            out.push_str(&format!(
                "\n  {}: {} in {}",
                failure.name, error, operation
            ));
        }
        out
    }
}
