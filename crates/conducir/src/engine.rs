//! Execution engine: runs selected test cases against one browser session.
//!
//! One session, one case at a time. Within a case, operation groups run in
//! declared order and operations within a group run in declared order. The
//! first failing operation aborts the remainder of *that* case only; the
//! failure is recorded on the report and the run continues with the next
//! case. Nothing in here exits the process.

use crate::registry::{OperationRegistry, Session};
use crate::report::{CaseResult, RunReport};
use crate::result::{ConducirError, ConducirResult};
use crate::schema::TestCase;
use std::time::Instant;
use tracing::{info, warn};

/// Dispatches each selected case's operations through the registry.
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    registry: OperationRegistry,
}

impl ExecutionEngine {
    /// Create an engine with the builtin handlers
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: OperationRegistry::new(),
        }
    }

    /// Create an engine around a custom registry
    #[must_use]
    pub fn with_registry(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    /// The registry in use
    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run the selected cases in order and aggregate their results.
    ///
    /// Navigates to the configured login URL once at session start (skipped
    /// when empty). A failure there is the only error this method returns;
    /// every in-case failure lands on the report instead. A cancelled token
    /// stops the run between cases; cases not reached are absent from the
    /// report.
    pub fn run(&self, session: &mut Session, cases: &[TestCase]) -> ConducirResult<RunReport> {
        let start = Instant::now();

        if !session.settings.login_url.is_empty() {
            let url = session.settings.login_url.clone();
            info!(url = %url, "opening login page");
            session.driver.navigate(&url)?;
        }

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            if session.cancel.is_cancelled() {
                warn!("run cancelled; skipping remaining test cases");
                break;
            }
            results.push(self.run_case(session, case));
        }

        Ok(RunReport::new(results, start.elapsed()))
    }

    /// Run a single case, converting the first failure into its result.
    pub fn run_case(&self, session: &mut Session, case: &TestCase) -> CaseResult {
        let start = Instant::now();
        info!(case = %case.name, operations = case.operation_count(), "running test case");

        for group in &case.groups {
            for op in &group.operations {
                if session.cancel.is_cancelled() {
                    return CaseResult::failed(
                        &case.name,
                        start.elapsed(),
                        Some(op.name.clone()),
                        ConducirError::Cancelled.to_string(),
                    );
                }
                if let Err(err) = self.registry.dispatch(op, session) {
                    warn!(case = %case.name, operation = %op.name, error = %err, "test case failed");
                    return CaseResult::failed(
                        &case.name,
                        start.elapsed(),
                        Some(op.name.clone()),
                        err.to_string(),
                    );
                }
            }
        }

        info!(case = %case.name, "test case passed");
        CaseResult::passed(&case.name, start.elapsed())
    }
}
