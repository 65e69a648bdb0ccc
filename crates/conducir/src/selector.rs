//! Test selection: which declared cases run, in what order.
//!
//! The run-selection list is authoritative: the executed order is its order,
//! regardless of declaration order, and a declared case it does not name is
//! not run. A selected name with no declared case is recorded on the
//! selection and logged, rather than silently dropped.

use crate::schema::{RunSelection, TestCase};
use std::collections::HashMap;
use tracing::warn;

/// Outcome of resolving a run selection against the declared set.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Cases to execute, in run order
    pub cases: Vec<TestCase>,
    /// Selected names with no declared case, in selection order
    pub missing: Vec<String>,
}

impl Selection {
    /// Whether every selected name matched a declared case
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Names of the cases that will execute, in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Resolves run selections against the declared test cases.
#[derive(Debug, Clone)]
pub struct TestSelector {
    by_name: HashMap<String, TestCase>,
}

impl TestSelector {
    /// Index the declared cases by name
    #[must_use]
    pub fn new(declared: impl IntoIterator<Item = TestCase>) -> Self {
        let by_name = declared
            .into_iter()
            .map(|case| (case.name.clone(), case))
            .collect();
        Self { by_name }
    }

    /// Number of declared cases
    #[must_use]
    pub fn declared_count(&self) -> usize {
        self.by_name.len()
    }

    /// Resolve a run selection, preserving its order exactly.
    #[must_use]
    pub fn select(&self, run: &RunSelection) -> Selection {
        let mut cases = Vec::new();
        let mut missing = Vec::new();

        for name in run.names() {
            match self.by_name.get(name) {
                Some(case) => cases.push(case.clone()),
                None => {
                    warn!(name = %name, "run selection names an undeclared test case");
                    missing.push(name.clone());
                }
            }
        }

        Selection { cases, missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn declared() -> Vec<TestCase> {
        ["alpha", "beta", "gamma", "delta"]
            .into_iter()
            .map(TestCase::new)
            .collect()
    }

    #[test]
    fn test_selection_follows_run_order_not_declaration_order() {
        let selector = TestSelector::new(declared());
        let run: RunSelection = ["gamma", "alpha"].into_iter().collect();
        let selection = selector.select(&run);
        assert_eq!(selection.names(), ["gamma", "alpha"]);
        assert!(selection.is_complete());
    }

    #[test]
    fn test_unselected_cases_are_omitted() {
        let selector = TestSelector::new(declared());
        let run: RunSelection = ["beta"].into_iter().collect();
        let selection = selector.select(&run);
        assert_eq!(selection.names(), ["beta"]);
    }

    #[test]
    fn test_undeclared_names_are_surfaced() {
        let selector = TestSelector::new(declared());
        let run: RunSelection = ["alpha", "unknown", "delta"].into_iter().collect();
        let selection = selector.select(&run);
        assert_eq!(selection.names(), ["alpha", "delta"]);
        assert_eq!(selection.missing, ["unknown"]);
        assert!(!selection.is_complete());
    }

    #[test]
    fn test_empty_selection_runs_nothing() {
        let selector = TestSelector::new(declared());
        let selection = selector.select(&RunSelection::default());
        assert!(selection.cases.is_empty());
        assert!(selection.is_complete());
    }

    #[test]
    fn test_repeated_name_runs_repeatedly() {
        let selector = TestSelector::new(declared());
        let run: RunSelection = ["alpha", "alpha"].into_iter().collect();
        let selection = selector.select(&run);
        assert_eq!(selection.names(), ["alpha", "alpha"]);
    }

    proptest! {
        #[test]
        fn prop_executed_order_equals_run_list_filtered(
            picks in proptest::collection::vec(0usize..6, 0..12)
        ) {
            // indices 0..4 are declared; 4 and 5 name nothing
            let pool = ["alpha", "beta", "gamma", "delta", "ghost", "phantom"];
            let selector = TestSelector::new(declared());
            let run: RunSelection = picks.iter().map(|&i| pool[i]).collect();

            let selection = selector.select(&run);

            let expected_names: Vec<&str> = picks
                .iter()
                .filter(|&&i| i < 4)
                .map(|&i| pool[i])
                .collect();
            let expected_missing: Vec<&str> = picks
                .iter()
                .filter(|&&i| i >= 4)
                .map(|&i| pool[i])
                .collect();

            prop_assert_eq!(selection.names(), expected_names);
            prop_assert_eq!(
                selection.missing.iter().map(String::as_str).collect::<Vec<_>>(),
                expected_missing
            );
        }
    }
}
