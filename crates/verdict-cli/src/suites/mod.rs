//! Bundled demonstration suites
//!
//! Each module registers one group of suites against a [`TestRunner`].
//! Every bundled test is expected to pass.

mod async_api;
mod integration;
mod mocking;
mod unit;

use clap::ValueEnum;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use verdict_runtime::{TestError, TestRunner};

/// Return type of bundled test bodies.
pub(crate) type Outcome = Result<(), TestError>;

/// Lock shared fixture state. A panicking test must not wedge the tests
/// after it, so poisoning is ignored.
pub(crate) fn fixture<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteKind {
    /// Math, string and array helpers
    Unit,
    /// User registry and observable counter
    Integration,
    /// JSON client over a scripted transport
    Async,
    /// Function, API, injected and partial mocks
    Mocking,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 4] = [
        SuiteKind::Unit,
        SuiteKind::Integration,
        SuiteKind::Async,
        SuiteKind::Mocking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuiteKind::Unit => "unit",
            SuiteKind::Integration => "integration",
            SuiteKind::Async => "async",
            SuiteKind::Mocking => "mocking",
        }
    }

    fn register(self, runner: &mut TestRunner) {
        match self {
            SuiteKind::Unit => unit::register(runner),
            SuiteKind::Integration => integration::register(runner),
            SuiteKind::Async => async_api::register(runner),
            SuiteKind::Mocking => mocking::register(runner),
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register the selected groups in canonical order; all of them when
/// `kinds` is empty. Repeated kinds are registered once.
pub fn register(runner: &mut TestRunner, kinds: &[SuiteKind]) {
    for kind in SuiteKind::ALL {
        if kinds.is_empty() || kinds.contains(&kind) {
            kind.register(runner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suite_names(kinds: &[SuiteKind]) -> Vec<String> {
        let mut runner = TestRunner::new();
        register(&mut runner, kinds);
        runner.suites().iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_register_all_by_default() {
        assert_eq!(
            suite_names(&[]),
            vec![
                "Math Utils",
                "String Utils",
                "Array Utils",
                "UserManager Integration",
                "Counter with Observers",
                "Async API Client",
                "Function Mocks",
                "Function Mocks > Async",
                "API Mocking",
                "Dependency Injection Mocking",
                "Partial Mocking",
                "Storage Mocks",
            ]
        );
    }

    #[test]
    fn test_register_selection_keeps_canonical_order() {
        assert_eq!(
            suite_names(&[SuiteKind::Async, SuiteKind::Unit, SuiteKind::Async]),
            vec!["Math Utils", "String Utils", "Array Utils", "Async API Client"]
        );
    }

    #[test]
    fn test_every_bundled_test_passes() {
        let mut runner = TestRunner::new();
        register(&mut runner, &[]);
        let total = runner.test_count();
        let results = runner.run_tests_blocking().unwrap().to_vec();

        let failures: Vec<_> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| format!("{}: {:?}", r.name, r.error))
            .collect();
        assert_eq!(failures, Vec::<String>::new());
        assert_eq!(results.len(), total);
    }
}
