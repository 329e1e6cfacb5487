//! Test registration and execution
//!
//! Suites are registered through [`TestRunner::describe`], which hands the
//! registration block a [`SuiteBuilder`]. Tests run strictly one at a time, in
//! registration order; a failing test never stops the run.

use crate::error::TestError;
use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Suite name given to tests registered outside any `describe` block.
pub const STANDALONE_SUITE: &str = "Standalone Tests";

type SyncFn = Arc<dyn Fn() -> Result<(), TestError> + Send + Sync>;
type AsyncFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), TestError>> + Send + Sync>;
type Listener = Box<dyn FnMut(&[TestResult]) + Send>;

/// The executable part of a test.
#[derive(Clone)]
pub enum TestBody {
    Sync(SyncFn),
    Async(AsyncFn),
}

impl TestBody {
    pub fn sync<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<TestError> + 'static,
    {
        TestBody::Sync(Arc::new(move || f().map_err(Into::into)))
    }

    pub fn asynchronous<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<TestError> + 'static,
    {
        TestBody::Async(Arc::new(move || {
            let fut = f();
            async move { fut.await.map_err(Into::into) }.boxed()
        }))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, TestBody::Async(_))
    }

    /// Run the body; panics are reported as thrown errors.
    pub async fn invoke(&self) -> Result<(), TestError> {
        match self {
            TestBody::Sync(f) => call_guarded(f),
            TestBody::Async(f) => {
                let fut = match panic::catch_unwind(AssertUnwindSafe(|| f())) {
                    Ok(fut) => fut,
                    Err(payload) => return Err(TestError::from_panic(payload)),
                };
                AssertUnwindSafe(fut)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(TestError::from_panic(payload)))
            }
        }
    }
}

impl fmt::Debug for TestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_async() { "TestBody::Async" } else { "TestBody::Sync" })
    }
}

fn call_guarded(f: &SyncFn) -> Result<(), TestError> {
    panic::catch_unwind(AssertUnwindSafe(|| f()))
        .unwrap_or_else(|payload| Err(TestError::from_panic(payload)))
}

/// A named test case.
#[derive(Debug, Clone)]
pub struct Test {
    pub name: String,
    pub body: TestBody,
}

/// An ordered group of tests plus the hooks that wrap each of them.
#[derive(Clone)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<Test>,
    before_each: Vec<SyncFn>,
    after_each: Vec<SyncFn>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Composite result names (`Suite: test`) in execution order.
    pub fn test_names(&self) -> impl Iterator<Item = String> + '_ {
        self.tests.iter().map(|t| composite_name(&self.name, &t.name))
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish()
    }
}

fn composite_name(suite: &str, test: &str) -> String {
    format!("{suite}: {test}")
}

// ============================================================================
// Registration
// ============================================================================

/// Registration context handed to a `describe` block.
///
/// Nested `describe` calls become separate suites named `Outer > Inner`,
/// registered where they are declared: tests of the enclosing block declared
/// before and after the nested block end up in two suites sharing its name
/// and hooks. Nested suites run the enclosing suite's `before_each` hooks
/// before their own and its `after_each` hooks after.
pub struct SuiteBuilder {
    suite: TestSuite,
    entries: Vec<Entry>,
}

/// Declaration-ordered contents of a `describe` block.
enum Entry {
    Test(Test),
    Child(SuiteBuilder),
}

impl SuiteBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            suite: TestSuite::new(name),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.suite.name
    }

    /// Register a synchronous test.
    pub fn it<F, E>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<TestError> + 'static,
    {
        self.add(name, TestBody::sync(body))
    }

    /// Register an asynchronous test; the runner awaits it before moving on.
    pub fn it_async<F, Fut, E>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<TestError> + 'static,
    {
        self.add(name, TestBody::asynchronous(body))
    }

    pub fn add(&mut self, name: impl Into<String>, body: TestBody) -> &mut Self {
        self.entries.push(Entry::Test(Test {
            name: name.into(),
            body,
        }));
        self
    }

    /// Run `hook` before every test of this suite. A failing hook fails the
    /// test and skips its body.
    pub fn before_each<F, E>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<TestError> + 'static,
    {
        self.suite
            .before_each
            .push(Arc::new(move || hook().map_err(Into::into)));
        self
    }

    /// Run `hook` after every test of this suite, whether it passed or not.
    pub fn after_each<F, E>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<TestError> + 'static,
    {
        self.suite
            .after_each
            .push(Arc::new(move || hook().map_err(Into::into)));
        self
    }

    pub fn describe<F>(&mut self, name: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut SuiteBuilder),
    {
        let mut child = SuiteBuilder::new(format!("{} > {}", self.suite.name, name));
        block(&mut child);
        self.entries.push(Entry::Child(child));
        self
    }

    fn finish(self, before: &[SyncFn], after: &[SyncFn], out: &mut Vec<TestSuite>) {
        let TestSuite {
            name,
            before_each,
            after_each,
            ..
        } = self.suite;
        let before: Vec<SyncFn> = before.iter().cloned().chain(before_each).collect();
        let after: Vec<SyncFn> = after_each.into_iter().chain(after.iter().cloned()).collect();
        let segment = |tests: Vec<Test>| TestSuite {
            name: name.clone(),
            tests,
            before_each: before.clone(),
            after_each: after.clone(),
        };

        if self.entries.is_empty() {
            out.push(segment(Vec::new()));
            return;
        }

        let mut pending = Vec::new();
        for entry in self.entries {
            match entry {
                Entry::Test(test) => pending.push(test),
                Entry::Child(child) => {
                    if !pending.is_empty() {
                        out.push(segment(std::mem::take(&mut pending)));
                    }
                    child.finish(&before, &after, out);
                }
            }
        }
        if !pending.is_empty() {
            out.push(segment(pending));
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of a single executed test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// `Suite: test`
    pub name: String,
    pub suite: String,
    pub passed: bool,
    pub error: Option<String>,
    /// Milliseconds.
    #[serde(rename = "duration_ms")]
    pub duration: f64,
}

/// Aggregate numbers derived from a result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestSummary {
    #[serde(rename = "tests")]
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Sum of test durations, in milliseconds.
    #[serde(rename = "duration_ms")]
    pub duration: f64,
    /// Percentage of passing tests; `0.0` when nothing ran.
    pub pass_rate: f64,
}

impl TestSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let duration = results.iter().map(|r| r.duration).sum();
        let pass_rate = if total == 0 {
            0.0
        } else {
            100.0 * passed as f64 / total as f64
        };

        Self {
            total,
            passed,
            failed: total - passed,
            duration,
            pass_rate,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// Runner
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Collecting,
    Running,
}

/// Collects suites and runs them sequentially.
///
/// ```
/// use verdict_runtime::{expect, TestRunner};
///
/// let mut runner = TestRunner::new();
/// runner.describe("Math", |s| {
///     s.it("adds", || expect(1 + 1).to_be(2));
///     s.it("is wrong", || expect(2).to_be(1));
/// });
///
/// let results = runner.run_tests_blocking().unwrap();
/// assert!(results[0].passed);
/// assert_eq!(results[1].error.as_deref(), Some("Expected 2 to be 1"));
/// ```
pub struct TestRunner {
    suites: Vec<TestSuite>,
    results: Vec<TestResult>,
    listeners: Vec<Listener>,
    state: RunnerState,
    timeout: Option<Duration>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            suites: Vec::new(),
            results: Vec::new(),
            listeners: Vec::new(),
            state: RunnerState::Idle,
            timeout: None,
        }
    }

    /// Fail any test that has not settled after `timeout`.
    ///
    /// Without a timeout an async test that never settles stalls the run.
    /// Enforcing one requires a tokio runtime with the time driver enabled,
    /// which [`run_tests_blocking`](Self::run_tests_blocking) provides.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Register a suite. `block` runs immediately; tests it declares keep
    /// their declaration order.
    pub fn describe<F>(&mut self, name: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut SuiteBuilder),
    {
        self.state = RunnerState::Collecting;
        let mut builder = SuiteBuilder::new(name);
        block(&mut builder);
        builder.finish(&[], &[], &mut self.suites);
        self
    }

    /// Register a single synchronous test in its own standalone suite.
    pub fn it<F, E>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<TestError> + 'static,
    {
        self.add_standalone(name, TestBody::sync(body))
    }

    /// Register a single asynchronous test in its own standalone suite.
    pub fn it_async<F, Fut, E>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<TestError> + 'static,
    {
        self.add_standalone(name, TestBody::asynchronous(body))
    }

    fn add_standalone(&mut self, name: impl Into<String>, body: TestBody) -> &mut Self {
        self.state = RunnerState::Collecting;
        let mut suite = TestSuite::new(STANDALONE_SUITE);
        suite.tests.push(Test {
            name: name.into(),
            body,
        });
        self.suites.push(suite);
        self
    }

    /// Register a listener called with the full result sequence after each run.
    pub fn on_results_update<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[TestResult]) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Run every registered test and notify listeners once at the end.
    pub async fn run_tests(&mut self) -> &[TestResult] {
        self.state = RunnerState::Running;
        self.results.clear();

        let suites = self.suites.clone();
        let timeout = self.timeout;
        for suite in &suites {
            for test in &suite.tests {
                let result = run_test(suite, test, timeout).await;
                self.results.push(result);
            }
        }

        let summary = self.summary();
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            duration_ms = summary.duration,
            "test run finished"
        );

        for listener in &mut self.listeners {
            listener(&self.results);
        }
        self.state = RunnerState::Idle;
        &self.results
    }

    /// Drive [`run_tests`](Self::run_tests) to completion on a fresh
    /// current-thread runtime. Must not be called from inside a runtime.
    pub fn run_tests_blocking(&mut self) -> std::io::Result<&[TestResult]> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        Ok(runtime.block_on(self.run_tests()))
    }

    /// Discard every suite and result. Listeners stay registered.
    pub fn clear(&mut self) {
        self.suites.clear();
        self.results.clear();
        self.state = RunnerState::Idle;
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary::from_results(&self.results)
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(TestSuite::len).sum()
    }

    /// Keep only tests whose composite name satisfies `keep`. Suites left
    /// empty are dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> &mut Self
    where
        F: FnMut(&str) -> bool,
    {
        for suite in &mut self.suites {
            let suite_name = suite.name.clone();
            suite
                .tests
                .retain(|t| keep(&composite_name(&suite_name, &t.name)));
        }
        self.suites.retain(|s| !s.is_empty());
        self
    }

    /// Keep only tests whose composite name contains `pattern`.
    pub fn filter(&mut self, pattern: &str) -> &mut Self {
        self.retain(|name| name.contains(pattern))
    }
}

impl fmt::Debug for TestRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRunner")
            .field("suites", &self.suites)
            .field("results", &self.results)
            .field("listeners", &self.listeners.len())
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish()
    }
}

async fn run_test(suite: &TestSuite, test: &Test, timeout: Option<Duration>) -> TestResult {
    let name = composite_name(&suite.name, &test.name);
    debug!(test = %name, "running test");

    let start = Instant::now();
    let outcome = execute(suite, test, timeout).await;
    let duration = start.elapsed().as_secs_f64() * 1000.0;

    let error = outcome.err().map(|e| e.message());
    debug!(test = %name, passed = error.is_none(), duration_ms = duration, "test finished");

    TestResult {
        name,
        suite: suite.name.clone(),
        passed: error.is_none(),
        error,
        duration,
    }
}

async fn execute(suite: &TestSuite, test: &Test, timeout: Option<Duration>) -> Result<(), TestError> {
    let mut outcome = run_hooks(&suite.before_each);
    if outcome.is_ok() {
        outcome = match timeout {
            None => test.body.invoke().await,
            Some(limit) => match tokio::time::timeout(limit, test.body.invoke()).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(suite = %suite.name, test = %test.name, limit_ms = limit.as_millis() as u64, "test timed out");
                    Err(TestError::error(format!(
                        "Test timed out after {}ms",
                        limit.as_millis()
                    )))
                }
            },
        };
    }
    let cleanup = run_hooks(&suite.after_each);
    outcome.and(cleanup)
}

fn run_hooks(hooks: &[SyncFn]) -> Result<(), TestError> {
    hooks.iter().try_for_each(call_guarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::expect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_composite_names_and_order() {
        let mut runner = TestRunner::new();
        runner.describe("A", |s| {
            s.it("one", || Ok::<_, TestError>(()));
            s.it("two", || Ok::<_, TestError>(()));
        });
        runner.it("loose", || Ok::<_, TestError>(()));

        let names: Vec<_> = runner
            .run_tests_blocking()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["A: one", "A: two", "Standalone Tests: loose"]);
    }

    #[test]
    fn test_state_transitions() {
        let mut runner = TestRunner::new();
        assert_eq!(runner.state(), RunnerState::Idle);
        runner.describe("S", |s| {
            s.it("t", || Ok::<_, TestError>(()));
        });
        assert_eq!(runner.state(), RunnerState::Collecting);
        runner.run_tests_blocking().unwrap();
        assert_eq!(runner.state(), RunnerState::Idle);
        runner.describe("S2", |_| {});
        runner.clear();
        assert_eq!(runner.state(), RunnerState::Idle);
        assert_eq!(runner.test_count(), 0);
    }

    #[test]
    fn test_nested_describe_is_flattened() {
        let mut runner = TestRunner::new();
        runner.describe("Outer", |s| {
            s.describe("Inner", |inner| {
                inner.it("deep", || Ok::<_, TestError>(()));
            });
            s.it("shallow", || Ok::<_, TestError>(()));
        });

        let names: Vec<String> = runner.suites().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Outer > Inner", "Outer"]);
        let results = runner.run_tests_blocking().unwrap();
        assert_eq!(results[0].name, "Outer > Inner: deep");
        assert_eq!(results[1].name, "Outer: shallow");
    }

    #[test]
    fn test_result_and_summary_serialize_with_report_keys() {
        let results = vec![TestResult {
            name: "Math: adds".into(),
            suite: "Math".into(),
            passed: true,
            error: None,
            duration: 2.0,
        }];

        let result = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(result["duration_ms"], 2.0);
        assert_eq!(result["error"], serde_json::Value::Null);
        assert!(result.get("duration").is_none());

        let summary = serde_json::to_value(TestSummary::from_results(&results)).unwrap();
        let keys: Vec<&str> = summary
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["tests", "passed", "failed", "duration_ms", "pass_rate"]);
    }

    #[test]
    fn test_nested_describe_keeps_declaration_order() {
        let hook_runs = Arc::new(AtomicUsize::new(0));
        let mut runner = TestRunner::new();
        {
            let hits = hook_runs.clone();
            runner.describe("Outer", move |s| {
                s.before_each(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(())
                });
                s.it("first declared", || Ok::<_, TestError>(()));
                s.describe("Inner", |inner| {
                    inner.it("second declared", || Ok::<_, TestError>(()));
                });
                s.it("third declared", || Ok::<_, TestError>(()));
            });
        }

        let names: Vec<String> = runner
            .run_tests_blocking()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "Outer: first declared",
                "Outer > Inner: second declared",
                "Outer: third declared",
            ]
        );
        // the outer hook wraps both segments and the nested suite
        assert_eq!(hook_runs.load(Ordering::SeqCst), 3);
        assert_eq!(runner.suites().len(), 3);
    }

    #[test]
    fn test_hooks_wrap_each_test_in_order() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut runner = TestRunner::new();
        {
            let (b, a, t, ib) = (log.clone(), log.clone(), log.clone(), log.clone());
            runner.describe("S", move |s| {
                s.before_each(move || {
                    b.lock().unwrap().push("outer-before".into());
                    Ok::<_, TestError>(())
                });
                s.after_each(move || {
                    a.lock().unwrap().push("outer-after".into());
                    Ok::<_, TestError>(())
                });
                s.describe("N", move |n| {
                    n.before_each(move || {
                        ib.lock().unwrap().push("inner-before".into());
                        Ok::<_, TestError>(())
                    });
                    n.it("t", move || {
                        t.lock().unwrap().push("body".into());
                        Ok::<_, TestError>(())
                    });
                });
            });
        }
        runner.run_tests_blocking().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer-before", "inner-before", "body", "outer-after"]
        );
    }

    #[test]
    fn test_failing_before_each_skips_body_but_runs_after_each() {
        let body_runs = Arc::new(AtomicUsize::new(0));
        let after_runs = Arc::new(AtomicUsize::new(0));
        let mut runner = TestRunner::new();
        {
            let (body, after) = (body_runs.clone(), after_runs.clone());
            runner.describe("S", move |s| {
                s.before_each(|| Err(TestError::error("setup failed")));
                s.after_each(move || {
                    after.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(())
                });
                s.it("t", move || {
                    body.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(())
                });
            });
        }
        let results = runner.run_tests_blocking().unwrap();
        assert_eq!(results[0].error.as_deref(), Some("setup failed"));
        assert_eq!(body_runs.load(Ordering::SeqCst), 0);
        assert_eq!(after_runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_test_is_recorded_as_failure() {
        let mut runner = TestRunner::new();
        runner.describe("S", |s| {
            s.it("boom", || -> Result<(), TestError> { panic!("kaboom") });
            s.it("after", || expect(true).to_be_truthy());
        });
        let results = runner.run_tests_blocking().unwrap();
        assert_eq!(results[0].error.as_deref(), Some("kaboom"));
        assert!(results[1].passed);
    }

    #[test]
    fn test_filter_drops_empty_suites() {
        let mut runner = TestRunner::new();
        runner.describe("Math", |s| {
            s.it("adds", || Ok::<_, TestError>(()));
            s.it("subtracts", || Ok::<_, TestError>(()));
        });
        runner.describe("Strings", |s| {
            s.it("capitalizes", || Ok::<_, TestError>(()));
        });
        runner.filter("Math: add");
        assert_eq!(runner.suites().len(), 1);
        assert_eq!(runner.test_count(), 1);
    }

    #[test]
    fn test_summary_of_empty_results() {
        let summary = TestSummary::from_results(&[]);
        assert_eq!(
            summary,
            TestSummary {
                total: 0,
                passed: 0,
                failed: 0,
                duration: 0.0,
                pass_rate: 0.0
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_hanging_test() {
        let mut runner = TestRunner::new().with_timeout(Some(Duration::from_millis(50)));
        runner.describe("S", |s| {
            s.it_async("hangs", || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, TestError>(())
            });
            s.it_async("quick", || async { Ok::<_, TestError>(()) });
        });
        let results = runner.run_tests().await;
        assert_eq!(results[0].error.as_deref(), Some("Test timed out after 50ms"));
        assert!(results[1].passed);
    }
}
