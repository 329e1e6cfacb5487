//! Mock functions
//!
//! A [`Mock<A, R>`] is a callable stand-in that records every invocation and
//! can be scripted:
//!
//! - `mock_return_value(v)`: every later call returns `v`
//! - `mock_return_value_once(v)`: the next call returns `v` (FIFO queue)
//! - `mock_implementation(f)` / `mock_implementation_once(f)`: custom bodies
//! - `mock_resolved_value(v)` / `mock_rejected_value(e)`: on `Mock<A, Promise<T>>`
//! - `mock_clear()`: forget recorded calls
//! - `mock_reset()`: forget calls and scripting, restore the original body
//!
//! `A` is the argument tuple and `R` the return type; both are recorded per call.
//! A `Mock` is a handle: clones share one call log and one script.
//!
//! ```
//! use verdict_runtime::Mock;
//!
//! let greet: Mock<(String,), String> = Mock::new();
//! greet.mock_return_value_once("first".to_string())
//!      .mock_return_value("default".to_string());
//!
//! assert_eq!(greet.call(("a".into(),)).unwrap(), "first");
//! assert_eq!(greet.call(("b".into(),)).unwrap(), "default");
//! assert_eq!(greet.call_count(), 2);
//! ```

use crate::error::{panic_message, TestError};
use crate::promise::Promise;
use crate::value::{Function, Value};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Behavior<A, R> = Arc<dyn Fn(&A) -> Result<R, TestError> + Send + Sync>;

/// Outcome of one recorded call.
#[derive(Debug, Clone)]
pub enum MockResult<R> {
    /// The call returned normally.
    Return(R),
    /// The call raised an error, which was passed on to the caller.
    Throw(TestError),
    /// The call is still executing (only visible from inside a re-entrant call).
    Incomplete,
}

impl<R> MockResult<R> {
    pub fn is_return(&self) -> bool {
        matches!(self, MockResult::Return(_))
    }

    pub fn is_throw(&self) -> bool {
        matches!(self, MockResult::Throw(_))
    }

    pub fn returned(&self) -> Option<&R> {
        match self {
            MockResult::Return(r) => Some(r),
            _ => None,
        }
    }
}

struct MockState<A, R> {
    name: String,
    calls: Vec<A>,
    results: Vec<MockResult<R>>,
    original: Behavior<A, R>,
    current: Behavior<A, R>,
    once: VecDeque<Behavior<A, R>>,
    // bumped by clear/reset so in-flight calls don't write into a fresh log
    generation: u64,
}

impl<A, R> MockState<A, R> {
    fn clear_records(&mut self) {
        self.calls.clear();
        self.results.clear();
        self.generation += 1;
    }
}

/// A recording, scriptable function with arguments `A` and result `R`.
pub struct Mock<A, R> {
    state: Arc<Mutex<MockState<A, R>>>,
}

impl<A, R> Clone for Mock<A, R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<A, R> Mock<A, R>
where
    A: 'static,
    R: 'static,
{
    /// A mock whose calls return `R::default()` (undefined, for `Value`).
    pub fn new() -> Self
    where
        R: Default,
    {
        Self::from_behavior(Arc::new(|_: &A| Ok(R::default())))
    }

    /// A mock that runs `f` on each call until re-scripted.
    pub fn with_implementation<F>(f: F) -> Self
    where
        F: Fn(&A) -> Result<R, TestError> + Send + Sync + 'static,
    {
        Self::from_behavior(Arc::new(f))
    }

    fn from_behavior(behavior: Behavior<A, R>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                name: "mock".to_string(),
                calls: Vec::new(),
                results: Vec::new(),
                original: behavior.clone(),
                current: behavior,
                once: VecDeque::new(),
                generation: 0,
            })),
        }
    }

    /// Name used in reports and in `as_function`.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.lock().name = name.into();
        self
    }

    pub fn mock_name(&self) -> String {
        self.lock().name.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState<A, R>> {
        // a panicking test body can poison the lock; the state is still sound
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    /// Invoke the mock.
    ///
    /// The arguments are recorded before the scripted behavior runs; the
    /// outcome is recorded at the same index afterwards. Errors are returned
    /// to the caller after being recorded. A panicking behavior is recorded
    /// as a throw and the panic continues to the caller.
    pub fn call(&self, args: A) -> Result<R, TestError>
    where
        A: Clone,
        R: Clone,
    {
        let (index, generation, behavior) = {
            let mut state = self.lock();
            state.calls.push(args.clone());
            state.results.push(MockResult::Incomplete);
            let behavior = match state.once.pop_front() {
                Some(once) => once,
                None => state.current.clone(),
            };
            (state.results.len() - 1, state.generation, behavior)
        };

        // the lock is released so the behavior may call back into this mock
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| behavior(&args))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                {
                    let mut state = self.lock();
                    if state.generation == generation {
                        if let Some(slot) = state.results.get_mut(index) {
                            *slot = MockResult::Throw(TestError::error(panic_message(
                                payload.as_ref(),
                            )));
                        }
                    }
                }
                panic::resume_unwind(payload);
            }
        };

        let mut state = self.lock();
        if state.generation == generation {
            if let Some(slot) = state.results.get_mut(index) {
                *slot = match &outcome {
                    Ok(value) => MockResult::Return(value.clone()),
                    Err(err) => MockResult::Throw(err.clone()),
                };
            }
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------------

    /// Every call not covered by a pending once-behavior returns `value`.
    pub fn mock_return_value(&self, value: R) -> &Self
    where
        R: Clone + Send + Sync,
    {
        self.lock().current = Arc::new(move |_| Ok(value.clone()));
        self
    }

    /// The next call returns `value`; queued behind earlier once-behaviors.
    pub fn mock_return_value_once(&self, value: R) -> &Self
    where
        R: Clone + Send + Sync,
    {
        self.lock()
            .once
            .push_back(Arc::new(move |_| Ok(value.clone())));
        self
    }

    /// Replace the default behavior.
    pub fn mock_implementation<F>(&self, f: F) -> &Self
    where
        F: Fn(&A) -> Result<R, TestError> + Send + Sync + 'static,
    {
        self.lock().current = Arc::new(f);
        self
    }

    /// Queue a behavior for a single call.
    pub fn mock_implementation_once<F>(&self, f: F) -> &Self
    where
        F: Fn(&A) -> Result<R, TestError> + Send + Sync + 'static,
    {
        self.lock().once.push_back(Arc::new(f));
        self
    }

    /// Forget recorded calls and results; scripting stays in place.
    pub fn mock_clear(&self) -> &Self {
        self.lock().clear_records();
        self
    }

    /// Forget calls, results and scripting; restore the constructed behavior.
    pub fn mock_reset(&self) -> &Self {
        let mut state = self.lock();
        state.clear_records();
        state.once.clear();
        state.current = state.original.clone();
        drop(state);
        self
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Arguments of every call, in call order.
    pub fn calls(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.lock().calls.clone()
    }

    /// Outcome of every call, index-aligned with [`calls`](Self::calls).
    pub fn results(&self) -> Vec<MockResult<R>>
    where
        R: Clone,
    {
        self.lock().results.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn nth_call(&self, index: usize) -> Option<A>
    where
        A: Clone,
    {
        self.lock().calls.get(index).cloned()
    }

    pub fn last_call(&self) -> Option<A>
    where
        A: Clone,
    {
        self.lock().calls.last().cloned()
    }
}

impl<A, R> Default for Mock<A, R>
where
    A: 'static,
    R: Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> fmt::Debug for Mock<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Mock")
            .field("name", &state.name)
            .field("calls", &state.calls.len())
            .field("queued_once", &state.once.len())
            .finish()
    }
}

// ============================================================================
// Asynchronous scripting
// ============================================================================

impl<A, T> Mock<A, Promise<T>>
where
    A: 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Every call returns a promise that resolves with `value`.
    pub fn mock_resolved_value(&self, value: T) -> &Self {
        self.mock_implementation(move |_| Ok(Promise::resolved(value.clone())))
    }

    /// The next call returns a promise that resolves with `value`.
    pub fn mock_resolved_value_once(&self, value: T) -> &Self {
        self.mock_implementation_once(move |_| Ok(Promise::resolved(value.clone())))
    }

    /// Every call returns a promise that rejects with `error`.
    pub fn mock_rejected_value(&self, error: impl Into<TestError>) -> &Self {
        let error = error.into();
        self.mock_implementation(move |_| Ok(Promise::rejected(error.clone())))
    }

    /// The next call returns a promise that rejects with `error`.
    pub fn mock_rejected_value_once(&self, error: impl Into<TestError>) -> &Self {
        let error = error.into();
        self.mock_implementation_once(move |_| Ok(Promise::rejected(error.clone())))
    }
}

// ============================================================================
// Dynamic adapter
// ============================================================================

impl<R> Mock<Vec<Value>, R>
where
    R: Clone + Into<Value> + Send + 'static,
{
    /// Expose this mock as a [`Value::Function`] so it can be passed where
    /// dynamic callables are expected. Calls go through the mock's log.
    pub fn as_function(&self) -> Value {
        let mock = self.clone();
        let name = self.mock_name();
        Value::Function(Function::new(name, move |args: &[Value]| {
            mock.call(args.to_vec()).map(Into::into)
        }))
    }
}
