//! Verdict Runtime - in-process testing toolkit
//!
//! This library provides:
//! - A dynamic [`Value`] model with strict and deep equality
//! - Chainable assertions via [`expect`]
//! - Recording, scriptable mock functions ([`Mock`])
//! - A sequential [`TestRunner`] with suites, async tests and result listeners

/// Verdict runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod expect;
pub mod mock;
pub mod promise;
pub mod runner;
pub mod value;

pub use error::{panic_message, AssertionError, ResultExt, TestError};
pub use expect::{expect, AssertResult, ErrorMatcher, Expectation};
pub use mock::{Mock, MockResult};
pub use promise::Promise;
pub use runner::{
    RunnerState, SuiteBuilder, Test, TestBody, TestResult, TestRunner, TestSuite, TestSummary,
    STANDALONE_SUITE,
};
pub use value::{format_number, thunk, Class, ErrorValue, Function, NativeFn, Object, Value};

/// Everything a test module usually needs.
pub mod prelude {
    pub use crate::{
        expect, thunk, AssertResult, Class, Mock, MockResult, Promise, ResultExt, SuiteBuilder,
        TestError, TestRunner, Value,
    };
}
