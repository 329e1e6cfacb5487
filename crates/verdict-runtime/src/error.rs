//! Errors raised inside test bodies
//!
//! Two kinds of failure can leave a test body:
//! - [`AssertionError`] from a failed `expect(..)` check
//! - any other raised value ([`TestError::Thrown`]), usually an `Error` value
//!   wrapping a domain error
//!
//! The runner records both the same way.

use crate::value::{Class, Value};
use std::any::Any;
use thiserror::Error;

/// A failed assertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure as an `AssertionError` error value.
    pub fn to_value(&self) -> Value {
        Value::error_of(&Class::assertion_error(), self.message.clone())
    }
}

/// Anything a test body, hook or mock implementation can raise.
#[derive(Error, Debug, Clone)]
pub enum TestError {
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    #[error("{}", thrown_message(.0))]
    Thrown(Value),
}

fn thrown_message(value: &Value) -> String {
    match value.as_error() {
        Some(err) => err.message().to_string(),
        None => value.to_display_string(),
    }
}

impl TestError {
    /// Raise an arbitrary value.
    pub fn thrown(value: impl Into<Value>) -> Self {
        TestError::Thrown(value.into())
    }

    /// Raise an `Error` with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        TestError::Thrown(Value::error(message))
    }

    /// Raise an error of a specific class.
    pub fn error_of(class: &Class, message: impl Into<String>) -> Self {
        TestError::Thrown(Value::error_of(class, message))
    }

    /// Wrap a Rust error as a raised `Error` value carrying its message.
    pub fn raise<E: std::error::Error>(err: E) -> Self {
        TestError::error(err.to_string())
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        TestError::error(panic_message(payload.as_ref()))
    }

    /// The message the runner records for this failure.
    pub fn message(&self) -> String {
        match self {
            TestError::Assertion(err) => err.message().to_string(),
            TestError::Thrown(value) => thrown_message(value),
        }
    }

    /// The raised value; assertion failures become `AssertionError` values.
    pub fn to_value(&self) -> Value {
        match self {
            TestError::Assertion(err) => err.to_value(),
            TestError::Thrown(value) => value.clone(),
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, TestError::Assertion(_))
    }
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}

/// `?`-friendly conversion of domain errors inside test bodies.
pub trait ResultExt<T> {
    /// Re-raise the error as a thrown `Error` value.
    fn or_raise(self) -> Result<T, TestError>;
}

impl<T, E: std::error::Error> ResultExt<T> for Result<T, E> {
    fn or_raise(self) -> Result<T, TestError> {
        self.map_err(TestError::raise)
    }
}
