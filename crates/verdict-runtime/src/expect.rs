//! Assertion engine
//!
//! `expect(actual)` wraps a value; each check returns `Ok(())` or an
//! [`AssertionError`] describing the mismatch, so test bodies chain them with
//! `?`:
//!
//! ```
//! use verdict_runtime::{expect, TestError};
//!
//! fn body() -> Result<(), TestError> {
//!     expect(2 + 3).to_be(5)?;
//!     expect(vec![1, 2, 3]).to_contain(2)?;
//!     expect("hello world").to_contain("world")?;
//!     Ok(())
//! }
//! # body().unwrap();
//! ```
//!
//! ## Checks
//! - `to_be`: strict equality (identity for arrays/objects/functions/errors)
//! - `to_equal`: deep structural equality
//! - `to_be_truthy` / `to_be_falsy`
//! - `to_be_null` / `to_be_undefined` / `to_be_defined`
//! - `to_contain`: array membership or substring
//! - `to_have_length`
//! - `to_be_greater_than` / `to_be_less_than`
//! - `to_throw` / `to_throw_matching`: invoke a function, expect it to raise
//! - `to_be_instance_of`
//! - `to_have_property` / `to_have_property_value`

use crate::error::{AssertionError, TestError};
use crate::value::{format_number, Class, Value};
use regex::Regex;
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};

/// Outcome of a single check.
pub type AssertResult = Result<(), AssertionError>;

/// Wrap a value for assertions.
pub fn expect(actual: impl Into<Value>) -> Expectation {
    Expectation {
        actual: actual.into(),
    }
}

fn fail(message: impl Into<String>) -> AssertResult {
    Err(AssertionError::new(message))
}

/// What a raised error must satisfy in [`Expectation::to_throw_matching`].
#[derive(Debug, Clone)]
pub enum ErrorMatcher {
    /// The error message must equal this text exactly.
    Message(String),
    /// The error message must match this pattern.
    Pattern(Regex),
    /// The raised value must be of exactly this class.
    Class(Class),
}

impl From<&str> for ErrorMatcher {
    fn from(s: &str) -> Self {
        ErrorMatcher::Message(s.to_string())
    }
}

impl From<String> for ErrorMatcher {
    fn from(s: String) -> Self {
        ErrorMatcher::Message(s)
    }
}

impl From<Regex> for ErrorMatcher {
    fn from(re: Regex) -> Self {
        ErrorMatcher::Pattern(re)
    }
}

impl From<Class> for ErrorMatcher {
    fn from(class: Class) -> Self {
        ErrorMatcher::Class(class)
    }
}

impl From<&Class> for ErrorMatcher {
    fn from(class: &Class) -> Self {
        ErrorMatcher::Class(class.clone())
    }
}

/// A value under test.
#[derive(Debug, Clone)]
pub struct Expectation {
    actual: Value,
}

impl Expectation {
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    fn rendered(&self) -> String {
        self.actual.to_json_string()
    }

    // ========================================================================
    // Equality
    // ========================================================================

    /// Strict equality.
    pub fn to_be(&self, expected: impl Into<Value>) -> AssertResult {
        let expected = expected.into();
        if !self.actual.strict_equals(&expected) {
            return fail(format!(
                "Expected {} to be {}",
                self.rendered(),
                expected.to_json_string()
            ));
        }
        Ok(())
    }

    /// Deep equality.
    pub fn to_equal(&self, expected: impl Into<Value>) -> AssertResult {
        let expected = expected.into();
        if !self.actual.deep_equals(&expected) {
            return fail(format!(
                "Expected {} to equal {}",
                self.rendered(),
                expected.to_json_string()
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Truthiness and presence
    // ========================================================================

    pub fn to_be_truthy(&self) -> AssertResult {
        if !self.actual.is_truthy() {
            return fail(format!("Expected {} to be truthy", self.rendered()));
        }
        Ok(())
    }

    pub fn to_be_falsy(&self) -> AssertResult {
        if self.actual.is_truthy() {
            return fail(format!("Expected {} to be falsy", self.rendered()));
        }
        Ok(())
    }

    pub fn to_be_null(&self) -> AssertResult {
        if !self.actual.is_null() {
            return fail(format!("Expected {} to be null", self.rendered()));
        }
        Ok(())
    }

    pub fn to_be_undefined(&self) -> AssertResult {
        if !self.actual.is_undefined() {
            return fail(format!("Expected {} to be undefined", self.rendered()));
        }
        Ok(())
    }

    pub fn to_be_defined(&self) -> AssertResult {
        if self.actual.is_undefined() {
            return fail("Expected value to be defined");
        }
        Ok(())
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Array membership, or substring search on text.
    ///
    /// For a string, a non-string `expected` is converted to text first.
    pub fn to_contain(&self, expected: impl Into<Value>) -> AssertResult {
        let expected = expected.into();
        match &self.actual {
            Value::Array(items) => {
                if !items.iter().any(|item| item.same_value_zero(&expected)) {
                    return fail(format!(
                        "Expected array {} to contain {}",
                        self.rendered(),
                        expected.to_json_string()
                    ));
                }
                Ok(())
            }
            Value::String(text) => {
                let needle = expected.to_display_string();
                if !text.contains(needle.as_str()) {
                    return fail(format!(
                        "Expected string \"{}\" to contain \"{}\"",
                        text, needle
                    ));
                }
                Ok(())
            }
            _ => fail(format!(
                "Expected {} to be an array or string",
                self.rendered()
            )),
        }
    }

    pub fn to_have_length(&self, expected: usize) -> AssertResult {
        let Some(length) = self.actual.length() else {
            return fail(format!(
                "Expected {} to have a length property",
                self.rendered()
            ));
        };
        if length != expected as f64 {
            return fail(format!(
                "Expected length {} to be {}",
                format_number(length),
                expected
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn number(&self) -> Result<f64, AssertionError> {
        self.actual.as_number().ok_or_else(|| {
            AssertionError::new(format!("Expected {} to be a number", self.rendered()))
        })
    }

    pub fn to_be_greater_than(&self, expected: impl Into<f64>) -> AssertResult {
        let expected = expected.into();
        let actual = self.number()?;
        // NaN is unordered, so it never passes
        if actual.partial_cmp(&expected) != Some(Ordering::Greater) {
            return fail(format!(
                "Expected {} to be greater than {}",
                format_number(actual),
                format_number(expected)
            ));
        }
        Ok(())
    }

    pub fn to_be_less_than(&self, expected: impl Into<f64>) -> AssertResult {
        let expected = expected.into();
        let actual = self.number()?;
        if actual.partial_cmp(&expected) != Some(Ordering::Less) {
            return fail(format!(
                "Expected {} to be less than {}",
                format_number(actual),
                format_number(expected)
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Invoke the function with no arguments; pass if it raises.
    ///
    /// A returned `Err` and a panic both count as raising.
    pub fn to_throw(&self) -> AssertResult {
        self.invoke_expecting_error().map(|_| ())
    }

    /// Like [`to_throw`](Self::to_throw), and the raised error must satisfy
    /// `matcher`.
    pub fn to_throw_matching(&self, matcher: impl Into<ErrorMatcher>) -> AssertResult {
        let raised = self.invoke_expecting_error()?;
        match matcher.into() {
            ErrorMatcher::Message(expected) => {
                let message = raised.message();
                if message != expected {
                    return fail(format!(
                        "Expected error message \"{}\" to be \"{}\"",
                        message, expected
                    ));
                }
            }
            ErrorMatcher::Pattern(re) => {
                let message = raised.message();
                if !re.is_match(&message) {
                    return fail(format!(
                        "Expected error message \"{}\" to match /{}/",
                        message,
                        re.as_str()
                    ));
                }
            }
            ErrorMatcher::Class(expected) => {
                let value = raised.to_value();
                if value.class().as_ref() != Some(&expected) {
                    return fail(format!(
                        "Expected error type {} to be {}",
                        value.constructor_name(),
                        expected.name()
                    ));
                }
            }
        }
        Ok(())
    }

    fn invoke_expecting_error(&self) -> Result<TestError, AssertionError> {
        let Value::Function(func) = &self.actual else {
            return Err(AssertionError::new(format!(
                "Expected {} to be a function",
                self.rendered()
            )));
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| func.call(&[])));
        match outcome {
            Ok(Ok(_)) => Err(AssertionError::new("Expected function to throw an error")),
            Ok(Err(raised)) => Ok(raised),
            Err(payload) => Ok(TestError::from_panic(payload)),
        }
    }

    // ========================================================================
    // Types and properties
    // ========================================================================

    pub fn to_be_instance_of(&self, class: &Class) -> AssertResult {
        if !self.actual.is_instance_of(class) {
            return fail(format!(
                "Expected {} to be an instance of {}",
                self.rendered(),
                class.name()
            ));
        }
        Ok(())
    }

    /// The value must be object-like and carry `property`.
    pub fn to_have_property(&self, property: &str) -> AssertResult {
        self.property(property).map(|_| ())
    }

    /// The property must also be strictly equal to `value`.
    pub fn to_have_property_value(
        &self,
        property: &str,
        value: impl Into<Value>,
    ) -> AssertResult {
        let expected = value.into();
        let actual = self.property(property)?;
        if !actual.strict_equals(&expected) {
            return fail(format!(
                "Expected property \"{}\" to have value {}, but got {}",
                property,
                expected.to_json_string(),
                actual.to_json_string()
            ));
        }
        Ok(())
    }

    fn property(&self, property: &str) -> Result<Value, AssertionError> {
        if !self.actual.is_object_like() {
            return Err(AssertionError::new(format!(
                "Expected {} to be an object",
                self.rendered()
            )));
        }
        self.actual.get(property).ok_or_else(|| {
            AssertionError::new(format!(
                "Expected object to have property \"{}\"",
                property
            ))
        })
    }
}
