//! Integration tests for the assertion engine

use pretty_assertions::assert_eq;
use regex::Regex;
use rstest::rstest;
use serde_json::json;
use verdict_runtime::prelude::*;

fn failure(result: verdict_runtime::AssertResult) -> String {
    match result {
        Ok(()) => panic!("expected the check to fail"),
        Err(err) => err.message().to_string(),
    }
}

// Equality

#[rstest]
#[case(Value::from(5), Value::from(5))]
#[case(Value::from("abc"), Value::from("abc"))]
#[case(Value::Null, Value::Null)]
#[case(Value::Undefined, Value::Undefined)]
#[case(Value::from(0.0), Value::from(-0.0))]
fn test_to_be_passes_for_equal_primitives(#[case] actual: Value, #[case] expected: Value) {
    assert!(expect(actual).to_be(expected).is_ok());
}

#[test]
fn test_to_be_nan_is_not_itself() {
    assert!(expect(f64::NAN).to_be(f64::NAN).is_err());
}

#[test]
fn test_to_be_reports_both_values() {
    assert_eq!(failure(expect("hello").to_be("world")), "Expected \"hello\" to be \"world\"");
}

#[test]
fn test_to_equal_structures() {
    assert!(expect(json!([1, [2, 3]])).to_equal(json!([1, [2, 3]])).is_ok());
    assert!(expect(json!({"a": 1, "b": {"c": [true]}}))
        .to_equal(json!({"b": {"c": [true]}, "a": 1}))
        .is_ok());
    assert!(expect(json!([1, 2])).to_equal(json!([1, 2, 3])).is_err());
    assert!(expect(json!({"a": 1})).to_equal(json!({"a": 1, "b": 2})).is_err());
}

#[test]
fn test_to_equal_ignores_class_tag() {
    let user = Class::new("User");
    let instance = Value::instance(&user, [("name", Value::from("Ann"))]);
    assert!(expect(instance).to_equal(json!({"name": "Ann"})).is_ok());
}

// Truthiness

#[rstest]
#[case(Value::from(0))]
#[case(Value::from(""))]
#[case(Value::from(false))]
#[case(Value::Null)]
#[case(Value::Undefined)]
#[case(Value::from(f64::NAN))]
fn test_falsy(#[case] v: Value) {
    assert!(expect(v.clone()).to_be_falsy().is_ok());
    assert!(expect(v).to_be_truthy().is_err());
}

#[test]
fn test_presence_checks() {
    assert!(expect(Value::Null).to_be_null().is_ok());
    assert!(expect(Value::Undefined).to_be_undefined().is_ok());
    assert!(expect(Value::Null).to_be_defined().is_ok());
    assert_eq!(failure(expect(Value::Undefined).to_be_defined()), "Expected value to be defined");
    assert_eq!(failure(expect(1).to_be_null()), "Expected 1 to be null");
}

// Collections and numbers

#[test]
fn test_to_contain() {
    assert!(expect(vec!["apple", "banana"]).to_contain("banana").is_ok());
    assert!(expect(vec![f64::NAN]).to_contain(f64::NAN).is_ok());
    assert!(expect("Hello World").to_contain("World").is_ok());
    assert_eq!(
        failure(expect("Hello").to_contain("xyz")),
        "Expected string \"Hello\" to contain \"xyz\""
    );
    assert_eq!(failure(expect(vec![1, 2]).to_contain(3)), "Expected array [1,2] to contain 3");
}

#[rstest]
#[case(Value::from(vec![1, 2, 3]), 3)]
#[case(Value::from("hello"), 5)]
#[case(Value::from(""), 0)]
#[case(Value::object([("length", Value::from(2))]), 2)]
fn test_to_have_length(#[case] v: Value, #[case] len: usize) {
    assert!(expect(v).to_have_length(len).is_ok());
}

#[test]
fn test_to_have_length_failures() {
    assert_eq!(failure(expect(vec![1]).to_have_length(2)), "Expected length 1 to be 2");
    assert_eq!(failure(expect(42).to_have_length(1)), "Expected 42 to have a length property");
}

#[test]
fn test_ordering_checks() {
    assert!(expect(10).to_be_greater_than(5).is_ok());
    assert!(expect(3).to_be_less_than(5).is_ok());
    assert!(expect(5).to_be_greater_than(5).is_err());
    assert!(expect(f64::NAN).to_be_less_than(1).is_err());
    assert_eq!(failure(expect("5").to_be_greater_than(1)), "Expected \"5\" to be a number");
}

// Errors

#[test]
fn test_to_throw_variants() {
    let divide_by_zero =
        thunk(|| -> Result<f64, TestError> { Err(TestError::error("Division by zero")) });

    assert!(expect(divide_by_zero.clone()).to_throw().is_ok());
    assert!(expect(divide_by_zero.clone()).to_throw_matching("Division by zero").is_ok());
    assert!(expect(divide_by_zero.clone())
        .to_throw_matching(Regex::new("zero$").unwrap())
        .is_ok());
    assert!(expect(divide_by_zero.clone()).to_throw_matching(Class::error()).is_ok());
    assert_eq!(
        failure(expect(divide_by_zero).to_throw_matching("Other")),
        "Expected error message \"Division by zero\" to be \"Other\""
    );
}

#[test]
fn test_to_throw_class_match_is_exact() {
    let raises_type_error =
        thunk(|| -> Result<(), TestError> { Err(TestError::error_of(&Class::type_error(), "bad")) });
    assert_eq!(
        failure(expect(raises_type_error).to_throw_matching(Class::error())),
        "Expected error type TypeError to be Error"
    );
}

#[test]
fn test_to_throw_when_nothing_is_raised() {
    let fine = thunk(|| Ok::<_, TestError>(1));
    assert_eq!(failure(expect(fine).to_throw()), "Expected function to throw an error");
    assert_eq!(failure(expect(3).to_throw()), "Expected 3 to be a function");
}

#[test]
fn test_to_throw_counts_panics() {
    let panics = thunk(|| -> Result<(), TestError> { panic!("overflow") });
    assert!(expect(panics).to_throw_matching("overflow").is_ok());
}

// Types and properties

#[test]
fn test_instance_of_follows_parent_chain() {
    let animal = Class::new("Animal");
    let dog = Class::extends("Dog", &animal);
    let rex = Value::instance(&dog, [("name", Value::from("Rex"))]);

    assert!(expect(rex.clone()).to_be_instance_of(&dog).is_ok());
    assert!(expect(rex.clone()).to_be_instance_of(&animal).is_ok());
    assert!(expect(rex).to_be_instance_of(&Class::object()).is_ok());
    assert!(expect(Value::error("x")).to_be_instance_of(&Class::error()).is_ok());
    assert!(expect(vec![1]).to_be_instance_of(&Class::array()).is_ok());
}

#[test]
fn test_property_checks() {
    let user = json!({"id": 1, "name": "John", "email": "john@example.com"});
    assert!(expect(user.clone()).to_have_property("email").is_ok());
    assert!(expect(user.clone()).to_have_property_value("name", "John").is_ok());
    assert_eq!(
        failure(expect(user.clone()).to_have_property("age")),
        "Expected object to have property \"age\""
    );
    assert_eq!(
        failure(expect(user).to_have_property_value("id", 2)),
        "Expected property \"id\" to have value 2, but got 1"
    );
    assert_eq!(failure(expect("str").to_have_property("length")), "Expected \"str\" to be an object");
}
