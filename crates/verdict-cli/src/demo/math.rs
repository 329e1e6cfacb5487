//! Arithmetic helpers exercised by the unit suite

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Factorial of negative number")]
    NegativeFactorial,

    #[error("Factorial overflows u64")]
    Overflow,
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

pub fn divide(a: f64, b: f64) -> Result<f64, MathError> {
    if b == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn factorial(n: i64) -> Result<u64, MathError> {
    if n < 0 {
        return Err(MathError::NegativeFactorial);
    }
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k).ok_or(MathError::Overflow))
}
