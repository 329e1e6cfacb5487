//! Collection helpers exercised by the unit suite

use thiserror::Error;
use verdict_runtime::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("Array is empty")]
    Empty,

    #[error("Chunk size must be greater than 0")]
    ZeroChunkSize,
}

/// Drop repeated elements, keeping first occurrences in order.
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Flatten arbitrarily nested arrays. Non-array input is returned as a
/// one-element array.
pub fn flatten(value: &Value) -> Value {
    fn walk(value: &Value, out: &mut Vec<Value>) {
        match value.as_array() {
            Some(items) => items.iter().for_each(|item| walk(item, out)),
            None => out.push(value.clone()),
        }
    }

    let mut out = Vec::new();
    walk(value, &mut out);
    Value::array(out)
}

pub fn chunk<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>, ArrayError> {
    if size == 0 {
        return Err(ArrayError::ZeroChunkSize);
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

pub fn find_max(items: &[f64]) -> Result<f64, ArrayError> {
    items
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(ArrayError::Empty)
}
