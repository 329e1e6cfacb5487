//! Runtime values inspected by assertions
//!
//! Test bodies produce ordinary Rust data, but the assertion engine has to
//! answer dynamic questions about it ("is this a sequence?", "does it have a
//! length?", "can it be invoked?"). [`Value`] is the common currency: a small
//! dynamic value model with reference semantics for compound values.
//!
//! # Identity
//!
//! Arrays, objects, functions and errors live behind an `Arc`. Cloning a
//! `Value` shares the allocation, so two clones are *identical* (`to_be`
//! passes) while two separately built but equal structures are only *deeply
//! equal* (`to_equal` passes, `to_be` fails).
//!
//! Values are immutable once built, so a value graph can never contain a
//! cycle and the recursive comparisons below always terminate.

use crate::error::TestError;
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

// ============================================================================
// Classes
// ============================================================================

/// A named runtime type with an optional parent.
///
/// Classes compare by identity: two classes declared with the same name are
/// still different classes.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

struct ClassInner {
    name: String,
    parent: Option<Class>,
}

macro_rules! builtin_class {
    ($(#[$doc:meta])* $fn_name:ident, $name:literal, $parent:expr) => {
        $(#[$doc])*
        pub fn $fn_name() -> Class {
            static CLASS: OnceLock<Class> = OnceLock::new();
            CLASS.get_or_init(|| Class::with_parent($name, $parent)).clone()
        }
    };
}

impl Class {
    /// Declare a new root class (its only ancestor is `Object`).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parent(name, Some(Class::object()))
    }

    /// Declare a subclass of `parent`.
    pub fn extends(name: impl Into<String>, parent: &Class) -> Self {
        Self::with_parent(name, Some(parent.clone()))
    }

    fn with_parent(name: impl Into<String>, parent: Option<Class>) -> Self {
        Class(Arc::new(ClassInner {
            name: name.into(),
            parent,
        }))
    }

    builtin_class!(
        /// The root of every class hierarchy.
        object, "Object", None
    );
    builtin_class!(array, "Array", Some(Class::object()));
    builtin_class!(function, "Function", Some(Class::object()));
    builtin_class!(error, "Error", Some(Class::object()));
    builtin_class!(type_error, "TypeError", Some(Class::error()));
    builtin_class!(range_error, "RangeError", Some(Class::error()));
    builtin_class!(
        /// Class of every failure raised by the assertion engine.
        assertion_error, "AssertionError", Some(Class::error())
    );

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// True if `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Compound payloads
// ============================================================================

/// Insertion-ordered property bag tagged with a class.
#[derive(Clone)]
pub struct Object {
    class: Class,
    fields: IndexMap<String, Value>,
}

impl Object {
    pub fn new(class: Class, fields: IndexMap<String, Value>) -> Self {
        Self { class, fields }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Signature of a native callable.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, TestError> + Send + Sync>;

/// A named callable value.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: NativeFn,
}

impl Function {
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, TestError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, TestError> {
        (self.call)(args)
    }

    fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

/// An error value: a class plus a message.
#[derive(Clone, PartialEq)]
pub struct ErrorValue {
    class: Class,
    message: String,
}

impl ErrorValue {
    pub fn new(class: Class, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.class.name(), self.message)
    }
}

// ============================================================================
// Value
// ============================================================================

/// A dynamic runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value (what a call without a result produces)
    #[default]
    Undefined,
    /// Explicit null
    Null,
    Bool(bool),
    /// IEEE 754 double-precision number
    Number(f64),
    /// Immutable text
    String(Arc<str>),
    /// Ordered sequence, shared by reference
    Array(Arc<Vec<Value>>),
    /// Property bag, shared by reference
    Object(Arc<Object>),
    /// Invocable value
    Function(Function),
    /// Error value, shared by reference
    Error(Arc<ErrorValue>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    /// Build a plain `Object` from key/value pairs (order is kept).
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::instance(&Class::object(), fields)
    }

    /// Build an instance of `class` from key/value pairs.
    pub fn instance<K, I>(class: &Class, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(Arc::new(Object::new(class.clone(), fields)))
    }

    pub fn function<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, TestError> + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, f))
    }

    /// An `Error` with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_of(&Class::error(), message)
    }

    /// An error of a specific class.
    pub fn error_of(class: &Class, message: impl Into<String>) -> Self {
        Value::Error(Arc::new(ErrorValue::new(class.clone(), message)))
    }

    /// Short lowercase name of the value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    /// Truthiness predicate.
    ///
    /// The falsy values are exactly `false`, `0`, `-0`, `NaN`, `""`, `null`
    /// and `undefined`. Everything else, including empty arrays and empty
    /// objects, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Error(_) => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Class of a reference value; primitives have none.
    pub fn class(&self) -> Option<Class> {
        match self {
            Value::Array(_) => Some(Class::array()),
            Value::Object(obj) => Some(obj.class().clone()),
            Value::Function(_) => Some(Class::function()),
            Value::Error(err) => Some(err.class().clone()),
            _ => None,
        }
    }

    /// Direct or inherited instance check. Primitives are never instances.
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class().is_some_and(|own| own.is_subclass_of(class))
    }

    /// Name of the value's constructor, for error-type messages.
    pub fn constructor_name(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Number(_) => "Number".to_string(),
            Value::String(_) => "String".to_string(),
            other => other
                .class()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Length of a length-bearing value.
    ///
    /// Arrays report their element count, strings their UTF-16 length, and
    /// objects a numeric `length` property if they carry one.
    pub fn length(&self) -> Option<f64> {
        match self {
            Value::Array(items) => Some(items.len() as f64),
            Value::String(s) => Some(s.encode_utf16().count() as f64),
            Value::Object(obj) => obj.get("length").and_then(Value::as_number),
            _ => None,
        }
    }

    /// True for values that carry properties (objects, arrays, errors).
    pub fn is_object_like(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Error(_))
    }

    /// Look up a property on an object-like value.
    pub fn get(&self, property: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.get(property).cloned(),
            Value::Array(items) => {
                if property == "length" {
                    return Some(Value::Number(items.len() as f64));
                }
                property
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned())
            }
            Value::Error(err) => match property {
                "message" => Some(Value::string(err.message())),
                "name" => Some(Value::string(err.class().name())),
                _ => None,
            },
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------------

    /// Strict equality: primitives by value, reference values by identity.
    ///
    /// `NaN` is not strictly equal to itself; `0` and `-0` are equal.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Strict equality except that `NaN` equals `NaN` (membership tests).
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Structural equality.
    ///
    /// Arrays must have the same length and pairwise deep-equal elements.
    /// Objects must have the same key set and deep-equal values; the class
    /// tag is ignored. Errors are equal when class and message match.
    /// Everything else falls back to [`Value::strict_equals`].
    pub fn deep_equals(&self, other: &Value) -> bool {
        if self.strict_equals(other) {
            return true;
        }
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_equals(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.fields().iter().all(|(key, x)| match b.get(key) {
                        Some(y) => x.deep_equals(y),
                        None => false,
                    })
            }
            (Value::Error(a), Value::Error(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// JSON-style rendering used in assertion messages.
    ///
    /// Top-level `undefined` renders as `undefined` and functions as
    /// `[Function: name]`. Inside arrays both render as `null`; inside objects
    /// the property is omitted. Non-finite numbers render as `null`.
    pub fn to_json_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Function(f) => format!("[Function: {}]", f.name()),
            other => {
                let mut out = String::new();
                write_json(other, &mut out);
                out
            }
        }
    }

    /// Plain-text conversion (strings are not quoted).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_display_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(f) => format!("[Function: {}]", f.name()),
            Value::Error(err) => {
                if err.message().is_empty() {
                    err.class().name().to_string()
                } else {
                    format!("{}: {}", err.class().name(), err.message())
                }
            }
        }
    }
}

fn write_json(value: &Value, out: &mut String) {
    match value {
        Value::Undefined | Value::Function(_) | Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) if n.is_finite() => out.push_str(&format_number(*n)),
        Value::Number(_) => out.push_str("null"),
        Value::String(s) => write_json_str(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(item, out);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            out.push('{');
            let mut first = true;
            for (key, field) in obj.fields() {
                if matches!(field, Value::Undefined | Value::Function(_)) {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                write_json_str(key, out);
                out.push(':');
                write_json(field, out);
            }
            out.push('}');
        }
        Value::Error(err) => {
            out.push_str("{\"name\":");
            write_json_str(err.class().name(), out);
            out.push_str(",\"message\":");
            write_json_str(err.message(), out);
            out.push('}');
        }
    }
}

fn write_json_str(s: &str, out: &mut String) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
    }
}

/// Format a number the way a browser console would (`5`, `3.5`, `1e+21`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Error(err) => write!(f, "{:?}", err),
            other => f.write_str(&other.to_json_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Deep equality, so `assert_eq!` on values compares structure.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_equals(other)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::string(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items.into_iter().map(Into::into))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(Arc::new(err))
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(Arc::new(obj))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// Build a zero-argument [`Value::Function`] from a closure, for `to_throw`.
///
/// ```
/// use verdict_runtime::{expect, thunk, TestError};
///
/// let boom = thunk(|| -> Result<(), TestError> { Err(TestError::error("boom")) });
/// assert!(expect(boom).to_throw_matching("boom").is_ok());
/// ```
pub fn thunk<F, T, E>(f: F) -> Value
where
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    T: Into<Value> + 'static,
    E: Into<TestError> + 'static,
{
    Value::function("anonymous", move |_| f().map(Into::into).map_err(Into::into))
}
