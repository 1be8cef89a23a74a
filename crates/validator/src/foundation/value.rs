//! Helpers over `serde_json::Value` used by the built-in rules.

use serde_json::Value;

/// Returns true when the value counts as present.
///
/// `null`, `false`, `0`, the empty string and the empty array are falsy.
/// Objects are always truthy, even when empty.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::foundation::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("x")));
/// assert!(is_truthy(&json!({})));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!([])));
/// ```
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// The magnitude a size rule compares against its limits.
///
/// Numbers are measured by value, strings by Unicode scalar count and arrays
/// by element count. Other kinds have no size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    /// Numeric value.
    Number(f64),
    /// Character count of a string.
    Chars(usize),
    /// Element count of an array.
    Items(usize),
}

impl Size {
    /// Measures a value, returning `None` for kinds without a size.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Size::Number),
            Value::String(s) => Some(Size::Chars(s.chars().count())),
            Value::Array(items) => Some(Size::Items(items.len())),
            _ => None,
        }
    }

    /// Returns the measurement as a float for comparison.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Size::Number(n) => n,
            Size::Chars(n) | Size::Items(n) => n as f64,
        }
    }
}

/// Short name of a value's kind, used in log output.
#[must_use]
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
