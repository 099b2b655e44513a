//! Closed view over a JSON value for type inference and parameter binding.

use serde_json::{Map, Number, Value};

/// A borrowed, exhaustively matchable view of one JSON value.
///
/// Integers are widened to `i128` so that both the signed and unsigned 64-bit
/// ranges that `serde_json` can produce are represented exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// JSON `null`, or a field absent from the record
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integral number
    Int(i128),
    /// Number with a fractional part or exponent
    Float(f64),
    /// String
    Text(&'a str),
    /// Nested array
    Array(&'a [Value]),
    /// Nested object
    Object(&'a Map<String, Value>),
}

impl<'a> FieldValue<'a> {
    /// Projects an optional field of a record; absent fields read as `Null`.
    pub fn project(value: Option<&'a Value>) -> Self {
        value.map(FieldValue::from).unwrap_or(FieldValue::Null)
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns `true` for arrays and objects.
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldValue::Array(_) | FieldValue::Object(_))
    }
}

fn classify_number(n: &Number) -> FieldValue<'static> {
    if let Some(i) = n.as_i64() {
        FieldValue::Int(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        FieldValue::Int(i128::from(u))
    } else {
        FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl<'a> From<&'a Value> for FieldValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => classify_number(n),
            Value::String(s) => FieldValue::Text(s.as_str()),
            Value::Array(items) => FieldValue::Array(items.as_slice()),
            Value::Object(map) => FieldValue::Object(map),
        }
    }
}
