//! Value coercion to declared parameter types
//!
//! Models routinely quote numbers, stringify booleans, pass a lone value where
//! a list is expected, or JSON-encode nested structures into strings. Each of
//! those is repaired here; anything else is a type mismatch.

use crate::tool::entities::ParamType;
use serde_json::{Number, Value};

/// A value that satisfies its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    /// False when the raw value already had the declared type
    pub changed: bool,
}

impl Coerced {
    fn unchanged(value: &Value) -> Self {
        Self {
            value: value.clone(),
            changed: false,
        }
    }

    fn changed(value: Value) -> Self {
        Self {
            value,
            changed: true,
        }
    }
}

/// The raw value could not be brought to the declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: ParamType,
    pub found: &'static str,
}

/// JSON kind name of a value, for diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce `value` to `target`
pub fn coerce(value: &Value, target: ParamType) -> Result<Coerced, TypeMismatch> {
    let mismatch = || TypeMismatch {
        expected: target,
        found: value_kind(value),
    };

    match (target, value) {
        (ParamType::String, Value::String(_)) => Ok(Coerced::unchanged(value)),
        (ParamType::String, Value::Number(n)) => Ok(Coerced::changed(Value::String(n.to_string()))),
        (ParamType::String, Value::Bool(b)) => Ok(Coerced::changed(Value::String(b.to_string()))),

        (ParamType::Number, Value::Number(_)) => Ok(Coerced::unchanged(value)),
        (ParamType::Number, Value::String(s)) => parse_number(s).map(Coerced::changed).ok_or_else(mismatch),

        (ParamType::Integer, Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Ok(Coerced::unchanged(value))
            } else {
                n.as_f64()
                    .and_then(integral)
                    .map(Coerced::changed)
                    .ok_or_else(mismatch)
            }
        }
        (ParamType::Integer, Value::String(s)) => parse_integer(s).map(Coerced::changed).ok_or_else(mismatch),

        (ParamType::Boolean, Value::Bool(_)) => Ok(Coerced::unchanged(value)),
        (ParamType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Coerced::changed(Value::Bool(true))),
            "false" => Ok(Coerced::changed(Value::Bool(false))),
            _ => Err(mismatch()),
        },

        (ParamType::Array, Value::Array(_)) => Ok(Coerced::unchanged(value)),
        (ParamType::Array, Value::String(s)) => match parse_embedded(s) {
            Some(array @ Value::Array(_)) => Ok(Coerced::changed(array)),
            _ => Ok(Coerced::changed(Value::Array(vec![value.clone()]))),
        },
        (ParamType::Array, Value::Number(_) | Value::Bool(_)) => {
            Ok(Coerced::changed(Value::Array(vec![value.clone()])))
        }

        (ParamType::Object, Value::Object(_)) => Ok(Coerced::unchanged(value)),
        (ParamType::Object, Value::String(s)) => match parse_embedded(s) {
            Some(object @ Value::Object(_)) => Ok(Coerced::changed(object)),
            _ => Err(mismatch()),
        },

        _ => Err(mismatch()),
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    let f = s.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

fn parse_integer(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>().ok().and_then(integral)
}

fn integral(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

/// A JSON array or object that a model encoded into a string
fn parse_embedded(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}
