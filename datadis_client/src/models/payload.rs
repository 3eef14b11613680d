//! Lenient field accessors over an untyped JSON object.
//!
//! Upstream is not strict about scalar types (numbers sometimes arrive as
//! strings and vice versa), so each accessor coerces where the intent is
//! unambiguous and otherwise reports the field as absent.

use serde_json::{Map, Value};

pub type Payload = Map<String, Value>;

/// String field. Numbers are rendered; `null` and other shapes are absent.
pub fn string(obj: &Payload, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String field defaulting to empty when absent.
pub fn string_or_empty(obj: &Payload, key: &str) -> String {
    string(obj, key).unwrap_or_default()
}

/// Numeric field. Numeric strings (including a decimal comma) are accepted.
pub fn number(obj: &Payload, key: &str) -> Option<f64> {
    value_as_f64(obj.get(key)?)
}

/// Integer field. Accepts integral numbers and integer strings.
pub fn integer(obj: &Payload, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Array of numbers. Non-numeric entries are skipped; a missing field is empty.
pub fn number_list(obj: &Payload, key: &str) -> Vec<f64> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_f64).collect(),
        _ => Vec::new(),
    }
}

/// Array of strings. Numbers are rendered; a missing field is empty.
pub fn string_list(obj: &Payload, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}
