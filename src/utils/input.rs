//! Numeric text input coercion

use serde_json::Value;

/// Read a minutes field. Anything that is not a whole number becomes 0, which
/// every list operation rejects.
pub fn parse_minutes(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

/// Same coercion for a JSON field that may hold text or a number
pub fn coerce_minutes(value: &Value) -> i32 {
    match value {
        Value::String(text) => parse_minutes(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0),
        _ => 0,
    }
}
