//! Lenient coercion of loosely-typed JSON fields.
//!
//! Clients send counts as numbers or numeric strings and may use either the
//! plain key or its `*Raw` alias. None of these helpers fail: anything that
//! cannot be interpreted becomes the safe default.

use serde_json::{Map, Value};

/// Return the first key whose value is present and not `null`.
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Coerce a JSON value to a non-negative, finite count.
///
/// Numbers are taken as-is, strings go through [`parse_numeric`], booleans
/// map to 1/0. A single-element array coerces like its element; any other
/// array, object or `null` is 0, as is any negative or non-finite result.
pub fn to_count(value: &Value) -> f64 {
    let n = numeric_value(value).unwrap_or(0.0);

    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            // Booleans and objects inside arrays are not numeric
            [Value::Bool(_) | Value::Object(_)] => None,
            [item] => numeric_value(item),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Parse a numeric string.
///
/// Surrounding whitespace is ignored and an empty string is 0. Accepts decimal
/// literals (`"1200"`, `"1.5e3"`) and unsigned integer literals with a `0x`,
/// `0o` or `0b` prefix.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return s.parse().ok(),
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Coerce a count field with alias fallback. Missing or `null` → 0.
pub fn count_field(obj: &Map<String, Value>, keys: &[&str]) -> f64 {
    first_present(obj, keys).map(to_count).unwrap_or(0.0)
}

/// Render a value as an identifier if it is "truthy".
///
/// Non-empty strings and non-zero numbers qualify; everything else does not,
/// so the caller can fall through to the next alias.
pub fn truthy_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias holding a truthy identifier, or `""`.
pub fn id_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(truthy_id)
        .unwrap_or_default()
}

/// First alias holding a non-empty string.
pub fn non_empty_string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}
