//! # Lenient Field Decoding
//!
//! Serde helpers for the permissive-input policy: carts and settings arrive
//! from browser state and admin forms, so numbers may be missing, `null`,
//! numeric strings or garbage. Every helper here decodes to a usable value
//! instead of rejecting the whole payload.
//!
//! Use with `#[serde(default, deserialize_with = "lenient::number")]`.

use crate::cart::CartLine;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a finite `f64`, or `None` when it has no numeric reading.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce a JSON value to an `i64`, truncating fractional numbers.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Coerce a JSON value to a boolean. Accepts `true`/`false`, `0`/`1` and their string forms.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Number that falls back to `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_f64).unwrap_or(0.0))
}

/// Number that stays `None` when absent or unreadable.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_f64))
}

/// Integer that falls back to `0`.
pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_i64).unwrap_or(0))
}

/// Integer that stays `None` when absent or unreadable.
pub fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_i64))
}

/// Boolean that stays `None` when absent or unreadable.
pub fn optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_bool))
}

/// Boolean defaulting to `true` (for flags such as `taxOnShipping`).
pub fn bool_default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_bool(deserializer)?.unwrap_or(true))
}

/// Opaque identifier: strings pass through, numbers are stringified.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Text that falls back to an empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Cart lines from any JSON value. Anything but an array is an empty cart;
/// entries that are not objects are skipped.
pub fn cart_lines_from_value(value: Value) -> Vec<CartLine> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Cart lines that never reject the payload; see [`cart_lines_from_value`].
pub fn cart_lines<'de, D>(deserializer: D) -> Result<Vec<CartLine>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(cart_lines_from_value).unwrap_or_default())
}
