//! Status coercion
//!
//! Remote APIs are not consistent about the JSON type of a status field.
//! Strings pass through unchanged, numbers and booleans use their canonical
//! JSON text (`42`, `1.5`, `true`). Null, arrays and objects are not statuses.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a scalar JSON value to its status string
pub fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `deserialize_with` helper for status fields
pub fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_to_string(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("status must be a string, number or boolean, got {}", value))
    })
}
