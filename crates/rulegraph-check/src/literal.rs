//! Type inference for constant literals.
//!
//! Precedence: `null` → ANY, booleans → BOOLEAN, numbers → NUMBER,
//! arrays → ARRAY, objects → JSON, strings → DATE when they match the
//! ISO-8601 profile `YYYY-MM-DDTHH:mm:ss[.fff](Z|±HH:mm)?` and name a real
//! instant, STRING otherwise.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use rulegraph_core::types::PortType;

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?(Z|[+-][0-9]{2}:[0-9]{2})?$")
        .expect("ISO-8601 pattern compiles")
});

/// Infers the port type of a literal value.
pub fn infer_literal_type(value: &Value) -> PortType {
    match value {
        Value::Null => PortType::Any,
        Value::Bool(_) => PortType::Boolean,
        Value::Number(_) => PortType::Number,
        Value::Array(_) => PortType::Array,
        Value::Object(_) => PortType::Json,
        Value::String(s) if is_iso_datetime(s) => PortType::Date,
        Value::String(_) => PortType::String,
    }
}

/// Returns `true` if `s` matches the accepted ISO-8601 profile and denotes a
/// valid calendar date and time (no February 30th, no hour 24).
///
/// A string without an offset is read as UTC.
pub fn is_iso_datetime(s: &str) -> bool {
    let Some(caps) = ISO_DATETIME.captures(s) else {
        return false;
    };
    let candidate = if caps.get(2).is_some() {
        s.to_string()
    } else {
        format!("{s}Z")
    };
    DateTime::parse_from_rfc3339(&candidate).is_ok()
}
