//! Lenient amount deserialization.
//!
//! The backend sends amounts as JSON numbers, as plain strings (`"19.90"`)
//! and as pt-BR strings (`"1.234,56"`). These helpers accept all three.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::format::parse_decimal;

/// Read an amount out of an arbitrary JSON value.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        Value::String(s) => parse_decimal(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an amount, falling back to zero for missing or malformed values.
///
/// # Errors
///
/// Only fails if the input is not valid JSON for the deserializer.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value).unwrap_or(Decimal::ZERO))
}

/// Deserialize an optional amount; malformed values become `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON for the deserializer.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Deserialize an optional float from a number or a pt-BR string.
///
/// # Errors
///
/// Only fails if the input is not valid JSON for the deserializer.
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => crate::format::parse_percentage(&s),
        _ => None,
    })
}
