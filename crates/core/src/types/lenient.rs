//! Forgiving `serde` field decoders for backend records.
//!
//! The backend is a black box and its records are frequently partial: a
//! product snapshot inside an order may be missing, prices may arrive as
//! strings, a date may be a number. Every decoder here accepts any JSON value
//! and never fails; values of the wrong shape decode to an empty/absent
//! result. Use them with `#[serde(default, deserialize_with = "...")]`.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a string field. Numbers and booleans are stringified; anything else
/// is empty.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Decode an identifier newtype from a string or number.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::from(text_from_value(&value)))
}

/// Decode a monetary amount from a JSON number or numeric string.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Decode a non-negative whole quantity. Fractions are truncated; negative
/// or non-numeric values decode to zero.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let quantity = decimal_from_value(&value)
        .filter(|q| q.is_sign_positive())
        .and_then(|q| q.trunc().to_u32())
        .unwrap_or(0);
    Ok(quantity)
}

/// Decode a list of strings, dropping non-string entries.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Decode a nested object. Non-objects and objects that do not decode as `T`
/// become `None`.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Decode an optional array. A non-array becomes `None`; elements that do not
/// decode as `T` are dropped.
///
/// # Errors
///
/// Never fails on well-formed JSON.
pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(decode_items(items)))
}

/// Decode each element of an array, dropping the ones that fail.
#[must_use]
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() < total {
        tracing::warn!(
            dropped = total - decoded.len(),
            total,
            "dropped records that could not be decoded"
        );
    }
    decoded
}

/// Parse a decimal from a JSON value.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
