//! Lenient field decoding for exported marketplace records.
//!
//! Deal, payout and activity exports are loosely typed: numbers arrive as JSON
//! numbers or strings, optional objects may be `null` or the wrong shape, and
//! lists may contain `null` holes. The deserializers here never reject a
//! record; a field that cannot be read is treated as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::rounding::finite;

/// A scalar field that may be numeric or free text.
#[derive(Debug, Clone, PartialEq)]
pub enum Loose {
    Number(f64),
    Text(String),
}

impl Loose {
    /// Numeric reading of the value: numbers as-is, text parsed after trimming.
    /// Non-finite results are rejected.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => finite(*n),
            Loose::Text(s) => s.trim().parse::<f64>().ok().and_then(finite),
        }
    }

    /// Money-style reading: text is stripped of everything except digits and
    /// the decimal point (`"$12,500"` reads as 12500). Unreadable values are 0.
    pub fn money(&self) -> f64 {
        match self {
            Loose::Number(n) => finite(*n).unwrap_or(0.0),
            Loose::Text(s) => {
                let digits: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                if digits.is_empty() {
                    return 0.0;
                }
                digits.parse::<f64>().ok().and_then(finite).unwrap_or(0.0)
            }
        }
    }
}

impl From<f64> for Loose {
    fn from(value: f64) -> Self {
        Loose::Number(value)
    }
}

impl From<&str> for Loose {
    fn from(value: &str) -> Self {
        Loose::Text(value.to_string())
    }
}

/// Numeric reading of an optional loose field.
pub fn number(value: Option<&Loose>) -> Option<f64> {
    value.and_then(Loose::as_number)
}

pub fn loose<'de, D>(deserializer: D) -> Result<Option<Loose>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().map(Loose::Number),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Loose::Text(s)),
        _ => None,
    })
}

/// Text field; numbers are kept in their JSON spelling, blank strings are absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// Nested object; anything other than a readable object is absent.
pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
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

/// List of objects. A non-array is an empty list, `null` holes are dropped and
/// unreadable entries decode as `T::default()`.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
