use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// The flag engine's native value representation.
///
/// This is the value model the evaluation engine understands: it is what
/// custom context attributes are converted into, and what object/array flag
/// evaluations come back as. Conversion to and from [`AttributeValue`] is
/// handled by [`crate::to_flag_value`] and [`crate::to_attribute_value`].
///
/// [`AttributeValue`]: crate::AttributeValue
#[derive(Debug, Serialize, Deserialize, PartialEq, From, Clone)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean value.
    Bool(bool),
    /// A numerical value, stored as double precision.
    Number(f64),
    /// A string value.
    String(String),
    /// An ordered array of values.
    Array(Vec<FlagValue>),
    /// A keyed object of values. Key order is insignificant.
    Object(HashMap<String, FlagValue>),
    /// A null value or absence of value.
    Null,
}

impl FlagValue {
    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FlagValue::Null)
    }

    /// The boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlagValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<serde_json::Value> for FlagValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FlagValue::Null,
            serde_json::Value::Bool(b) => FlagValue::Bool(b),
            serde_json::Value::Number(n) => FlagValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FlagValue::String(s),
            serde_json::Value::Array(items) => {
                FlagValue::Array(items.into_iter().map(FlagValue::from).collect())
            }
            serde_json::Value::Object(fields) => FlagValue::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, FlagValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<FlagValue> for serde_json::Value {
    fn from(value: FlagValue) -> Self {
        match value {
            FlagValue::Null => serde_json::Value::Null,
            FlagValue::Bool(b) => serde_json::Value::Bool(b),
            FlagValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FlagValue::String(s) => serde_json::Value::String(s),
            FlagValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            FlagValue::Object(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}
