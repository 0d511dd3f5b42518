//! Bidirectional conversion between the generic attribute-value model and the
//! flag engine's native value model.
//!
//! Both directions are total: every value on one side has a representation on
//! the other, so neither function can fail. Composite values convert
//! recursively with no depth limit.
//!
//! The conversion is variant-preserving with two deliberate relaxations:
//!
//! - Timestamps are one-directional. [`to_flag_value`] renders a
//!   [`AttributeValue::Timestamp`] as an ISO-8601 UTC string (`Z` suffix,
//!   second-or-finer precision as supplied); there is no reconstruction on
//!   the way back, so round-tripping a timestamp yields a string.
//! - Structure/object key order is not preserved. Both models store fields in
//!   a hash map, so only key/value fidelity is guaranteed.

use chrono::SecondsFormat;

use crate::{AttributeValue, FlagValue};

/// Convert a generic attribute value into the engine's native representation.
pub fn to_flag_value(value: &AttributeValue) -> FlagValue {
    match value {
        AttributeValue::Null => FlagValue::Null,
        AttributeValue::Boolean(b) => FlagValue::Bool(*b),
        AttributeValue::Number(n) => FlagValue::Number(*n),
        AttributeValue::String(s) => FlagValue::String(s.clone()),
        AttributeValue::Timestamp(ts) => {
            FlagValue::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        AttributeValue::List(items) => FlagValue::Array(items.iter().map(to_flag_value).collect()),
        AttributeValue::Structure(fields) => FlagValue::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), to_flag_value(value)))
                .collect(),
        ),
    }
}

/// Convert an engine-native value back into the generic attribute-value
/// representation.
pub fn to_attribute_value(value: &FlagValue) -> AttributeValue {
    match value {
        FlagValue::Null => AttributeValue::Null,
        FlagValue::Bool(b) => AttributeValue::Boolean(*b),
        FlagValue::Number(n) => AttributeValue::Number(*n),
        FlagValue::String(s) => AttributeValue::String(s.clone()),
        FlagValue::Array(items) => {
            AttributeValue::List(items.iter().map(to_attribute_value).collect())
        }
        FlagValue::Object(fields) => AttributeValue::Structure(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}
