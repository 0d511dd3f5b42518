use std::collections::HashMap;

use chrono::{DateTime, Utc};
use derive_more::From;
use serde::{Deserialize, Serialize};

/// Type alias for a HashMap representing the attributes of one evaluation
/// request.
///
/// Keys are strings representing attribute names.
///
/// # Examples
/// ```
/// # use flagbridge::{Attributes, AttributeValue};
/// let attributes = [
///     ("age".to_owned(), 30.0.into()),
///     ("is_premium_member".to_owned(), true.into()),
///     ("username".to_owned(), "john_doe".into()),
/// ].into_iter().collect::<Attributes>();
/// ```
pub type Attributes = HashMap<String, AttributeValue>;

/// Enum representing possible values of a context attribute.
///
/// Conveniently implements `From` conversions for `String`, `&str`, `f64`,
/// `bool`, `DateTime<Utc>`, `Vec<AttributeValue>`, and
/// `HashMap<String, AttributeValue>`.
///
/// Examples:
/// ```
/// # use flagbridge::AttributeValue;
/// let string_attr: AttributeValue = "example".into();
/// let number_attr: AttributeValue = 42.0.into();
/// let bool_attr: AttributeValue = true.into();
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, From, Clone)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A string value.
    String(String),
    /// A numerical value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// A point in time.
    ///
    /// Timestamps survive conversion to the engine's value model only as
    /// ISO-8601 strings. See [`crate::to_flag_value`].
    Timestamp(DateTime<Utc>),
    /// An ordered list of values.
    List(Vec<AttributeValue>),
    /// A mapping of attribute names to values. Key order is insignificant.
    Structure(HashMap<String, AttributeValue>),
    /// A null value or absence of value.
    Null,
}

impl AttributeValue {
    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        if let AttributeValue::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// The structure fields, if this is a structure.
    pub fn as_structure(&self) -> Option<&HashMap<String, AttributeValue>> {
        if let AttributeValue::Structure(fields) = self {
            Some(fields)
        } else {
            None
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
