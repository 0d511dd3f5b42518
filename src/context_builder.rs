//! Construction of engine-native evaluation contexts from generic evaluation
//! attributes.
//!
//! Construction never fails: malformed input degrades the resulting context
//! and is reported through the `log` facade, so a bad context downgrades an
//! evaluation instead of aborting it. The engine's own validation is the
//! final authority on whether the degraded context is usable.

use crate::convert::to_flag_value;
use crate::context::{Context, SingleContext, DEFAULT_KIND, MULTI_KIND};
use crate::{AttributeValue, Attributes};

/// Build an engine-native context from the attributes of one evaluation
/// request.
///
/// An empty `targeting_key` means "not supplied".
///
/// The `"kind"` attribute selects between a single context (any string other
/// than `"multi"`; default `"user"`) and a multi-context (`"multi"`, where
/// every other top-level attribute is one sub-context keyed by its name as
/// the kind). `"key"`/`"targetingKey"` resolve the context key, and
/// `"name"`, `"anonymous"` and `"privateAttributes"` map to the built-in
/// context fields; everything else becomes a custom attribute.
pub fn build_context(attributes: &Attributes, targeting_key: &str) -> Context {
    let mut kind = DEFAULT_KIND;
    match attributes.get("kind") {
        Some(AttributeValue::String(kind_string)) => {
            if kind_string == MULTI_KIND {
                return build_multi_context(attributes);
            }
            kind = kind_string;
        }
        Some(_) => {
            log::error!(target: "flagbridge", "the evaluation context contained an invalid kind");
        }
        // No kind specified, so it is a user kind.
        None => {}
    }

    let key = resolve_targeting_key(targeting_key, attributes.get("key"));
    Context::Single(build_single_context(attributes, kind, key))
}

/// Resolve and validate the context key from an explicit targeting key and a
/// `"key"` attribute.
///
/// A non-empty targeting key takes precedence; otherwise a string `"key"`
/// attribute is used; otherwise the key is left empty. Shared between the
/// single- and multi-context paths.
fn resolve_targeting_key(targeting_key: &str, key_attribute: Option<&AttributeValue>) -> String {
    let key_string = key_attribute.and_then(AttributeValue::as_str);

    if !targeting_key.is_empty() && key_string.is_some() {
        // Both will work, but it probably is not intentional.
        log::warn!(target: "flagbridge", "the evaluation context contained both a 'key' and a 'targetingKey'");
    }

    if key_attribute.is_some() && key_string.is_none() {
        log::warn!(target: "flagbridge", "a non-string 'key' attribute was provided");
    }

    // The targeting key takes precedence over the key attribute.
    let resolved = if !targeting_key.is_empty() {
        targeting_key
    } else {
        key_string.unwrap_or("")
    };

    if resolved.is_empty() {
        log::error!(target: "flagbridge",
            "the evaluation context must contain either a 'targetingKey' or a 'key' and it must be a string");
    }

    resolved.to_owned()
}

/// Build one single context of the resolved kind and key from the remaining
/// attributes.
fn build_single_context(attributes: &Attributes, kind: &str, key: String) -> SingleContext {
    let mut context = SingleContext::new(kind, key);

    for (name, value) in attributes {
        match name.as_str() {
            // Already consumed by kind/key resolution.
            "kind" | "key" | "targetingKey" => {}
            "privateAttributes" => {
                if let Some(private) = validate_private_attributes(value) {
                    context.private_attributes = private;
                }
            }
            "name" => {
                if let Some(display_name) = value.as_str() {
                    context.name = Some(display_name.to_owned());
                } else {
                    log::error!(target: "flagbridge",
                        "the 'name' attribute of an evaluation context must be a string");
                }
            }
            "anonymous" => {
                if let AttributeValue::Boolean(anonymous) = value {
                    context.anonymous = Some(*anonymous);
                } else {
                    log::error!(target: "flagbridge",
                        "the 'anonymous' attribute of an evaluation context must be a boolean");
                }
            }
            _ => {
                context
                    .attributes
                    .insert(name.clone(), to_flag_value(value));
            }
        }
    }

    context
}

/// Validate a `"privateAttributes"` value: a list of only strings.
///
/// Validation is all-or-nothing: one bad element discards the whole set.
fn validate_private_attributes(value: &AttributeValue) -> Option<Vec<String>> {
    let AttributeValue::List(items) = value else {
        log::error!(target: "flagbridge",
            "a 'privateAttributes' attribute in an evaluation context must have a list value");
        return None;
    };

    let mut private = Vec::with_capacity(items.len());
    for item in items {
        let Some(name) = item.as_str() else {
            log::error!(target: "flagbridge",
                "a 'privateAttributes' attribute must be a list of only string values");
            return None;
        };
        private.push(name.to_owned());
    }
    Some(private)
}

/// Build a multi-context: every top-level attribute other than `"kind"` is
/// one sub-context, keyed by its attribute name as the kind.
fn build_multi_context(attributes: &Attributes) -> Context {
    let mut contexts = Vec::new();

    for (kind, value) in attributes {
        if kind == "kind" {
            continue;
        }

        let Some(fields) = value.as_structure() else {
            log::warn!(target: "flagbridge",
                "top-level attributes in a multi-kind context should be structures");
            continue;
        };

        let targeting_key = fields
            .get("targetingKey")
            .and_then(AttributeValue::as_str)
            .unwrap_or("");
        let key = resolve_targeting_key(targeting_key, fields.get("key"));

        contexts.push(build_single_context(fields, kind, key));
    }

    Context::Multi(contexts)
}
