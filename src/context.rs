use std::collections::HashMap;

use crate::FlagValue;

/// Context kind used when the caller does not specify one.
pub const DEFAULT_KIND: &str = "user";

/// Context kind reserved to mean "this payload bundles multiple kinds".
pub const MULTI_KIND: &str = "multi";

/// A single evaluation context in the flag engine's native model.
///
/// A context is identified by its `kind` (category label, e.g. `"user"` or
/// `"organization"`) and its `key` (the primary identity string used for
/// consistent bucketing). Everything else is optional metadata and custom
/// attributes.
///
/// Contexts are constructed once (see [`crate::build_context`]) and not
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleContext {
    /// Category label for the context.
    pub kind: String,
    /// Primary identity string. The context builder never fails, so this may
    /// be empty for malformed input; the evaluation engine's own validation
    /// rejects such contexts.
    pub key: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional anonymous flag.
    pub anonymous: Option<bool>,
    /// Attribute names excluded from downstream transmission by the engine's
    /// own policy. Honored by the engine, not enforced here.
    pub private_attributes: Vec<String>,
    /// Custom attributes, in the engine's value model.
    pub attributes: HashMap<String, FlagValue>,
}

impl SingleContext {
    /// Create a context with the given kind and key and no other attributes.
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> SingleContext {
        SingleContext {
            kind: kind.into(),
            key: key.into(),
            name: None,
            anonymous: None,
            private_attributes: Vec::new(),
            attributes: HashMap::new(),
        }
    }
}

/// An evaluation context handed to the flag engine: either a single context
/// or a multi-context bundling one single context per kind.
///
/// A multi-context preserves the order its entries were assembled in. Kind
/// uniqueness across entries is a caller invariant and is not re-checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Context {
    /// One context of one kind.
    Single(SingleContext),
    /// An ordered collection of single contexts, one per kind.
    Multi(Vec<SingleContext>),
}

impl Context {
    /// The single context of the given kind, if any.
    pub fn for_kind(&self, kind: &str) -> Option<&SingleContext> {
        match self {
            Context::Single(context) => (context.kind == kind).then_some(context),
            Context::Multi(contexts) => contexts.iter().find(|context| context.kind == kind),
        }
    }
}
