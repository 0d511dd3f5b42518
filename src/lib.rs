//! `flagbridge` bridges a server-side feature-flag engine to a generic
//! evaluation API: callers describe an evaluation context as generic
//! attributes, and the crate translates between that model and the engine's
//! native context/value model while exposing an observable provider
//! lifecycle.
//!
//! # Overview
//!
//! The crate revolves around a [`Provider`] that is wired to four external
//! collaborators at construction: the [`EvaluationEngine`] that evaluates
//! flags against a native [`Context`], the engine's
//! [`DataSourceStatusProvider`] and [`FlagChangeNotifier`], and an
//! [`EventSink`] that receives lifecycle and configuration events.
//!
//! Evaluation requests carry [`Attributes`] (a map of [`AttributeValue`]s).
//! [`build_context`] turns one such map into the engine's [`Context`],
//! resolving the context kind, targeting key, built-in attributes and
//! private-attribute list, and recursing through [`to_flag_value`] for
//! custom attributes. Object/array results travel back through
//! [`to_attribute_value`]. Both conversions are total: malformed input
//! degrades the result and is reported through logging, never raised to the
//! caller.
//!
//! The provider lifecycle ([`Lifecycle`], [`ProviderState`]) observes the
//! data source's connectivity and supports a blocking initialization that
//! completes on the first READY or ERROR transition. Lifecycle failures are
//! the only errors this crate surfaces to callers; see [`Error`].
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate for all
//! diagnostics, under the `flagbridge` target. Context-construction problems
//! are reported here and nowhere else, so integrating a `log`-compatible
//! logger is strongly recommended.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod attributes;
mod context;
mod context_builder;
mod convert;
mod data_source;
mod details;
mod engine;
mod error;
mod events;
mod flag_value;
mod lifecycle;
mod provider;
#[cfg(test)]
mod testing;

pub use attributes::{AttributeValue, Attributes};
pub use context::{Context, SingleContext, DEFAULT_KIND, MULTI_KIND};
pub use context_builder::build_context;
pub use convert::{to_attribute_value, to_flag_value};
pub use data_source::{
    DataSourceState, DataSourceStatus, DataSourceStatusProvider, ErrorInfo, ErrorKind, FlagChange,
    FlagChangeListener, FlagChangeNotifier, StatusListener,
};
pub use details::{ErrorCode, Reason, ResolutionDetails};
pub use engine::{EvaluationDetail, EvaluationEngine, EvaluationErrorKind, EvaluationReason};
pub use error::{Error, Result};
pub use events::{EventSink, ProviderEvent};
pub use flag_value::FlagValue;
pub use lifecycle::{Lifecycle, ProviderState};
pub use provider::{Provider, ProviderConfig, ProviderMetadata};
