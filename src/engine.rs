//! The flag-evaluation engine's interface, as consumed by the provider.
//!
//! The engine itself is an external collaborator: it takes a constructed
//! context, a flag key and a default value, and returns a value/variation/
//! reason tuple. Nothing about the evaluation algorithm is modeled here.

use crate::{Context, FlagValue};

/// How the engine arrived at an evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationReason {
    /// The flag is off and the default off-variation was served.
    Off,
    /// The context key was individually targeted.
    TargetMatch,
    /// No target or rule matched; the fallthrough variation was served.
    Fallthrough,
    /// A rule matched the context.
    RuleMatch,
    /// A prerequisite flag failed, so the off-variation was served.
    PrerequisiteFailed,
    /// The flag could not be evaluated; the default value was served.
    Error(EvaluationErrorKind),
}

/// Why an evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationErrorKind {
    /// The engine was not ready to serve evaluations.
    ClientNotReady,
    /// No flag exists under the requested key.
    FlagNotFound,
    /// The flag configuration could not be processed.
    MalformedFlag,
    /// The context carried no usable identity.
    UserNotSpecified,
    /// The flag's value did not match the requested type.
    WrongType,
    /// An unexpected internal failure.
    Exception,
    /// A failure that does not fall into any other category.
    Other,
}

/// One evaluation result from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDetail {
    /// The value served, in the engine's value model.
    pub value: FlagValue,
    /// Index of the variation served, or `None` when the engine fell back to
    /// the caller's default value.
    pub variation_index: Option<usize>,
    /// How the engine arrived at this result.
    pub reason: EvaluationReason,
}

/// The evaluation engine, as the provider sees it.
pub trait EvaluationEngine: Send + Sync {
    /// Evaluate a flag against a context, falling back to `default_value`
    /// when the flag cannot be evaluated.
    fn variation_detail(
        &self,
        flag_key: &str,
        context: &Context,
        default_value: FlagValue,
    ) -> EvaluationDetail;
}
