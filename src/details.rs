//! Conversion of engine evaluation details into the resolution details
//! returned to evaluation callers.

use crate::engine::{EvaluationDetail, EvaluationErrorKind, EvaluationReason};

/// Caller-facing reason for an evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The flag was disabled.
    Disabled,
    /// The context was individually targeted.
    TargetingMatch,
    /// No target or rule matched.
    Fallthrough,
    /// A rule matched.
    RuleMatch,
    /// A prerequisite flag failed.
    PrerequisiteFailed,
    /// The evaluation failed; see the error code.
    Error,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Reason::Disabled => "DISABLED",
            Reason::TargetingMatch => "TARGETING_MATCH",
            Reason::Fallthrough => "FALLTHROUGH",
            Reason::RuleMatch => "RULE_MATCH",
            Reason::PrerequisiteFailed => "PREREQUISITE_FAILED",
            Reason::Error => "ERROR",
        })
    }
}

/// Caller-facing error code for a failed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The provider was not ready to serve evaluations.
    ProviderNotReady,
    /// No flag exists under the requested key.
    FlagNotFound,
    /// The flag configuration could not be processed.
    ParseError,
    /// The context carried no usable identity.
    TargetingKeyMissing,
    /// The flag's value did not match the requested type.
    TypeMismatch,
    /// Any other failure.
    General,
}

/// An evaluation result as returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionDetails<T> {
    /// The resolved value, or the caller's default on failure.
    pub value: T,
    /// The variation served, as a stringified variation index. `None` when
    /// the engine fell back to the caller's default value.
    pub variant: Option<String>,
    /// Why this value was served.
    pub reason: Reason,
    /// Present only when `reason` is [`Reason::Error`].
    pub error_code: Option<ErrorCode>,
}

impl<T> ResolutionDetails<T> {
    /// Build resolution details from an engine detail whose value has already
    /// been coerced to the caller's type.
    pub(crate) fn from_detail(value: T, detail: &EvaluationDetail) -> ResolutionDetails<T> {
        ResolutionDetails {
            value,
            variant: detail.variation_index.map(|index| index.to_string()),
            reason: reason_of(detail.reason),
            error_code: match detail.reason {
                EvaluationReason::Error(kind) => Some(error_code_of(kind)),
                _ => None,
            },
        }
    }

    /// Build resolution details for a failure decided on the provider side
    /// (e.g., a type mismatch between the engine result and the caller's
    /// requested type).
    pub(crate) fn error(value: T, error_code: ErrorCode) -> ResolutionDetails<T> {
        ResolutionDetails {
            value,
            variant: None,
            reason: Reason::Error,
            error_code: Some(error_code),
        }
    }
}

fn reason_of(reason: EvaluationReason) -> Reason {
    match reason {
        EvaluationReason::Off => Reason::Disabled,
        EvaluationReason::TargetMatch => Reason::TargetingMatch,
        EvaluationReason::Fallthrough => Reason::Fallthrough,
        EvaluationReason::RuleMatch => Reason::RuleMatch,
        EvaluationReason::PrerequisiteFailed => Reason::PrerequisiteFailed,
        EvaluationReason::Error(_) => Reason::Error,
    }
}

fn error_code_of(kind: EvaluationErrorKind) -> ErrorCode {
    match kind {
        EvaluationErrorKind::ClientNotReady => ErrorCode::ProviderNotReady,
        EvaluationErrorKind::FlagNotFound => ErrorCode::FlagNotFound,
        EvaluationErrorKind::MalformedFlag => ErrorCode::ParseError,
        EvaluationErrorKind::UserNotSpecified => ErrorCode::TargetingKeyMissing,
        EvaluationErrorKind::WrongType => ErrorCode::TypeMismatch,
        EvaluationErrorKind::Exception | EvaluationErrorKind::Other => ErrorCode::General,
    }
}
