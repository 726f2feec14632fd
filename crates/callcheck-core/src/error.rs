//! Hard-failure taxonomy for the conformance validator.
//!
//! These errors indicate broken check or scenario authoring — a descriptor
//! that cannot be normalized into a function signature, an expectation that
//! references a function nobody described, tool-call metadata that does not
//! carry the agreed shape. They propagate to the execution harness as
//! row-level failures and are never absorbed into a [`ConformanceVerdict`].
//!
//! [`ConformanceVerdict`]: crate::verdict::ConformanceVerdict

/// Errors produced while normalizing check and scenario inputs.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("function descriptor is not a mapping")]
    DescriptorNotMapping,

    #[error("function descriptor missing required field: {field}")]
    DescriptorMissingField { field: &'static str },

    #[error("no function descriptor named: {name}")]
    UnknownFunction { name: String },

    #[error("expected-call specification is not a sequence of calls")]
    ExpectedCallsNotSequence,

    #[error("expected call {index} missing function name")]
    ExpectedCallMissingName { index: usize },

    #[error("metadata missing tool_calls sequence")]
    MissingToolCalls,

    #[error("tool call {index} is malformed: {reason}")]
    MalformedToolCall { index: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for validator operations that can hit authoring errors.
pub type Result<T> = std::result::Result<T, CheckError>;
