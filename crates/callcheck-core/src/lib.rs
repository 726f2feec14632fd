//! Callcheck Core Library
//!
//! Function-call conformance validation: given function descriptors, an
//! expected-call specification, and the tool calls a model actually made,
//! decide whether the actual calls structurally and semantically match the
//! expectation.
//!
//! The pipeline is Normalizer → Conformance Matcher → Per-Call Validator →
//! Leaf Comparators; the Diagnostic Formatter renders a verdict on demand.
//! Every entry point is a pure, synchronous function of its inputs.

pub mod calls;
pub mod check;
pub mod compare;
pub mod error;
pub mod expectation;
pub mod explain;
pub mod matcher;
pub mod normalize;
pub mod schema;
pub mod telemetry;
pub mod validate;
pub mod verdict;

pub use calls::{extract_tool_calls, ActualCall, ActualCallSequence};
pub use check::{
    evaluate, run_check, write_verdict_json, CheckInput, CheckOutcome, VerdictArtifact,
};
pub use error::{CheckError, Result};
pub use expectation::{ExpectedCall, ExpectedCallSet};
pub use explain::{explain, render};
pub use matcher::match_calls;
pub use normalize::lenient_value;
pub use schema::{FunctionSignature, ParamType, ParameterSpec, SignatureSet};
pub use telemetry::init_tracing;
pub use validate::validate_call;
pub use verdict::{
    CallFailure, CandidateFailure, ConformanceVerdict, Failure, ObjectMismatchKind,
};

/// Callcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
