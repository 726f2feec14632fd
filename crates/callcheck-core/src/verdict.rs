//! Semantic conformance verdicts.
//!
//! A [`ConformanceVerdict`] is the *scored* outcome of matching actual calls
//! against an expectation — `valid == false` means the model misbehaved, not
//! that the check was mis-authored (those are [`CheckError`]s).
//!
//! [`CheckError`]: crate::error::CheckError

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ParamType;

/// Mismatch kinds reported by the deep object comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectMismatchKind {
    ValueMismatch,
    TypeMismatch,
    UnexpectedKey,
    MissingKey,
    LengthMismatch,
    StringMismatch,
}

impl ObjectMismatchKind {
    /// Canonical error-kind string for this mismatch.
    pub fn code(&self) -> &'static str {
        match self {
            ObjectMismatchKind::ValueMismatch => "exact_object_checker:value_mismatch",
            ObjectMismatchKind::TypeMismatch => "exact_object_checker:type_mismatch",
            ObjectMismatchKind::UnexpectedKey => "exact_object_checker:unexpected_key",
            ObjectMismatchKind::MissingKey => "exact_object_checker:missing_key",
            ObjectMismatchKind::LengthMismatch => "exact_object_checker:length_mismatch",
            ObjectMismatchKind::StringMismatch => "exact_object_checker:string_mismatch",
        }
    }
}

/// A per-candidate diagnostic collected during order-free matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    /// Index of the still-unmatched actual call that was tried.
    pub actual_index: usize,
    /// Why it did not validate against the expected call.
    pub failure: Failure,
}

/// Closed taxonomy of semantic conformance failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    /// The description payload was not a mapping or sequence of mappings.
    NoFunctionDescriptions,

    /// Expected and actual call counts differ.
    WrongCount { expected: usize, actual: usize },

    /// The actual call invoked a different function.
    WrongFuncName { expected: String, actual: String },

    /// A required parameter is absent from the actual arguments.
    MissingRequired { param: String },

    /// The actual call supplied a parameter that is neither declared nor
    /// expected.
    UnexpectedParam { param: String },

    /// An expected parameter without the optional sentinel is absent.
    MissingOptional { param: String },

    /// The value does not conform to the declared parameter type.
    TypeErrorSimple {
        param: String,
        declared: ParamType,
        value: Value,
    },

    /// A collection element does not conform to the declared element type.
    TypeErrorNested {
        param: String,
        element: ParamType,
        value: Value,
    },

    /// A string value is outside the accepted set (standardized comparison).
    ValueErrorString {
        param: String,
        value: Value,
        accepted: Vec<Value>,
    },

    /// A sequence value matches none of the accepted alternatives.
    ValueErrorList {
        param: String,
        value: Value,
        accepted: Vec<Value>,
    },

    /// A mapping carries a key the accepted mapping does not, or is missing
    /// a non-optional accepted key.
    ValueErrorDictKey { param: String, key: String },

    /// A mapping value is outside the accepted list for its key.
    ValueErrorDictValue {
        param: String,
        key: String,
        value: Value,
    },

    /// A sequence of mappings differs in length from every accepted
    /// alternative.
    ValueErrorListDictCount {
        param: String,
        actual_len: usize,
        accepted_len: usize,
    },

    /// A non-string scalar is outside the accepted set.
    ValueErrorOthers {
        param: String,
        value: Value,
        accepted: Vec<Value>,
    },

    /// Order-free matching found no unmatched actual call that validates
    /// against this expected call.
    CannotFindMatch {
        function_name: String,
        candidates: Vec<CandidateFailure>,
    },

    /// Strict-order matching found the function-name sequences diverging.
    WrongOrder {
        expected_order: Vec<String>,
        actual_order: Vec<String>,
        first_mismatch: usize,
    },

    /// The deep object comparator found a structural mismatch.
    ObjectCheck {
        mismatch: ObjectMismatchKind,
        path: String,
        expected: Value,
        actual: Value,
    },
}

impl Failure {
    /// Canonical error-kind string for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Failure::NoFunctionDescriptions => "no_function_descriptions",
            Failure::WrongCount { .. } => "wrong_count",
            Failure::WrongFuncName { .. } => "wrong_func_name",
            Failure::MissingRequired { .. } => "missing_required",
            Failure::UnexpectedParam { .. } => "unexpected_param",
            Failure::MissingOptional { .. } => "missing_optional",
            Failure::TypeErrorSimple { .. } => "type_error:simple",
            Failure::TypeErrorNested { .. } => "type_error:nested",
            Failure::ValueErrorString { .. } => "value_error:string",
            Failure::ValueErrorList { .. } => "value_error:list/tuple",
            Failure::ValueErrorDictKey { .. } => "value_error:dict_key",
            Failure::ValueErrorDictValue { .. } => "value_error:dict_value",
            Failure::ValueErrorListDictCount { .. } => "value_error:list_dict_count",
            Failure::ValueErrorOthers { .. } => "value_error:others",
            Failure::CannotFindMatch { .. } => "cannot_find_match",
            Failure::WrongOrder { .. } => "wrong_order",
            Failure::ObjectCheck { mismatch, .. } => mismatch.code(),
        }
    }
}

/// One failure, tagged with the expected-call position it occurred at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFailure {
    /// Index into the expected-call sequence.
    pub position: usize,
    /// What went wrong at that position.
    pub failure: Failure,
}

/// The outcome of matching a whole actual-call sequence against a whole
/// expected-call set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformanceVerdict {
    /// Failures found (empty when the calls conform).
    pub failures: Vec<CallFailure>,
}

impl ConformanceVerdict {
    pub fn pass() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    pub fn fail(failures: Vec<CallFailure>) -> Self {
        Self { failures }
    }

    /// Whether the actual calls conform (i.e., there are no failures).
    pub fn valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Canonical error-kind string of the first failure, if any.
    pub fn code(&self) -> Option<&'static str> {
        self.failures.first().map(|cf| cf.failure.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_match_the_published_taxonomy() {
        assert_eq!(Failure::NoFunctionDescriptions.code(), "no_function_descriptions");
        assert_eq!(
            Failure::TypeErrorSimple {
                param: "x".into(),
                declared: ParamType::String,
                value: json!(1),
            }
            .code(),
            "type_error:simple"
        );
        assert_eq!(
            Failure::ObjectCheck {
                mismatch: ObjectMismatchKind::ValueMismatch,
                path: "param.x.y".into(),
                expected: json!(2),
                actual: json!(1),
            }
            .code(),
            "exact_object_checker:value_mismatch"
        );
    }

    #[test]
    fn verdict_validity_derives_from_failures() {
        assert!(ConformanceVerdict::pass().valid());
        let verdict = ConformanceVerdict::fail(vec![CallFailure {
            position: 0,
            failure: Failure::WrongCount {
                expected: 2,
                actual: 1,
            },
        }]);
        assert!(!verdict.valid());
        assert_eq!(verdict.code(), Some("wrong_count"));
    }

    #[test]
    fn failures_serialize_with_snake_case_kind_tags() {
        let failure = Failure::MissingRequired { param: "location".into() };
        let encoded = serde_json::to_value(&failure).unwrap();
        assert_eq!(encoded["kind"], json!("missing_required"));
        assert_eq!(encoded["param"], json!("location"));
    }
}
