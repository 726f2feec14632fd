//! Human-readable rendering of conformance verdicts.
//!
//! Pure string templating over the closed failure taxonomy. Never fails:
//! every kind has a fixed template, and anything without a failure to
//! render falls back to a generic line.

use crate::verdict::{CallFailure, ConformanceVerdict, Failure};

/// Fallback used when an invalid verdict carries no renderable failure.
const GENERIC_FAILURE: &str = "validation failed";

/// Render a whole verdict as a single explanation string.
pub fn explain(verdict: &ConformanceVerdict) -> String {
    if verdict.valid() {
        return "all function calls conform to the expectation".to_string();
    }
    match verdict.failures.first() {
        Some(CallFailure { position, failure }) => {
            format!("expected call {position}: {}", render(failure))
        }
        None => GENERIC_FAILURE.to_string(),
    }
}

/// Render one failure with its fixed template.
pub fn render(failure: &Failure) -> String {
    match failure {
        Failure::NoFunctionDescriptions => {
            "no function descriptions were provided".to_string()
        }
        Failure::WrongCount { expected, actual } => format!(
            "wrong number of function calls: expected {expected}, got {actual}"
        ),
        Failure::WrongFuncName { expected, actual } => {
            format!("wrong function name: expected {expected}, got {actual}")
        }
        Failure::MissingRequired { param } => {
            format!("required parameter {param} is missing")
        }
        Failure::UnexpectedParam { param } => {
            format!("unexpected parameter {param}")
        }
        Failure::MissingOptional { param } => {
            format!("expected parameter {param} is missing and not marked optional")
        }
        Failure::TypeErrorSimple {
            param,
            declared,
            value,
        } => format!(
            "parameter {param} should be of type {}, got {value}",
            declared.as_str()
        ),
        Failure::TypeErrorNested {
            param,
            element,
            value,
        } => format!(
            "parameter {param} has elements that are not of type {}: {value}",
            element.as_str()
        ),
        Failure::ValueErrorString {
            param,
            value,
            accepted,
        }
        | Failure::ValueErrorList {
            param,
            value,
            accepted,
        }
        | Failure::ValueErrorOthers {
            param,
            value,
            accepted,
        } => format!(
            "parameter {param} value {value} is not among the accepted values {}",
            serde_json::Value::Array(accepted.clone())
        ),
        Failure::ValueErrorDictKey { param, key } => {
            format!("parameter {param} has a key mismatch at {key}")
        }
        Failure::ValueErrorDictValue { param, key, value } => {
            format!("parameter {param} key {key} has unaccepted value {value}")
        }
        Failure::ValueErrorListDictCount {
            param,
            actual_len,
            accepted_len,
        } => format!(
            "parameter {param} has {actual_len} mapping(s), expected {accepted_len}"
        ),
        Failure::CannotFindMatch {
            function_name,
            candidates,
        } => match candidates.first() {
            Some(candidate) => format!(
                "no actual call matches expected call to {function_name}; \
                 closest candidate (actual call {}): {}",
                candidate.actual_index,
                render(&candidate.failure)
            ),
            None => format!(
                "no actual call matches expected call to {function_name}"
            ),
        },
        Failure::WrongOrder {
            expected_order,
            actual_order,
            first_mismatch,
        } => format!(
            "function calls are out of order: expected [{}], got [{}], first mismatch at position {first_mismatch}",
            expected_order.join(", "),
            actual_order.join(", ")
        ),
        Failure::ObjectCheck {
            mismatch,
            path,
            expected,
            actual,
        } => format!(
            "object mismatch ({}) at {path}: expected {expected}, got {actual}",
            mismatch.code()
        ),
    }
}
