//! Conformance matching of a whole actual-call sequence against a whole
//! expected-call set, in strict-order or order-free discipline.

use tracing::debug;

use crate::calls::{ActualCall, ActualCallSequence};
use crate::error::Result;
use crate::expectation::ExpectedCallSet;
use crate::schema::{canonical_name, SignatureSet};
use crate::validate::validate_call;
use crate::verdict::{CallFailure, CandidateFailure, ConformanceVerdict, Failure};

/// Match the actual calls against the expectation and produce one verdict
/// for the whole set.
pub fn match_calls(
    signatures: &SignatureSet,
    expected: &ExpectedCallSet,
    actual: &ActualCallSequence,
) -> Result<ConformanceVerdict> {
    if expected.calls.len() != actual.len() {
        return Ok(ConformanceVerdict::fail(vec![CallFailure {
            position: 0,
            failure: Failure::WrongCount {
                expected: expected.calls.len(),
                actual: actual.len(),
            },
        }]));
    }

    let verdict = if expected.strict_order {
        match_strict(signatures, expected, actual)?
    } else {
        match_order_free(signatures, expected, actual)?
    };

    debug!(
        event = "conformance.evaluated",
        strict_order = expected.strict_order,
        expected_calls = expected.calls.len(),
        actual_calls = actual.len(),
        valid = verdict.valid(),
        code = verdict.code().unwrap_or("ok"),
    );
    Ok(verdict)
}

/// Positional matching: `actual[i]` must validate against `expected[i]`.
///
/// When any position fails on the function *name*, the whole verdict
/// collapses to a single order violation carrying both name sequences and
/// the first diverging index; argument-level failures are reported as-is.
fn match_strict(
    signatures: &SignatureSet,
    expected: &ExpectedCallSet,
    actual: &[ActualCall],
) -> Result<ConformanceVerdict> {
    let mut failures = Vec::new();
    for (position, (exp, act)) in expected.calls.iter().zip(actual).enumerate() {
        if let Some(failure) = validate_call(signatures, act, exp)? {
            failures.push(CallFailure { position, failure });
        }
    }

    if failures.is_empty() {
        return Ok(ConformanceVerdict::pass());
    }

    let name_level = failures
        .iter()
        .any(|cf| matches!(cf.failure, Failure::WrongFuncName { .. }));
    if name_level {
        let expected_order: Vec<String> = expected
            .calls
            .iter()
            .map(|c| c.function_name.clone())
            .collect();
        let actual_order: Vec<String> = actual.iter().map(|c| c.function_name.clone()).collect();
        let first_mismatch = expected_order
            .iter()
            .zip(&actual_order)
            .position(|(e, a)| canonical_name(e) != canonical_name(a))
            .unwrap_or(0);
        return Ok(ConformanceVerdict::fail(vec![CallFailure {
            position: first_mismatch,
            failure: Failure::WrongOrder {
                expected_order,
                actual_order,
                first_mismatch,
            },
        }]));
    }

    Ok(ConformanceVerdict::fail(failures))
}

/// Greedy bijective matching: per expected call, the first validating
/// unmatched actual call (by ascending index) is consumed. Deliberately
/// non-backtracking, for compatibility with the server-side matcher.
fn match_order_free(
    signatures: &SignatureSet,
    expected: &ExpectedCallSet,
    actual: &[ActualCall],
) -> Result<ConformanceVerdict> {
    let mut consumed = vec![false; actual.len()];

    for (position, exp) in expected.calls.iter().enumerate() {
        let mut matched = None;
        let mut candidates: Vec<CandidateFailure> = Vec::new();

        for (actual_index, act) in actual.iter().enumerate() {
            if consumed[actual_index] {
                continue;
            }
            match validate_call(signatures, act, exp)? {
                None => {
                    matched = Some(actual_index);
                    break;
                }
                Some(failure) => candidates.push(CandidateFailure {
                    actual_index,
                    failure,
                }),
            }
        }

        match matched {
            Some(actual_index) => {
                consumed[actual_index] = true;
                debug!(
                    event = "conformance.call_matched",
                    expected_position = position,
                    actual_index = actual_index,
                    function = %exp.function_name,
                );
            }
            None => {
                // With a single expected/actual pair there is no search to
                // explain; surface the per-call failure directly.
                let failure = match (expected.calls.len(), candidates.len()) {
                    (1, 1) => candidates.remove(0).failure,
                    _ => Failure::CannotFindMatch {
                        function_name: exp.function_name.clone(),
                        candidates,
                    },
                };
                return Ok(ConformanceVerdict::fail(vec![CallFailure { position, failure }]));
            }
        }
    }

    Ok(ConformanceVerdict::pass())
}
