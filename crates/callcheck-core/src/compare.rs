//! Leaf comparators: pure, stateless value predicates.
//!
//! Everything here operates on already-normalized [`serde_json::Value`]s.
//! String comparison is punctuation/case-insensitive via [`standardize`];
//! collection comparators check an actual value against a list of accepted
//! alternatives; the deep object comparator requires exact structural
//! equality and reports the first mismatch, tagged by path.

use serde_json::Value;

use crate::expectation::accepted_alternatives;
use crate::schema::ParamType;
use crate::verdict::{Failure, ObjectMismatchKind};

type Outcome = std::result::Result<(), Failure>;

// ---------------------------------------------------------------------------
// String standardization
// ---------------------------------------------------------------------------

/// Standardize a string for format-insensitive comparison: drop spaces,
/// commas, periods, slashes, hyphens, underscores, carets and asterisks;
/// lowercase; normalize apostrophes to double quotes. Idempotent.
pub fn standardize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            ' ' | ',' | '.' | '/' | '-' | '_' | '^' | '*' => {}
            '\'' => out.push('"'),
            _ => out.extend(ch.to_lowercase()),
        }
    }
    out
}

/// Value equality with standardized strings and numeric coercion.
pub fn standardized_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => standardize(x) == standardize(y),
        (Value::Number(_), Value::Number(_)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

// ---------------------------------------------------------------------------
// Type checking
// ---------------------------------------------------------------------------

/// Outcome of type-checking one parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    /// The value conforms to the declared type; content comparison follows.
    Conforms,
    /// The accepted set signals "any value of this shape is fine": accept
    /// without content comparison.
    FreeVariable,
    /// The value has the wrong shape.
    Mismatch,
}

/// Whether a value conforms to a declared parameter type. Integers are
/// accepted where float is declared; tuples are sequences.
pub fn value_conforms(declared: ParamType, value: &Value) -> bool {
    match declared {
        ParamType::String => value.is_string(),
        ParamType::Integer => value.is_i64() || value.is_u64(),
        ParamType::Float => value.is_number(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Array | ParamType::Tuple => value.is_array(),
        ParamType::Mapping | ParamType::Object => value.is_object(),
        ParamType::Any => true,
    }
}

/// Whether two values have the same top-level shape.
pub fn same_shape(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

/// Type-check a value against the declared type, with the free-variable
/// rule: when the accepted set is not homogeneously of the declared type
/// but is homogeneously of the actual value's shape, the author is
/// signalling that any value of that shape is fine.
pub fn type_check(declared: ParamType, value: &Value, accepted: &[Value]) -> TypeCheck {
    if value_conforms(declared, value) {
        return TypeCheck::Conforms;
    }
    if !accepted.is_empty()
        && !accepted.iter().all(|a| value_conforms(declared, a))
        && accepted.iter().all(|a| same_shape(a, value))
    {
        return TypeCheck::FreeVariable;
    }
    TypeCheck::Mismatch
}

/// Type-check each element of a sequence against the declared element
/// type. An element with the wrong type is still tolerated when at least
/// one accepted-list alternative carries an element of its shape.
pub fn nested_elements_conform(element: ParamType, items: &[Value], accepted: &[Value]) -> bool {
    items.iter().all(|item| {
        value_conforms(element, item)
            || accepted.iter().any(|alt| {
                alt.as_array()
                    .is_some_and(|alt_items| alt_items.iter().any(|e| same_shape(e, item)))
            })
    })
}

// ---------------------------------------------------------------------------
// Content comparators
// ---------------------------------------------------------------------------

/// Standardized string membership in the accepted set.
pub fn compare_string(param: &str, value: &Value, accepted: &[Value]) -> Outcome {
    let matched = value.as_str().is_some_and(|actual| {
        let actual = standardize(actual);
        accepted
            .iter()
            .any(|a| a.as_str().is_some_and(|s| standardize(s) == actual))
    });
    if matched {
        Ok(())
    } else {
        Err(Failure::ValueErrorString {
            param: param.to_string(),
            value: value.clone(),
            accepted: accepted.to_vec(),
        })
    }
}

/// Non-string scalar membership in the accepted set.
pub fn compare_scalar(param: &str, value: &Value, accepted: &[Value]) -> Outcome {
    if accepted.iter().any(|a| standardized_eq(value, a)) {
        Ok(())
    } else {
        Err(Failure::ValueErrorOthers {
            param: param.to_string(),
            value: value.clone(),
            accepted: accepted.to_vec(),
        })
    }
}

/// Order-sensitive, element-wise sequence equality against at least one
/// accepted alternative. Tuple-shaped values compare the same way.
pub fn compare_sequence(param: &str, items: &[Value], accepted: &[Value]) -> Outcome {
    for alt in accepted {
        if let Some(alt_items) = alt.as_array() {
            if alt_items.len() == items.len()
                && items
                    .iter()
                    .zip(alt_items)
                    .all(|(a, e)| standardized_eq(a, e))
            {
                return Ok(());
            }
        }
    }
    Err(Failure::ValueErrorList {
        param: param.to_string(),
        value: Value::Array(items.to_vec()),
        accepted: accepted.to_vec(),
    })
}

/// Mapping comparison: every actual key must be known to the accepted
/// mapping with an in-set value; every accepted key absent from the actual
/// mapping must carry the optional sentinel. Succeeds when *any* accepted
/// alternative fully matches.
pub fn compare_mapping(
    param: &str,
    actual: &serde_json::Map<String, Value>,
    accepted: &[Value],
) -> Outcome {
    let mut first_failure = None;
    for alt in accepted {
        let Some(alt_map) = alt.as_object() else {
            continue;
        };
        match mapping_matches(param, actual, alt_map) {
            Ok(()) => return Ok(()),
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }
    }
    Err(first_failure.unwrap_or_else(|| Failure::ValueErrorOthers {
        param: param.to_string(),
        value: Value::Object(actual.clone()),
        accepted: accepted.to_vec(),
    }))
}

fn mapping_matches(
    param: &str,
    actual: &serde_json::Map<String, Value>,
    accepted: &serde_json::Map<String, Value>,
) -> Outcome {
    for (key, value) in actual {
        let Some(authored) = accepted.get(key) else {
            return Err(Failure::ValueErrorDictKey {
                param: param.to_string(),
                key: key.clone(),
            });
        };
        let alternatives = accepted_alternatives(authored);
        if !alternatives.iter().any(|a| standardized_eq(value, a)) {
            return Err(Failure::ValueErrorDictValue {
                param: param.to_string(),
                key: key.clone(),
                value: value.clone(),
            });
        }
    }
    for (key, authored) in accepted {
        if !actual.contains_key(key) {
            let alternatives = accepted_alternatives(authored);
            if !crate::expectation::is_optional(alternatives) {
                return Err(Failure::ValueErrorDictKey {
                    param: param.to_string(),
                    key: key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Sequence-of-mappings comparison: equal length, then the mapping
/// comparator element-wise, against at least one accepted alternative.
pub fn compare_mapping_sequence(param: &str, items: &[Value], accepted: &[Value]) -> Outcome {
    let mut first_failure = None;
    'alternatives: for alt in accepted {
        let Some(alt_items) = alt.as_array() else {
            continue;
        };
        if alt_items.len() != items.len() {
            first_failure.get_or_insert(Failure::ValueErrorListDictCount {
                param: param.to_string(),
                actual_len: items.len(),
                accepted_len: alt_items.len(),
            });
            continue;
        }
        for (item, alt_item) in items.iter().zip(alt_items) {
            let (Some(actual_map), Some(accepted_map)) = (item.as_object(), alt_item.as_object())
            else {
                first_failure.get_or_insert(Failure::ValueErrorList {
                    param: param.to_string(),
                    value: Value::Array(items.to_vec()),
                    accepted: accepted.to_vec(),
                });
                continue 'alternatives;
            };
            if let Err(failure) = mapping_matches(param, actual_map, accepted_map) {
                first_failure.get_or_insert(failure);
                continue 'alternatives;
            }
        }
        return Ok(());
    }
    Err(first_failure.unwrap_or_else(|| Failure::ValueErrorList {
        param: param.to_string(),
        value: Value::Array(items.to_vec()),
        accepted: accepted.to_vec(),
    }))
}

// ---------------------------------------------------------------------------
// Deep object comparator
// ---------------------------------------------------------------------------

/// Recursive structural equality between an actual value and a single
/// expected value. Mapping keys must match exactly on both sides; sequences
/// must match length and recurse per element; strings compare standardized;
/// other scalars compare by equality. Returns the first mismatch found,
/// tagged by path (e.g. `param.key[2]`). Each recursive call returns its
/// own result; there is no shared accumulator across stack frames.
pub fn compare_exact(path: &str, expected: &Value, actual: &Value) -> Outcome {
    if !same_shape(expected, actual) {
        return Err(object_mismatch(
            ObjectMismatchKind::TypeMismatch,
            path,
            expected,
            actual,
        ));
    }
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            for key in act.keys() {
                if !exp.contains_key(key) {
                    return Err(object_mismatch(
                        ObjectMismatchKind::UnexpectedKey,
                        &format!("{path}.{key}"),
                        expected,
                        actual,
                    ));
                }
            }
            for (key, exp_value) in exp {
                let Some(act_value) = act.get(key) else {
                    return Err(object_mismatch(
                        ObjectMismatchKind::MissingKey,
                        &format!("{path}.{key}"),
                        expected,
                        actual,
                    ));
                };
                compare_exact(&format!("{path}.{key}"), exp_value, act_value)?;
            }
            Ok(())
        }
        (Value::Array(exp), Value::Array(act)) => {
            if exp.len() != act.len() {
                return Err(object_mismatch(
                    ObjectMismatchKind::LengthMismatch,
                    path,
                    expected,
                    actual,
                ));
            }
            for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                compare_exact(&format!("{path}[{i}]"), e, a)?;
            }
            Ok(())
        }
        (Value::String(e), Value::String(a)) => {
            if standardize(e) == standardize(a) {
                Ok(())
            } else {
                Err(object_mismatch(
                    ObjectMismatchKind::StringMismatch,
                    path,
                    expected,
                    actual,
                ))
            }
        }
        _ => {
            if expected == actual {
                Ok(())
            } else {
                Err(object_mismatch(
                    ObjectMismatchKind::ValueMismatch,
                    path,
                    expected,
                    actual,
                ))
            }
        }
    }
}

fn object_mismatch(
    mismatch: ObjectMismatchKind,
    path: &str,
    expected: &Value,
    actual: &Value,
) -> Failure {
    Failure::ObjectCheck {
        mismatch,
        path: path.to_string(),
        expected: expected.clone(),
        actual: actual.clone(),
    }
}
