//! Per-call validation: one actual call against one candidate expected call
//! and its function signature.

use serde_json::Value;

use crate::calls::ActualCall;
use crate::compare::{
    compare_exact, compare_mapping, compare_mapping_sequence, compare_scalar, compare_sequence,
    compare_string, nested_elements_conform, type_check, TypeCheck,
};
use crate::error::Result;
use crate::expectation::{is_optional, ExpectedCall};
use crate::schema::{canonical_name, ParamType, ParameterSpec, SignatureSet};
use crate::verdict::Failure;

/// Validate one actual call against one expected call.
///
/// The outer `Result` carries hard authoring errors (unresolvable
/// signature); `Ok(Some(failure))` is a semantic mismatch, `Ok(None)` means
/// the call conforms.
pub fn validate_call(
    signatures: &SignatureSet,
    actual: &ActualCall,
    expected: &ExpectedCall,
) -> Result<Option<Failure>> {
    let signature = signatures.resolve(&expected.function_name)?;

    if canonical_name(&actual.function_name) != canonical_name(&signature.name) {
        return Ok(Some(Failure::WrongFuncName {
            expected: signature.name.clone(),
            actual: actual.function_name.clone(),
        }));
    }

    for name in &signature.required {
        if !actual.arguments.contains_key(name) {
            return Ok(Some(Failure::MissingRequired { param: name.clone() }));
        }
    }

    for (param, value) in &actual.arguments {
        let spec = signature.parameters.get(param);
        let accepted = expected.accepted_arguments.get(param);

        let Some(spec) = spec else {
            let Some(accepted) = accepted else {
                return Ok(Some(Failure::UnexpectedParam {
                    param: param.clone(),
                }));
            };
            // Undeclared but authored: compare by the value's own shape.
            if let Err(failure) = compare_by_shape(param, value, accepted) {
                return Ok(Some(failure));
            }
            continue;
        };

        let accepted_values = accepted.map(Vec::as_slice).unwrap_or(&[]);
        match type_check(spec.declared, value, accepted_values) {
            TypeCheck::Mismatch => {
                return Ok(Some(Failure::TypeErrorSimple {
                    param: param.clone(),
                    declared: spec.declared,
                    value: value.clone(),
                }));
            }
            // The accepted set marks this parameter a free variable: any
            // value of its shape is fine, skip content comparison.
            TypeCheck::FreeVariable => continue,
            TypeCheck::Conforms => {}
        }

        if matches!(spec.declared, ParamType::Array | ParamType::Tuple) {
            if let (Some(element), Some(items)) = (spec.element, value.as_array()) {
                if !nested_elements_conform(element, items, accepted_values) {
                    return Ok(Some(Failure::TypeErrorNested {
                        param: param.clone(),
                        element,
                        value: value.clone(),
                    }));
                }
            }
        }

        // Declared but without an authored accepted set: the type check is
        // the whole contract.
        let Some(accepted) = accepted else {
            continue;
        };

        if let Err(failure) = compare_declared(param, spec, value, accepted) {
            return Ok(Some(failure));
        }
    }

    for (param, accepted) in &expected.accepted_arguments {
        if !actual.arguments.contains_key(param) && !is_optional(accepted) {
            return Ok(Some(Failure::MissingOptional {
                param: param.clone(),
            }));
        }
    }

    Ok(None)
}

/// Dispatch a type-checked value to the comparator for its declared type.
fn compare_declared(
    param: &str,
    spec: &ParameterSpec,
    value: &Value,
    accepted: &[Value],
) -> std::result::Result<(), Failure> {
    match spec.declared {
        ParamType::String => compare_string(param, value, accepted),
        ParamType::Integer | ParamType::Float | ParamType::Boolean => {
            compare_scalar(param, value, accepted)
        }
        ParamType::Array | ParamType::Tuple => {
            // Type checking guarantees a sequence here.
            let items = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
            if sequence_holds_mappings(spec, items) {
                compare_mapping_sequence(param, items, accepted)
            } else {
                compare_sequence(param, items, accepted)
            }
        }
        ParamType::Mapping => match value.as_object() {
            Some(map) => compare_mapping(param, map, accepted),
            None => Ok(()),
        },
        ParamType::Object => match accepted.first() {
            // The deep comparator takes a single expected value, not an
            // alternative set.
            Some(expected) => compare_exact(param, expected, value),
            None => Ok(()),
        },
        ParamType::Any => compare_by_shape(param, value, accepted),
    }
}

/// Comparator dispatch driven by the value's own shape, for parameters
/// without a usable declared type.
fn compare_by_shape(
    param: &str,
    value: &Value,
    accepted: &[Value],
) -> std::result::Result<(), Failure> {
    match value {
        Value::String(_) => compare_string(param, value, accepted),
        Value::Array(items) => {
            if !items.is_empty() && items.iter().all(Value::is_object) {
                compare_mapping_sequence(param, items, accepted)
            } else {
                compare_sequence(param, items, accepted)
            }
        }
        Value::Object(map) => compare_mapping(param, map, accepted),
        _ => compare_scalar(param, value, accepted),
    }
}

fn sequence_holds_mappings(spec: &ParameterSpec, items: &[Value]) -> bool {
    matches!(spec.element, Some(ParamType::Mapping) | Some(ParamType::Object))
        || (!items.is_empty() && items.iter().all(Value::is_object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn signatures() -> SignatureSet {
        SignatureSet::parse(&json!([{
            "name": "get_weather",
            "parameters": {
                "properties": {
                    "location": {"type": "string"},
                    "days": {"type": "integer"},
                    "samples": {"type": "array", "items": {"type": "dict"}}
                },
                "required": ["location"]
            }
        }]))
        .unwrap()
        .unwrap()
    }

    fn actual(name: &str, arguments: Value) -> ActualCall {
        let arguments = arguments
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        ActualCall {
            function_name: name.to_string(),
            arguments,
        }
    }

    fn expected(name: &str, arguments: &[(&str, Value)]) -> ExpectedCall {
        let mut accepted_arguments = BTreeMap::new();
        for (param, alternatives) in arguments {
            let list = match alternatives {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            accepted_arguments.insert(param.to_string(), list);
        }
        ExpectedCall {
            function_name: name.to_string(),
            accepted_arguments,
        }
    }

    #[test]
    fn conforming_call_validates() {
        let exp = expected("get_weather", &[("location", json!(["San Francisco, CA"]))]);
        let act = actual("get_weather", json!({"location": "san-francisco ca"}));
        assert_eq!(validate_call(&signatures(), &act, &exp).unwrap(), None);
    }

    #[test]
    fn wrong_name_is_reported() {
        let exp = expected("get_weather", &[]);
        let act = actual("get_news", json!({"location": "SF"}));
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::WrongFuncName { .. })
        ));
    }

    #[test]
    fn dotted_actual_name_matches_underscored_declaration() {
        let exp = expected("get_weather", &[("location", json!(["SF"]))]);
        let act = actual("get.weather", json!({"location": "SF"}));
        assert_eq!(validate_call(&signatures(), &act, &exp).unwrap(), None);
    }

    #[test]
    fn missing_required_parameter_is_reported() {
        let exp = expected("get_weather", &[("location", json!(["SF"]))]);
        let act = actual("get_weather", json!({}));
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::MissingRequired { param }) if param == "location"
        ));
    }

    #[test]
    fn undeclared_unexpected_parameter_is_reported() {
        let exp = expected("get_weather", &[("location", json!(["SF"]))]);
        let act = actual("get_weather", json!({"location": "SF", "mood": "sunny"}));
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::UnexpectedParam { param }) if param == "mood"
        ));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let exp = expected(
            "get_weather",
            &[("location", json!(["SF"])), ("days", json!([3]))],
        );
        let act = actual("get_weather", json!({"location": "SF", "days": "three"}));
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::TypeErrorSimple { param, .. }) if param == "days"
        ));
    }

    #[test]
    fn free_variable_parameter_skips_content_comparison() {
        // Declared integer, but accepted values are strings and so is the
        // actual value: accepted without comparing content.
        let exp = expected(
            "get_weather",
            &[("location", json!(["SF"])), ("days", json!(["many", "few"]))],
        );
        let act = actual(
            "get_weather",
            json!({"location": "SF", "days": "a fortnight"}),
        );
        assert_eq!(validate_call(&signatures(), &act, &exp).unwrap(), None);
    }

    #[test]
    fn sequence_of_mappings_dispatch() {
        let exp = expected(
            "get_weather",
            &[
                ("location", json!(["SF"])),
                ("samples", json!([[{"a": [1]}]])),
            ],
        );
        let act = actual(
            "get_weather",
            json!({"location": "SF", "samples": [{"a": 1}]}),
        );
        assert_eq!(validate_call(&signatures(), &act, &exp).unwrap(), None);
    }

    #[test]
    fn expected_parameter_without_sentinel_must_be_present() {
        let exp = expected(
            "get_weather",
            &[("location", json!(["SF"])), ("days", json!([3]))],
        );
        let act = actual("get_weather", json!({"location": "SF"}));
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::MissingOptional { param }) if param == "days"
        ));
    }

    #[test]
    fn optional_sentinel_tolerates_absence() {
        let exp = expected(
            "get_weather",
            &[("location", json!(["SF"])), ("days", json!([3, ""]))],
        );
        let act = actual("get_weather", json!({"location": "SF"}));
        assert_eq!(validate_call(&signatures(), &act, &exp).unwrap(), None);
    }

    #[test]
    fn nested_element_type_error_is_reported() {
        let exp = expected(
            "get_weather",
            &[
                ("location", json!(["SF"])),
                ("samples", json!([[{"a": [1]}]])),
            ],
        );
        let act = actual(
            "get_weather",
            json!({"location": "SF", "samples": ["not a mapping"]}),
        );
        assert!(matches!(
            validate_call(&signatures(), &act, &exp).unwrap(),
            Some(Failure::TypeErrorNested { param, .. }) if param == "samples"
        ));
    }
}
