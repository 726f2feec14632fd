//! Expected-call specifications: which call(s) the scenario author accepts.
//!
//! The scenario's expected-result text is either the current format —
//! `{"function_calls": [...], "strict_function_order": bool}` — or the
//! legacy format where the payload itself is the call sequence. Each
//! argument carries a *set* of acceptable values; the empty string among
//! them marks the parameter optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CheckError, Result};
use crate::normalize::lenient_value;

/// One acceptable tool call, with per-parameter accepted-value sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedCall {
    /// Name of the function the model is expected to call.
    pub function_name: String,
    /// Accepted values per parameter. A list containing `""` marks the
    /// parameter optional.
    pub accepted_arguments: BTreeMap<String, Vec<Value>>,
}

/// The full expectation for one scenario row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedCallSet {
    /// Expected calls, in authored order.
    pub calls: Vec<ExpectedCall>,
    /// When true, actual calls must align positionally with `calls`.
    pub strict_order: bool,
}

/// View an authored argument value as its list of acceptable alternatives.
///
/// A JSON array *is* the alternatives list; anything else is a single
/// alternative.
pub fn accepted_alternatives(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    }
}

/// Whether an accepted-value list tolerates the parameter being absent.
pub fn is_optional(accepted: &[Value]) -> bool {
    accepted.iter().any(|v| v.as_str() == Some(""))
}

impl ExpectedCall {
    fn from_value(index: usize, value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or(CheckError::ExpectedCallMissingName { index })?;
        let function_name = map
            .get("name")
            .and_then(Value::as_str)
            .ok_or(CheckError::ExpectedCallMissingName { index })?
            .to_string();

        let mut accepted_arguments = BTreeMap::new();
        if let Some(arguments) = map.get("arguments").and_then(Value::as_object) {
            for (param, authored) in arguments {
                accepted_arguments
                    .insert(param.clone(), accepted_alternatives(authored).to_vec());
            }
        }

        Ok(Self {
            function_name,
            accepted_arguments,
        })
    }
}

impl ExpectedCallSet {
    /// Parse the scenario's expected-result text.
    pub fn parse(raw: &str) -> Result<Self> {
        let value = lenient_value(raw);

        let (calls_value, strict_order) = match &value {
            Value::Object(map) if map.contains_key("function_calls") => {
                let strict = map
                    .get("strict_function_order")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                (map.get("function_calls").cloned().unwrap_or(Value::Null), strict)
            }
            other => (other.clone(), false),
        };

        let entries = match calls_value {
            Value::Array(items) => items,
            // Legacy: a lone {name, arguments} mapping is a one-call sequence.
            Value::Object(map) if map.contains_key("name") => vec![Value::Object(map)],
            _ => return Err(CheckError::ExpectedCallsNotSequence),
        };

        let calls = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ExpectedCall::from_value(i, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { calls, strict_order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_format_parses_calls_and_order_flag() {
        let raw = json!({
            "function_calls": [
                {"name": "get_weather", "arguments": {"location": ["SF", "San Francisco"]}}
            ],
            "strict_function_order": true
        })
        .to_string();

        let set = ExpectedCallSet::parse(&raw).unwrap();
        assert!(set.strict_order);
        assert_eq!(set.calls.len(), 1);
        assert_eq!(
            set.calls[0].accepted_arguments.get("location"),
            Some(&vec![json!("SF"), json!("San Francisco")])
        );
    }

    #[test]
    fn strict_order_defaults_to_false() {
        let raw = json!({"function_calls": [{"name": "f"}]}).to_string();
        assert!(!ExpectedCallSet::parse(&raw).unwrap().strict_order);
    }

    #[test]
    fn legacy_bare_sequence_parses() {
        let raw = json!([{"name": "f", "arguments": {"x": 1}}]).to_string();
        let set = ExpectedCallSet::parse(&raw).unwrap();
        assert_eq!(set.calls.len(), 1);
        // Scalars are wrapped into one-element accepted sets.
        assert_eq!(
            set.calls[0].accepted_arguments.get("x"),
            Some(&vec![json!(1)])
        );
    }

    #[test]
    fn legacy_lone_mapping_is_a_one_call_sequence() {
        let raw = json!({"name": "f", "arguments": {}}).to_string();
        let set = ExpectedCallSet::parse(&raw).unwrap();
        assert_eq!(set.calls[0].function_name, "f");
    }

    #[test]
    fn non_sequence_payload_is_a_hard_error() {
        assert!(matches!(
            ExpectedCallSet::parse("\"just text\""),
            Err(CheckError::ExpectedCallsNotSequence)
        ));
    }

    #[test]
    fn call_without_name_is_a_hard_error() {
        let raw = json!([{"arguments": {}}]).to_string();
        assert!(matches!(
            ExpectedCallSet::parse(&raw),
            Err(CheckError::ExpectedCallMissingName { index: 0 })
        ));
    }

    #[test]
    fn empty_string_alternative_marks_optional() {
        assert!(is_optional(&[json!(""), json!("SF")]));
        assert!(!is_optional(&[json!("SF")]));
    }
}
