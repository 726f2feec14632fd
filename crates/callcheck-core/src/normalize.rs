//! Best-effort normalization of raw textual inputs into [`serde_json::Value`].
//!
//! Scenario fields arrive as strings that are *usually* JSON but sometimes
//! plain text; parsing is therefore an explicit fallible-parse-then-fallback
//! step. All "is this JSON?" uncertainty is isolated here — downstream
//! modules only ever see structured values.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CheckError, Result};

/// Parse `raw` as JSON; on failure, return the original text as a string
/// value. Never errors — some scenario fields are genuinely plain text.
pub fn lenient_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Unwrap the optional `{"function": <descriptions>}` envelope around a
/// function-description payload. Values without the envelope pass through.
pub fn unwrap_function_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("function") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Decode a tool call's `arguments` field into a parameter mapping.
///
/// Providers report arguments either as a JSON object or as a JSON-encoded
/// string; a string gets a secondary decode. Anything that does not end up
/// a mapping is a malformed tool call.
pub fn decode_arguments(index: usize, arguments: Option<&Value>) -> Result<BTreeMap<String, Value>> {
    let decoded = match arguments {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(map)) => Value::Object(map.clone()),
        Some(Value::String(raw)) => lenient_value(raw),
        Some(_) => Value::Null,
    };

    match decoded {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(CheckError::MalformedToolCall {
            index,
            reason: "arguments is neither a mapping nor a JSON-encoded mapping".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_value_parses_json() {
        assert_eq!(lenient_value("{\"a\": 1}"), json!({"a": 1}));
        assert_eq!(lenient_value("[1, 2]"), json!([1, 2]));
    }

    #[test]
    fn lenient_value_falls_back_to_plain_text() {
        assert_eq!(
            lenient_value("not json at all"),
            Value::String("not json at all".to_string())
        );
    }

    #[test]
    fn envelope_is_unwrapped_when_present() {
        let wrapped = json!({"function": [{"name": "f"}]});
        assert_eq!(unwrap_function_envelope(wrapped), json!([{"name": "f"}]));

        let bare = json!({"name": "f", "parameters": {}});
        assert_eq!(unwrap_function_envelope(bare.clone()), bare);
    }

    #[test]
    fn string_arguments_get_secondary_decode() {
        let args = Value::String("{\"location\": \"SF\"}".to_string());
        let decoded = decode_arguments(0, Some(&args)).unwrap();
        assert_eq!(decoded.get("location"), Some(&json!("SF")));
    }

    #[test]
    fn non_mapping_arguments_are_malformed() {
        let args = Value::String("[1, 2]".to_string());
        let err = decode_arguments(3, Some(&args)).unwrap_err();
        assert!(matches!(
            err,
            CheckError::MalformedToolCall { index: 3, .. }
        ));
    }

    #[test]
    fn absent_arguments_mean_empty_mapping() {
        assert!(decode_arguments(0, None).unwrap().is_empty());
        assert!(decode_arguments(0, Some(&Value::Null)).unwrap().is_empty());
    }
}
