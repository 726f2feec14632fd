//! Actual tool calls, extracted from the model output's metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CheckError, Result};
use crate::normalize::decode_arguments;

/// One tool call as reported in the model's output metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualCall {
    /// Name the model invoked.
    pub function_name: String,
    /// Arguments the model supplied.
    pub arguments: BTreeMap<String, Value>,
}

/// Actual calls in the order the model reported them. The order is
/// semantically meaningful only under strict-order matching.
pub type ActualCallSequence = Vec<ActualCall>;

impl ActualCall {
    fn from_entry(index: usize, entry: &Value) -> Result<Self> {
        let function = entry
            .get("function")
            .and_then(Value::as_object)
            .ok_or_else(|| CheckError::MalformedToolCall {
                index,
                reason: "missing function mapping".to_string(),
            })?;

        let function_name = function
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| CheckError::MalformedToolCall {
                index,
                reason: "missing function name".to_string(),
            })?
            .to_string();

        let arguments = decode_arguments(index, function.get("arguments"))?;

        Ok(Self {
            function_name,
            arguments,
        })
    }
}

/// Extract the actual call sequence from a metadata mapping.
///
/// The metadata must carry `tool_calls`, a sequence of
/// `{"function": {"name": ..., "arguments": ...}}` entries.
pub fn extract_tool_calls(metadata: &Value) -> Result<ActualCallSequence> {
    let entries = metadata
        .get("tool_calls")
        .and_then(Value::as_array)
        .ok_or(CheckError::MissingToolCalls)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ActualCall::from_entry(index, entry))
        .collect()
}
