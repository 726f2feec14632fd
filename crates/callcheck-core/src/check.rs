//! Harness boundary: the uniform check signature the execution harness
//! invokes per scenario row, and the persisted verdict artifact.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::calls::extract_tool_calls;
use crate::error::Result;
use crate::expectation::ExpectedCallSet;
use crate::explain::explain;
use crate::matcher::match_calls;
use crate::normalize::{lenient_value, unwrap_function_envelope};
use crate::schema::SignatureSet;
use crate::verdict::{CallFailure, ConformanceVerdict, Failure};

/// The four scenario-row strings plus metadata, as supplied by the harness.
///
/// `model_output` and `model_input` are part of the uniform check signature
/// but unused here — tool calls come from the metadata.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub model_output: &'a str,
    pub model_input: &'a str,
    /// Function-description payload, optionally `{"function": ...}`-wrapped.
    pub scenario_input: &'a str,
    /// Expected-call specification.
    pub scenario_result: &'a str,
    /// Model-output metadata carrying `tool_calls`.
    pub metadata: &'a Value,
}

/// Scored outcome returned to the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the actual calls conform.
    pub score: bool,
    /// Human-readable explanation of the verdict.
    pub explanation: String,
}

impl CheckOutcome {
    fn from_verdict(verdict: &ConformanceVerdict) -> Self {
        Self {
            score: verdict.valid(),
            explanation: explain(verdict),
        }
    }
}

/// Evaluate one scenario row down to a structured verdict.
///
/// Hard authoring errors propagate; everything else resolves to a
/// [`ConformanceVerdict`].
pub fn evaluate(
    scenario_input: &str,
    scenario_result: &str,
    metadata: &Value,
) -> Result<ConformanceVerdict> {
    let descriptions = unwrap_function_envelope(lenient_value(scenario_input));
    let Some(signatures) = SignatureSet::parse(&descriptions)? else {
        return Ok(ConformanceVerdict::fail(vec![CallFailure {
            position: 0,
            failure: Failure::NoFunctionDescriptions,
        }]));
    };

    let expected = ExpectedCallSet::parse(scenario_result)?;
    let actual = extract_tool_calls(metadata)?;
    match_calls(&signatures, &expected, &actual)
}

/// Run the check with the uniform harness signature.
pub fn run_check(input: &CheckInput<'_>) -> Result<CheckOutcome> {
    let _ = (input.model_output, input.model_input);
    let verdict = evaluate(input.scenario_input, input.scenario_result, input.metadata)?;
    Ok(CheckOutcome::from_verdict(&verdict))
}

// ---------------------------------------------------------------------------
// Verdict artifact
// ---------------------------------------------------------------------------

/// Canonical verdict artifact persisted for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub score: bool,
    /// Canonical error-kind string of the first failure, if any.
    pub failure_code: Option<String>,
    pub explanation: String,
}

impl VerdictArtifact {
    /// Build the artifact for a verdict, stamped with the current time.
    pub fn from_verdict(verdict: &ConformanceVerdict) -> Self {
        Self {
            schema_version: "1".to_string(),
            generated_at: Utc::now(),
            score: verdict.valid(),
            failure_code: verdict.code().map(str::to_string),
            explanation: explain(verdict),
        }
    }
}

/// Write the verdict artifact as pretty JSON.
pub fn write_verdict_json(path: &Path, artifact: &VerdictArtifact) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize verdict artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_check_scores_a_conforming_row() {
        let metadata = json!({
            "tool_calls": [
                {"function": {"name": "get_weather", "arguments": {"location": "san-francisco ca"}}}
            ]
        });
        let input = CheckInput {
            model_output: "",
            model_input: "",
            scenario_input: r#"[{"name":"get_weather","parameters":{"properties":{"location":{"type":"string"}},"required":["location"]}}]"#,
            scenario_result: r#"[{"name":"get_weather","arguments":{"location":["San Francisco, CA"]}}]"#,
            metadata: &metadata,
        };
        let outcome = run_check(&input).unwrap();
        assert!(outcome.score, "explanation: {}", outcome.explanation);
    }

    #[test]
    fn non_description_payload_scores_false_with_explanation() {
        let metadata = json!({"tool_calls": []});
        let input = CheckInput {
            model_output: "",
            model_input: "",
            scenario_input: "just some prose",
            scenario_result: "[]",
            metadata: &metadata,
        };
        let outcome = run_check(&input).unwrap();
        assert!(!outcome.score);
        assert!(outcome.explanation.contains("no function descriptions"));
    }

    #[test]
    fn verdict_artifact_round_trips_through_json() {
        let verdict = ConformanceVerdict::pass();
        let artifact = VerdictArtifact::from_verdict(&verdict);
        assert!(artifact.score);
        assert_eq!(artifact.failure_code, None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdict.json");
        write_verdict_json(&path, &artifact).unwrap();
        let loaded: VerdictArtifact =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, artifact);
    }
}
