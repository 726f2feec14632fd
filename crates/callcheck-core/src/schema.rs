//! Function descriptors: the machine-readable declarations of what a model
//! was allowed to call.
//!
//! Descriptions arrive as a JSON-Schema-like payload — either a list of
//! `{name, parameters: {properties, required}}` mappings (multi-function
//! mode) or a single such mapping (legacy single-function mode, where the
//! one signature applies to every call).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CheckError, Result};

/// Declared parameter type in a function descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Tuple,
    Mapping,
    Object,
    Any,
}

impl ParamType {
    /// Map a descriptor `type` string to a [`ParamType`].
    ///
    /// Unrecognised names fall back to `Any`, matching the permissive
    /// typing of the descriptor format.
    pub fn parse(name: &str) -> Self {
        match name {
            "string" | "str" => ParamType::String,
            "integer" | "int" => ParamType::Integer,
            "float" | "number" => ParamType::Float,
            "boolean" | "bool" => ParamType::Boolean,
            "array" | "list" => ParamType::Array,
            "tuple" => ParamType::Tuple,
            "dict" | "mapping" => ParamType::Mapping,
            "object" => ParamType::Object,
            _ => ParamType::Any,
        }
    }

    /// Canonical descriptor name for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Tuple => "tuple",
            ParamType::Mapping => "dict",
            ParamType::Object => "object",
            ParamType::Any => "any",
        }
    }
}

/// One parameter declaration within a function descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Declared parameter type.
    pub declared: ParamType,
    /// Declared element type, from `items.type` (arrays/tuples).
    pub element: Option<ParamType>,
}

/// A single function's declared interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Function name as declared.
    pub name: String,
    /// Parameter declarations keyed by parameter name.
    pub parameters: BTreeMap<String, ParameterSpec>,
    /// Names of parameters that must be present in every call.
    pub required: Vec<String>,
}

/// The set of signatures available to an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignatureSet {
    /// Legacy single-function mode: one signature applies to every call.
    Single(FunctionSignature),
    /// Multi-function mode: signatures looked up by name.
    Many(Vec<FunctionSignature>),
}

/// Normalize a function name for comparison. Dotted tool-namespacing
/// conventions (`web.search`) are equivalent to underscores (`web_search`).
pub fn canonical_name(name: &str) -> String {
    name.replace('.', "_")
}

impl FunctionSignature {
    /// Build a signature from one descriptor mapping.
    ///
    /// Missing `name` or `parameters` keys are hard errors — the descriptor
    /// was mis-authored, not the model.
    pub fn from_descriptor(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or(CheckError::DescriptorNotMapping)?;

        let name = map
            .get("name")
            .and_then(Value::as_str)
            .ok_or(CheckError::DescriptorMissingField { field: "name" })?
            .to_string();

        let params = map
            .get("parameters")
            .and_then(Value::as_object)
            .ok_or(CheckError::DescriptorMissingField { field: "parameters" })?;

        let mut parameters = BTreeMap::new();
        if let Some(properties) = params.get("properties").and_then(Value::as_object) {
            for (param_name, prop) in properties {
                parameters.insert(param_name.clone(), ParameterSpec::from_property(prop));
            }
        }

        let required = params
            .get("required")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name,
            parameters,
            required,
        })
    }
}

impl ParameterSpec {
    fn from_property(prop: &Value) -> Self {
        let declared = prop
            .get("type")
            .and_then(Value::as_str)
            .map(ParamType::parse)
            .unwrap_or(ParamType::Any);
        let element = prop
            .get("items")
            .and_then(|items| items.get("type"))
            .and_then(Value::as_str)
            .map(ParamType::parse);
        Self { declared, element }
    }
}

impl SignatureSet {
    /// Parse a normalized description payload.
    ///
    /// Returns `Ok(None)` when the payload is neither a sequence nor a
    /// mapping — the caller reports that as the semantic
    /// `no_function_descriptions` verdict rather than a hard error.
    pub fn parse(descriptions: &Value) -> Result<Option<Self>> {
        match descriptions {
            Value::Array(items) => {
                let signatures = items
                    .iter()
                    .map(FunctionSignature::from_descriptor)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(SignatureSet::Many(signatures)))
            }
            Value::Object(_) => Ok(Some(SignatureSet::Single(
                FunctionSignature::from_descriptor(descriptions)?,
            ))),
            _ => Ok(None),
        }
    }

    /// Resolve the signature for an expected call's function name.
    ///
    /// In single-function mode the one signature always applies. In
    /// multi-function mode an unresolvable name is a hard error: the
    /// expectation references a function nobody described.
    pub fn resolve(&self, function_name: &str) -> Result<&FunctionSignature> {
        match self {
            SignatureSet::Single(signature) => Ok(signature),
            SignatureSet::Many(signatures) => {
                let wanted = canonical_name(function_name);
                signatures
                    .iter()
                    .find(|s| canonical_name(&s.name) == wanted)
                    .ok_or_else(|| CheckError::UnknownFunction {
                        name: function_name.to_string(),
                    })
            }
        }
    }
}
