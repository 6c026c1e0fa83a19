//! Tool registry file loader
//!
//! Reads [`ToolSchema`]s from disk. Two formats are understood, chosen by
//! file extension.
//!
//! # TOML
//!
//! ```toml
//! [[tools]]
//! name = "read_file"
//! description = "Read file contents"
//!
//! [[tools.parameters]]
//! name = "path"
//! type = "string"
//! required = true
//! ```
//!
//! # JSON
//!
//! Function definitions in the shape chat-completion APIs use, either wrapped
//! (`{"type": "function", "function": {...}}`) or bare
//! (`{"name", "description", "parameters": {"type": "object", ...}}`). The
//! top level may be an array, a single definition, or `{"tools": [...]}`.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolalign_domain::{ParamType, ToolHandle, ToolParameter, ToolSchema};
use tracing::debug;

/// Errors that can occur while loading a registry file
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML registry: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON registry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported registry format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Parameter '{parameter}' of tool '{tool}' has unsupported type '{type_name}'")]
    UnsupportedType {
        tool: String,
        parameter: String,
        type_name: String,
    },

    #[error("Malformed tool definition: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct TomlRegistry {
    #[serde(default)]
    tools: Vec<TomlTool>,
}

#[derive(Debug, Deserialize)]
struct TomlTool {
    name: String,
    #[serde(default)]
    description: String,
    handle: Option<String>,
    #[serde(default)]
    parameters: Vec<TomlParameter>,
}

#[derive(Debug, Deserialize)]
struct TomlParameter {
    name: String,
    #[serde(rename = "type", default = "default_type")]
    param_type: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    description: String,
}

fn default_type() -> String {
    "string".to_string()
}

/// Loads tool schemas from TOML or JSON registry files
pub struct RegistryFileLoader;

impl RegistryFileLoader {
    /// Load a registry file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Vec<ToolSchema>, RegistryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let tools = match extension.as_deref() {
            Some("toml") => Self::parse_toml(&content)?,
            Some("json") => Self::parse_json(&content)?,
            _ => return Err(RegistryLoadError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!("Loaded {} tool(s) from {}", tools.len(), path.display());
        Ok(tools)
    }

    pub fn parse_toml(content: &str) -> Result<Vec<ToolSchema>, RegistryLoadError> {
        let registry: TomlRegistry = toml::from_str(content)?;

        registry
            .tools
            .into_iter()
            .map(|tool| {
                let mut schema = ToolSchema::new(tool.name.as_str()).with_description(tool.description);
                if let Some(handle) = tool.handle {
                    schema = schema.with_handle(ToolHandle::new(handle));
                }
                for param in tool.parameters {
                    let param_type = parse_type(&tool.name, &param.name, &param.param_type)?;
                    schema = schema.with_parameter(
                        ToolParameter::new(param.name, param_type, param.required)
                            .with_description(param.description),
                    );
                }
                Ok(schema)
            })
            .collect()
    }

    pub fn parse_json(content: &str) -> Result<Vec<ToolSchema>, RegistryLoadError> {
        let root: Value = serde_json::from_str(content)?;

        let definitions = match root {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("tools") {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(RegistryLoadError::Malformed(
                        "\"tools\" must be an array".to_string(),
                    ));
                }
                None => vec![Value::Object(map)],
            },
            _ => {
                return Err(RegistryLoadError::Malformed(
                    "expected an array of tool definitions".to_string(),
                ));
            }
        };

        definitions.iter().map(json_tool).collect()
    }
}

/// Convert one function definition into a schema
fn json_tool(definition: &Value) -> Result<ToolSchema, RegistryLoadError> {
    // unwrap the {"type": "function", "function": {...}} envelope
    let function = match definition.get("function") {
        Some(inner) if definition.get("type").and_then(Value::as_str) == Some("function") => inner,
        _ => definition,
    };

    let name = function
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RegistryLoadError::Malformed("tool definition without a name".to_string()))?;

    let mut schema = ToolSchema::new(name);
    if let Some(description) = function.get("description").and_then(Value::as_str) {
        schema = schema.with_description(description);
    }

    let Some(parameters) = function.get("parameters") else {
        return Ok(schema);
    };

    let required: Vec<&str> = parameters
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if let Some(properties) = parameters.get("properties").and_then(Value::as_object) {
        for (param_name, property) in properties {
            let type_name = json_type_name(property);
            let param_type = parse_type(name, param_name, &type_name)?;
            let mut param =
                ToolParameter::new(param_name.as_str(), param_type, required.contains(&param_name.as_str()));
            if let Some(description) = property.get("description").and_then(Value::as_str) {
                param = param.with_description(description);
            }
            schema = schema.with_parameter(param);
        }
    }

    Ok(schema)
}

/// JSON Schema `type` of a property
///
/// `["string", "null"]` unions reduce to their first non-null member and an
/// absent type reads as `string`.
fn json_type_name(property: &Value) -> String {
    match property.get("type") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .unwrap_or("null")
            .to_string(),
        Some(other) => other.to_string(),
        None => default_type(),
    }
}

fn parse_type(tool: &str, parameter: &str, type_name: &str) -> Result<ParamType, RegistryLoadError> {
    type_name
        .parse::<ParamType>()
        .map_err(|_| RegistryLoadError::UnsupportedType {
            tool: tool.to_string(),
            parameter: parameter.to_string(),
            type_name: type_name.to_string(),
        })
}
