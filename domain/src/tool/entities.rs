//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

/// Declared primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = String;

    /// Accepts the JSON Schema names plus the spellings schema authors commonly use
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "path" => Ok(ParamType::String),
            "number" | "float" | "double" => Ok(ParamType::Number),
            "integer" | "int" => Ok(ParamType::Integer),
            "boolean" | "bool" => Ok(ParamType::Boolean),
            "array" | "list" => Ok(ParamType::Array),
            "object" | "map" | "dict" => Ok(ParamType::Object),
            other => Err(format!("Unsupported parameter type: {}", other)),
        }
    }
}

/// Opaque handle the executing collaborator uses to dispatch a resolved tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolHandle(String);

impl ToolHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Declared type; values are coerced to it during alignment
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
    /// Parameter description
    #[serde(default)]
    pub description: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, param_type: ParamType, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type,
            required,
            description: String::new(),
        }
    }

    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(name, param_type, true)
    }

    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(name, param_type, false)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Schema of a tool known to the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Canonical tool name (e.g., "create_script")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Parameter specifications, in declaration order
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Explicit dispatch handle; defaults to the canonical name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<ToolHandle>,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            handle: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_handle(mut self, handle: ToolHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Handle passed to the executing collaborator
    pub fn handle(&self) -> ToolHandle {
        self.handle
            .clone()
            .unwrap_or_else(|| ToolHandle::new(self.name.clone()))
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

/// A tool invocation as emitted by a model, before alignment
///
/// Nothing about it is trusted: the name may be misspelled, keys may be
/// near-misses or hallucinated, and values may carry the wrong JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireToolCall")]
pub struct RawToolCall {
    /// Name of the tool the model asked for
    pub name: String,
    /// Arguments keyed by the names the model used
    pub arguments: HashMap<String, Value>,
    /// An `arguments` string that did not hold a JSON object
    ///
    /// The call then carries no arguments; alignment reports the text in an
    /// `UnparsedArguments` diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unparsed_arguments: Option<String>,
}

impl RawToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            unparsed_arguments: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// Shape accepted on the wire
///
/// Arguments may be a JSON object, a string holding a JSON object (the
/// OpenAI wire shape), or null.
#[derive(Deserialize)]
struct WireToolCall {
    name: String,
    #[serde(default, alias = "args", alias = "parameters", alias = "input")]
    arguments: Value,
    #[serde(default)]
    unparsed_arguments: Option<String>,
}

impl TryFrom<WireToolCall> for RawToolCall {
    type Error = String;

    fn try_from(wire: WireToolCall) -> Result<Self, Self::Error> {
        let mut call = RawToolCall::new(wire.name);
        call.unparsed_arguments = wire.unparsed_arguments;

        match wire.arguments {
            Value::Null => {}
            Value::Object(map) => call.arguments = map.into_iter().collect(),
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Object(map)) => call.arguments = map.into_iter().collect(),
                _ => call.unparsed_arguments = Some(s),
            },
            other => {
                return Err(format!(
                    "arguments must be an object, got {}",
                    crate::alignment::coercion::value_kind(&other)
                ));
            }
        }
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_type_from_str() {
        assert_eq!("string".parse::<ParamType>(), Ok(ParamType::String));
        assert_eq!(" Integer ".parse::<ParamType>(), Ok(ParamType::Integer));
        assert_eq!("bool".parse::<ParamType>(), Ok(ParamType::Boolean));
        assert_eq!("list".parse::<ParamType>(), Ok(ParamType::Array));
        assert!("tuple".parse::<ParamType>().is_err());
    }

    #[test]
    fn test_param_type_serde() {
        let ty: ParamType = serde_json::from_value(json!("boolean")).unwrap();
        assert_eq!(ty, ParamType::Boolean);
        assert_eq!(serde_json::to_value(ParamType::Array).unwrap(), json!("array"));
    }

    #[test]
    fn test_tool_schema() {
        let tool = ToolSchema::new("create_script")
            .with_description("Create a script file")
            .with_parameter(ToolParameter::required("path", ParamType::String))
            .with_parameter(ToolParameter::optional("args", ParamType::Array));

        assert_eq!(tool.name, "create_script");
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.parameter("path").unwrap().param_type, ParamType::String);
        assert!(tool.parameter("pathh").is_none());
        assert_eq!(tool.required_parameters().count(), 1);
        assert_eq!(
            tool.parameter_names().collect::<Vec<_>>(),
            vec!["path", "args"]
        );
    }

    #[test]
    fn test_handle_defaults_to_name() {
        let tool = ToolSchema::new("read_file");
        assert_eq!(tool.handle().as_str(), "read_file");

        let tool = ToolSchema::new("read_file").with_handle(ToolHandle::new("fs.read"));
        assert_eq!(tool.handle().as_str(), "fs.read");
    }

    #[test]
    fn test_raw_call_builder() {
        let call = RawToolCall::new("creat_script")
            .with_arg("pathh", "main.py")
            .with_arg("args", json!(["-v"]));

        assert_eq!(call.name, "creat_script");
        assert_eq!(call.arguments.get("pathh"), Some(&json!("main.py")));
        assert_eq!(call.arguments.len(), 2);
        assert!(call.unparsed_arguments.is_none());
    }

    #[test]
    fn test_raw_call_deserialize_aliases() {
        let call: RawToolCall =
            serde_json::from_value(json!({"name": "creat_script", "args": {"pathh": "main.py"}}))
                .unwrap();
        assert_eq!(call.arguments.get("pathh"), Some(&json!("main.py")));

        let call: RawToolCall =
            serde_json::from_value(json!({"name": "read_file"})).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_raw_call_deserialize_string_arguments() {
        let call: RawToolCall = serde_json::from_value(json!({
            "name": "read_file",
            "arguments": "{\"path\": \"src/main.rs\"}"
        }))
        .unwrap();
        assert_eq!(call.arguments.get("path"), Some(&json!("src/main.rs")));

        let result = serde_json::from_value::<RawToolCall>(json!({
            "name": "read_file",
            "arguments": true
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<RawToolCall>(json!({
            "name": "read_file",
            "arguments": 7
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_call_keeps_unparseable_argument_string() {
        let call: RawToolCall = serde_json::from_value(json!({
            "name": "read_file",
            "arguments": "path=src/main.rs"
        }))
        .unwrap();
        assert!(call.arguments.is_empty());
        assert_eq!(call.unparsed_arguments.as_deref(), Some("path=src/main.rs"));

        let call: RawToolCall = serde_json::from_value(json!({
            "name": "read_file",
            "arguments": "[1, 2]"
        }))
        .unwrap();
        assert!(call.arguments.is_empty());
        assert_eq!(call.unparsed_arguments.as_deref(), Some("[1, 2]"));
    }

    #[test]
    fn test_raw_call_serializes_without_unparsed_field() {
        let call = RawToolCall::new("read_file").with_arg("path", "a.rs");
        let value = serde_json::to_value(&call).unwrap();
        assert!(value.get("unparsed_arguments").is_none());

        let back: RawToolCall = serde_json::from_value(value).unwrap();
        assert_eq!(back, call);
    }
}
