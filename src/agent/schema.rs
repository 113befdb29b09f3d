//! Tool descriptors: name, description, and typed parameter schema.
//!
//! A descriptor is built once at startup, validated, and then converted to
//! the wire format the chat-completions API expects. The one structural
//! invariant is that every required parameter is actually declared.

use crate::error::{Result, SvarError};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde_json::{json, Map, Value};

/// Primitive parameter types understood by the reasoning process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamType {
    fn as_json_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

/// A single named parameter in a tool schema.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
}

impl ParamSpec {
    pub fn new(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
        }
    }
}

/// An immutable tool descriptor.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    required: Vec<String>,
}

impl ToolSpec {
    /// Create a tool descriptor.
    ///
    /// Fails if any name in `required` is not among the declared parameters.
    pub fn new(
        name: &str,
        description: &str,
        params: Vec<ParamSpec>,
        required: Vec<String>,
    ) -> Result<Self> {
        for req in &required {
            if !params.iter().any(|p| &p.name == req) {
                return Err(SvarError::ToolSchema(format!(
                    "Tool '{}' requires undeclared parameter '{}'",
                    name, req
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            params,
            required,
        })
    }

    /// The tool's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The natural-language description the reasoning process reads.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Build the JSON object schema for the parameters.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.param_type.as_json_type(),
                    "description": param.description,
                }),
            );
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }

    /// Convert to the chat-completions tool format.
    pub fn to_chat_tool(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.name.clone(),
                description: Some(self.description.clone()),
                parameters: Some(self.parameters_schema()),
                strict: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_subset_accepted() {
        let spec = ToolSpec::new(
            "add",
            "Add two numbers",
            vec![
                ParamSpec::new("a", ParamType::Number, "First addend"),
                ParamSpec::new("b", ParamType::Number, "Second addend"),
            ],
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(spec.is_ok());
    }

    #[test]
    fn test_undeclared_required_rejected() {
        let spec = ToolSpec::new(
            "add",
            "Add two numbers",
            vec![ParamSpec::new("a", ParamType::Number, "First addend")],
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(spec.is_err());
    }

    #[test]
    fn test_parameters_schema_shape() {
        let spec = ToolSpec::new(
            "search_documents",
            "Search",
            vec![
                ParamSpec::new("query", ParamType::String, "The search query"),
                ParamSpec::new("limit", ParamType::Integer, "Max results"),
            ],
            vec!["query".to_string()],
        )
        .unwrap();

        let schema = spec.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_no_params_tool() {
        let spec = ToolSpec::new("list_documents", "List sources", vec![], vec![]).unwrap();
        let schema = spec.parameters_schema();
        assert_eq!(schema["properties"], serde_json::json!({}));
    }
}
