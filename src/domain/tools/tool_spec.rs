//! Model-facing description of a tool.

use serde::{Deserialize, Serialize};

/// Name, description and parameter schema exported to the model client.
///
/// Serializes to `{name, description, parameters}` where `parameters` is
/// the JSON-Schema object produced by
/// [`ParameterSchema::to_json`](super::ParameterSchema::to_json).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }

    /// Converts to the OpenAI `tools` entry format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ToolSpec {
        ToolSpec::new(
            "calculate",
            "Perform mathematical calculations",
            json!({
                "type": "object",
                "properties": {
                    "expression": {"type": "string", "description": "Expression"}
                },
                "required": ["expression"]
            }),
        )
    }

    #[test]
    fn serializes_with_exact_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let mut keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["description", "name", "parameters"]);
        assert_eq!(json["parameters"]["type"], json!("object"));
        assert_eq!(json["parameters"]["required"], json!(["expression"]));
    }

    #[test]
    fn openai_format_wraps_in_function() {
        let json = sample().to_openai_format();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "calculate");
        assert_eq!(json["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn deserializes_from_exported_shape() {
        let spec: ToolSpec = serde_json::from_value(serde_json::to_value(sample()).unwrap()).unwrap();
        assert_eq!(spec, sample());
    }
}
