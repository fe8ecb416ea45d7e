//! Request from the model to run one tool.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ToolCallId;

/// A single tool call as produced by the model client.
///
/// `arguments` is untrusted: it is only ever read through the tool's
/// parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub call_id: ToolCallId,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolInvocationRequest {
    /// Creates a request with a freshly generated call id.
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            call_id: ToolCallId::new(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Builds a request from a JSON value; anything but an object becomes
    /// an empty argument map.
    pub fn from_value(tool_name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(tool_name, arguments)
    }

    /// Keeps the id the model assigned so results can be correlated.
    pub fn with_call_id(mut self, call_id: ToolCallId) -> Self {
        self.call_id = call_id;
        self
    }
}
