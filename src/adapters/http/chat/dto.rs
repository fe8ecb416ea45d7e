//! Data transfer objects for the chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::HandleMessageResult;
use crate::domain::foundation::Timestamp;
use crate::domain::tools::{ToolResult, ToolStatus};

/// Request to send a message to the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Client-chosen id echoed back; generated when absent
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// One tool invocation made while answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUsage {
    pub tool_name: String,
    pub parameters: Map<String, Value>,
    pub result: Option<String>,
    pub status: ToolStatus,
    /// Seconds, rounded to milliseconds
    pub execution_time: f64,
    pub error_message: Option<String>,
}

impl From<&ToolResult> for ToolUsage {
    fn from(result: &ToolResult) -> Self {
        Self {
            tool_name: result.tool_name().to_string(),
            parameters: result.arguments().clone(),
            result: result.output().map(String::from),
            status: result.status(),
            execution_time: result.execution_time_secs(),
            error_message: result.error_message().map(String::from),
        }
    }
}

/// The agent's answer plus the tools it used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub tool_usage: Vec<ToolUsage>,
    pub timestamp: Timestamp,
}

impl From<HandleMessageResult> for ChatResponse {
    fn from(result: HandleMessageResult) -> Self {
        Self {
            response: result.response,
            conversation_id: result.conversation_id.to_string(),
            tool_usage: result.tool_usage.iter().map(ToolUsage::from).collect(),
            timestamp: result.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ToolInvocationRequest;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn chat_request_conversation_id_is_optional() {
        let request: ChatRequest =
            serde_json::from_value(json!({"message": "What is 25 * 4?"})).unwrap();
        assert_eq!(request.message, "What is 25 * 4?");
        assert!(request.conversation_id.is_none());
    }

    #[test]
    fn tool_usage_keeps_error_details() {
        let request =
            ToolInvocationRequest::from_value("get_weather", json!({"city": "Atlantis"}));
        let result = ToolResult::failure(&request, "City 'Atlantis' not found.", Duration::from_millis(42));

        let usage = serde_json::to_value(ToolUsage::from(&result)).unwrap();

        assert_eq!(usage["tool_name"], "get_weather");
        assert_eq!(usage["parameters"], json!({"city": "Atlantis"}));
        assert!(usage["result"].is_null());
        assert_eq!(usage["status"], "error");
        assert_eq!(usage["execution_time"], 0.042);
        assert_eq!(usage["error_message"], "City 'Atlantis' not found.");
    }
}
