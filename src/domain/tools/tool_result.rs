//! Uniform outcome record for a tool invocation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use super::ToolInvocationRequest;
use crate::domain::foundation::ToolCallId;

/// Whether a tool invocation produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of exactly one tool invocation.
///
/// Unknown tools, rejected arguments, timeouts and tool failures all land
/// here as `status = error` with a readable message. Fields are private
/// and there are no setters, so a result cannot change once built.
///
/// # Invariants
///
/// - `output` is present only when `status` is `Success`
/// - `error_message` is present only when `status` is `Error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    call_id: ToolCallId,
    tool_name: String,
    arguments: Map<String, Value>,
    output: Option<String>,
    status: ToolStatus,
    error_message: Option<String>,
    #[serde(rename = "duration_ms", with = "duration_millis")]
    duration: Duration,
}

impl ToolResult {
    /// Records a successful invocation.
    pub fn success(
        request: &ToolInvocationRequest,
        output: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            arguments: request.arguments.clone(),
            output: Some(output.into()),
            status: ToolStatus::Success,
            error_message: None,
            duration,
        }
    }

    /// Records a failed invocation.
    pub fn failure(
        request: &ToolInvocationRequest,
        error_message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            arguments: request.arguments.clone(),
            output: None,
            status: ToolStatus::Error,
            error_message: Some(error_message.into()),
            duration,
        }
    }

    pub fn call_id(&self) -> &ToolCallId {
        &self.call_id
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn status(&self) -> ToolStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Duration in seconds rounded to milliseconds.
    pub fn execution_time_secs(&self) -> f64 {
        (self.duration.as_secs_f64() * 1000.0).round() / 1000.0
    }

    /// Text fed back to the model as the tool message.
    pub fn as_model_content(&self) -> String {
        match (&self.output, &self.error_message) {
            (Some(output), _) => output.clone(),
            (None, Some(message)) => format!("Error: {}", message),
            (None, None) => String::new(),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ToolInvocationRequest {
        ToolInvocationRequest::from_value("calculate", json!({"expression": "25 * 4"}))
    }

    #[test]
    fn success_carries_output_only() {
        let result = ToolResult::success(&request(), "25 * 4 = 100", Duration::from_millis(3));
        assert!(result.is_success());
        assert_eq!(result.output(), Some("25 * 4 = 100"));
        assert_eq!(result.error_message(), None);
        assert_eq!(result.tool_name(), "calculate");
        assert_eq!(result.arguments()["expression"], json!("25 * 4"));
    }

    #[test]
    fn failure_carries_message_only() {
        let result = ToolResult::failure(&request(), "timeout", Duration::from_secs(5));
        assert_eq!(result.status(), ToolStatus::Error);
        assert_eq!(result.output(), None);
        assert_eq!(result.error_message(), Some("timeout"));
    }

    #[test]
    fn keeps_request_call_id() {
        let request = request();
        let result = ToolResult::success(&request, "ok", Duration::ZERO);
        assert_eq!(result.call_id(), &request.call_id);
    }

    #[test]
    fn model_content_prefixes_errors() {
        let ok = ToolResult::success(&request(), "done", Duration::ZERO);
        let failed = ToolResult::failure(&request(), "Tool 'x' not found", Duration::ZERO);
        assert_eq!(ok.as_model_content(), "done");
        assert_eq!(failed.as_model_content(), "Error: Tool 'x' not found");
    }

    #[test]
    fn execution_time_rounds_to_milliseconds() {
        let result = ToolResult::success(&request(), "ok", Duration::from_micros(1_234_567));
        assert_eq!(result.execution_time_secs(), 1.235);
    }

    #[test]
    fn serializes_with_snake_case_status_and_millis() {
        let result = ToolResult::success(&request(), "ok", Duration::from_millis(42));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], json!("success"));
        assert_eq!(json["duration_ms"], json!(42));
        assert_eq!(json["error_message"], Value::Null);
    }

    #[test]
    fn status_displays_lowercase() {
        assert_eq!(ToolStatus::Error.to_string(), "error");
    }
}
