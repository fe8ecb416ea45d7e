//! Data transfer objects for tools HTTP endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ListToolsResult;
use crate::domain::tools::{ToolResult, ToolSpec, ToolStatus};

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Request to run a tool directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteToolRequest {
    /// Name of the tool to execute
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// A registered tool and its parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's parameters
    pub parameters: Value,
}

impl From<ToolSpec> for ToolInfo {
    fn from(spec: ToolSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            description: spec.description().to_string(),
            parameters: spec.parameters().clone(),
        }
    }
}

/// Response with all available tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolInfo>,
    pub total_count: usize,
}

impl From<ListToolsResult> for ListToolsResponse {
    fn from(result: ListToolsResult) -> Self {
        Self {
            tools: result.tools.into_iter().map(ToolInfo::from).collect(),
            total_count: result.total_count,
        }
    }
}

/// Response from running a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteToolResponse {
    pub tool_name: String,
    /// Arguments the tool was called with
    pub parameters: Map<String, Value>,
    /// Tool output, empty on failure
    pub result: String,
    pub status: ToolStatus,
    /// Wall-clock execution time in seconds
    pub execution_time: f64,
    pub error_message: Option<String>,
}

impl From<ToolResult> for ExecuteToolResponse {
    fn from(result: ToolResult) -> Self {
        Self {
            tool_name: result.tool_name().to_string(),
            parameters: result.arguments().clone(),
            result: result.output().unwrap_or_default().to_string(),
            status: result.status(),
            execution_time: result.execution_time_secs(),
            error_message: result.error_message().map(String::from),
        }
    }
}
