//! HTTP handlers for tools endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::application::{
    ExecuteToolCommand, ExecuteToolHandler, GetToolHandler, GetToolQuery, ListToolsHandler,
    ToolExecutor,
};

use super::dto::{ExecuteToolRequest, ExecuteToolResponse, ListToolsResponse, ToolInfo};
use crate::adapters::http::error::ApiError;

/// Application state for tools endpoints.
#[derive(Clone)]
pub struct ToolsAppState {
    /// Executor wrapping the tool registry
    pub executor: Arc<ToolExecutor>,
}

impl ToolsAppState {
    pub fn new(executor: Arc<ToolExecutor>) -> Self {
        Self { executor }
    }

    pub fn list_tools_handler(&self) -> ListToolsHandler {
        ListToolsHandler::new(self.executor.registry().clone())
    }

    pub fn get_tool_handler(&self) -> GetToolHandler {
        GetToolHandler::new(self.executor.registry().clone())
    }

    pub fn execute_tool_handler(&self) -> ExecuteToolHandler {
        ExecuteToolHandler::new(self.executor.clone())
    }
}

/// GET /api/tools - List every registered tool
pub async fn list_tools(State(state): State<ToolsAppState>) -> impl IntoResponse {
    let result = state.list_tools_handler().handle();
    Json(ListToolsResponse::from(result))
}

/// GET /api/tools/:name - Describe one tool
pub async fn get_tool(
    State(state): State<ToolsAppState>,
    Path(tool_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let spec = state.get_tool_handler().handle(GetToolQuery { tool_name })?;
    Ok(Json(ToolInfo::from(spec)))
}

/// POST /api/tools/execute - Run one tool outside a chat turn
///
/// Tool failures still answer 200 with `status = "error"`; only an unknown
/// tool name is a 404.
pub async fn execute_tool(
    State(state): State<ToolsAppState>,
    Json(request): Json<ExecuteToolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(tool = %request.tool_name, "direct tool execution");

    let result = state
        .execute_tool_handler()
        .handle(ExecuteToolCommand {
            tool_name: request.tool_name,
            parameters: request.parameters,
        })
        .await?;

    Ok(Json(ExecuteToolResponse::from(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tools::{CalculatorTool, ScriptedTool};
    use crate::application::ToolRegistry;
    use crate::domain::tools::ToolStatus;
    use axum::http::StatusCode;
    use serde_json::json;

    fn test_state() -> ToolsAppState {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(CalculatorTool::new()))
            .unwrap()
            .with_tool(Arc::new(ScriptedTool::new("echo").with_output("pong")))
            .unwrap();
        ToolsAppState::new(Arc::new(ToolExecutor::new(Arc::new(registry))))
    }

    fn execute_request(tool_name: &str, parameters: serde_json::Value) -> ExecuteToolRequest {
        ExecuteToolRequest {
            tool_name: tool_name.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn list_tools_returns_all_registered_tools() {
        let response = list_tools(State(test_state())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_tool_returns_not_found_for_unknown_name() {
        let result = get_tool(State(test_state()), Path("teleport".to_string())).await;
        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn execute_tool_runs_calculator() {
        let state = test_state();
        let result = state
            .execute_tool_handler()
            .handle(ExecuteToolCommand {
                tool_name: "calculate".to_string(),
                parameters: json!({"expression": "6 * 7"})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            })
            .await
            .unwrap();
        assert_eq!(result.status(), ToolStatus::Success);

        let response = execute_tool(
            State(state),
            Json(execute_request("calculate", json!({"expression": "6 * 7"}))),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn execute_tool_unknown_name_is_not_found() {
        let result = execute_tool(
            State(test_state()),
            Json(execute_request("teleport", json!({}))),
        )
        .await;
        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
