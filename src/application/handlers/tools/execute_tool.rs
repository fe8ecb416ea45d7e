//! ExecuteToolHandler - Command handler for running one tool directly.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::application::ToolExecutor;
use crate::domain::tools::{RegistryError, ToolInvocationRequest, ToolResult};

/// Command to run a tool outside a chat turn.
#[derive(Debug, Clone)]
pub struct ExecuteToolCommand {
    pub tool_name: String,
    pub parameters: Map<String, Value>,
}

/// Handler for direct tool execution.
///
/// An unknown tool is reported as an error so the caller can answer
/// "not found"; every other failure comes back inside the `ToolResult`.
pub struct ExecuteToolHandler {
    executor: Arc<ToolExecutor>,
}

impl ExecuteToolHandler {
    pub fn new(executor: Arc<ToolExecutor>) -> Self {
        Self { executor }
    }

    pub async fn handle(&self, cmd: ExecuteToolCommand) -> Result<ToolResult, RegistryError> {
        if !self.executor.registry().contains(&cmd.tool_name) {
            return Err(RegistryError::ToolNotFound(cmd.tool_name));
        }

        let request = ToolInvocationRequest::new(cmd.tool_name, cmd.parameters);
        Ok(self.executor.run(&request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tools::CalculatorTool;
    use crate::application::ToolRegistry;
    use crate::domain::tools::ToolStatus;
    use serde_json::json;

    fn handler() -> ExecuteToolHandler {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(CalculatorTool::new()))
            .unwrap();
        ExecuteToolHandler::new(Arc::new(ToolExecutor::new(Arc::new(registry))))
    }

    fn command(tool_name: &str, parameters: Value) -> ExecuteToolCommand {
        ExecuteToolCommand {
            tool_name: tool_name.to_string(),
            parameters: parameters.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn runs_tool() {
        let result = handler()
            .handle(command("calculate", json!({"expression": "2 + 2"})))
            .await
            .unwrap();

        assert_eq!(result.status(), ToolStatus::Success);
        assert_eq!(result.output(), Some("2 + 2 = 4"));
    }

    #[tokio::test]
    async fn invalid_arguments_come_back_as_error_result() {
        let result = handler()
            .handle(command("calculate", json!({})))
            .await
            .unwrap();

        assert_eq!(result.status(), ToolStatus::Error);
        assert_eq!(
            result.error_message(),
            Some("Missing required parameter 'expression'")
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let err = handler()
            .handle(command("teleport", json!({})))
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::ToolNotFound("teleport".to_string()));
    }
}
