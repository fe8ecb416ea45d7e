//! Query handlers for the tool catalogue.

use std::sync::Arc;

use crate::application::ToolRegistry;
use crate::domain::tools::{RegistryError, ToolSpec};

/// Result of listing every tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ListToolsResult {
    pub tools: Vec<ToolSpec>,
    pub total_count: usize,
}

/// Handler that lists tool schemas in registration order.
pub struct ListToolsHandler {
    registry: Arc<ToolRegistry>,
}

impl ListToolsHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self) -> ListToolsResult {
        let tools = self.registry.export_schemas();
        ListToolsResult {
            total_count: tools.len(),
            tools,
        }
    }
}

/// Query for a single tool.
#[derive(Debug, Clone)]
pub struct GetToolQuery {
    pub tool_name: String,
}

/// Handler that describes one tool.
pub struct GetToolHandler {
    registry: Arc<ToolRegistry>,
}

impl GetToolHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, query: GetToolQuery) -> Result<ToolSpec, RegistryError> {
        Ok(self.registry.resolve(&query.tool_name)?.spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tools::ScriptedTool;

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::new()
                .with_tool(Arc::new(ScriptedTool::new("get_weather")))
                .and_then(|r| r.with_tool(Arc::new(ScriptedTool::new("calculate"))))
                .unwrap(),
        )
    }

    #[test]
    fn lists_all_tools_with_count() {
        let result = ListToolsHandler::new(registry()).handle();

        assert_eq!(result.total_count, 2);
        assert_eq!(result.tools[0].name(), "get_weather");
        assert_eq!(result.tools[1].name(), "calculate");
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let result = ListToolsHandler::new(Arc::new(ToolRegistry::new())).handle();
        assert_eq!(result.total_count, 0);
        assert!(result.tools.is_empty());
    }

    #[test]
    fn describes_known_tool() {
        let spec = GetToolHandler::new(registry())
            .handle(GetToolQuery {
                tool_name: "calculate".to_string(),
            })
            .unwrap();
        assert_eq!(spec.name(), "calculate");
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let err = GetToolHandler::new(registry())
            .handle(GetToolQuery {
                tool_name: "teleport".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, RegistryError::ToolNotFound("teleport".to_string()));
    }
}
