//! Tool catalogue and direct execution handlers.

mod execute_tool;
mod list_tools;

pub use execute_tool::{ExecuteToolCommand, ExecuteToolHandler};
pub use list_tools::{GetToolHandler, GetToolQuery, ListToolsHandler, ListToolsResult};
