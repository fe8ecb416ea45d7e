//! Axum router configuration for tools endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{execute_tool, get_tool, list_tools, ToolsAppState};

/// Create the tools API router.
///
/// # Routes
///
/// - `GET /` - List available tools
/// - `POST /execute` - Run a tool directly
/// - `GET /:name` - Describe one tool
///
/// Suitable for mounting at `/api/tools`.
pub fn tools_router() -> Router<ToolsAppState> {
    Router::new()
        .route("/", get(list_tools))
        .route("/execute", post(execute_tool))
        .route("/:name", get(get_tool))
}
