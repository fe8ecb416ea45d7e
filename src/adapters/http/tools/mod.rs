//! Tools HTTP adapter - tool discovery and direct execution.
//!
//! Provides endpoints for:
//! - Listing registered tools with their parameter schemas
//! - Describing a single tool
//! - Running one tool outside a chat turn

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;

pub use handlers::ToolsAppState;
pub use routes::tools_router;
