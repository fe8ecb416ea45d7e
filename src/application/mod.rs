//! Application layer - services and handlers.
//!
//! The registry, executor and orchestrator form the tool orchestration
//! core. Handlers wrap them for the inbound HTTP adapter.

pub mod handlers;
mod orchestrator;
mod response_cache;
mod tool_executor;
mod tool_registry;

pub use handlers::{
    ExecuteToolCommand, ExecuteToolHandler, GetToolHandler, GetToolQuery, HandleMessageCommand,
    HandleMessageError, HandleMessageHandler, HandleMessageResult, ListToolsHandler,
    ListToolsResult,
};
pub use orchestrator::{
    AgentOrchestrator, AgentReply, OrchestratorError, DEFAULT_MAX_TOOL_ROUNDS,
    DEFAULT_SYSTEM_PROMPT,
};
pub use response_cache::{ResponseCache, DEFAULT_MAX_ENTRIES};
pub use tool_executor::{
    InvocationError, ToolExecutor, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY,
    DEFAULT_TIMEOUT, MAX_ERROR_MESSAGE_LEN,
};
pub use tool_registry::ToolRegistry;
