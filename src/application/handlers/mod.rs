//! Application handlers.
//!
//! Command and query handlers called by the HTTP layer.

pub mod chat;
pub mod tools;

pub use chat::{
    HandleMessageCommand, HandleMessageError, HandleMessageHandler, HandleMessageResult,
    MAX_MESSAGE_LEN,
};
pub use tools::{
    ExecuteToolCommand, ExecuteToolHandler, GetToolHandler, GetToolQuery, ListToolsHandler,
    ListToolsResult,
};
