//! Foundation module - Shared domain primitives.
//!
//! Identifiers and time values used across the tool and agent modules.

mod ids;
mod timestamp;

pub use ids::{ConversationId, IdError, ToolCallId};
pub use timestamp::Timestamp;
