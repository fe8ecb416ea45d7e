//! Model Client Port - Interface for function-calling language models.
//!
//! The orchestrator sends the running message list plus the exported tool
//! schemas and receives either a final answer or a list of tool calls.
//!
//! # Design
//!
//! - Provider-agnostic message format ([`ModelMessage`])
//! - Tool calls carry ids so results can be correlated on the next turn
//! - Error types separate transient failures from permanent ones
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct AlwaysAnswer;
//!
//! #[async_trait]
//! impl ModelClient for AlwaysAnswer {
//!     async fn complete(
//!         &self,
//!         _messages: &[ModelMessage],
//!         _tools: &[ToolSpec],
//!     ) -> Result<ModelOutput, ModelError> {
//!         Ok(ModelOutput::FinalAnswer("Hello!".to_string()))
//!     }
//!
//!     fn model_name(&self) -> &str { "always-answer" }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{ConversationId, ToolCallId};
use crate::domain::tools::{ToolInvocationRequest, ToolResult, ToolSpec};

/// Port for language-model completions with tool calling.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate the next step of the conversation.
    ///
    /// # Arguments
    ///
    /// * `messages` - System prompt, history, user message and prior tool rounds
    /// * `tools` - Schemas of every tool the model may call
    async fn complete(
        &self,
        messages: &[ModelMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelOutput, ModelError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// What the model decided to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Natural-language reply; ends the turn.
    FinalAnswer(String),
    /// Tools to run before asking the model again.
    ToolCalls(Vec<ToolInvocationRequest>),
}

/// A message in the model conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ModelMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default)]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolInvocationRequest>,
    },
    Tool {
        call_id: ToolCallId,
        tool_name: String,
        content: String,
    },
}

impl ModelMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Assistant message that requested tools.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolInvocationRequest>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls,
        }
    }

    /// Feeds one tool result back to the model.
    pub fn tool_result(result: &ToolResult) -> Self {
        Self::Tool {
            call_id: result.call_id().clone(),
            tool_name: result.tool_name().to_string(),
            content: result.as_model_content(),
        }
    }
}

/// Caller-supplied context for a turn.
///
/// Opaque to the tool layer; the orchestrator only prepends `history` to
/// the messages sent to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    pub conversation_id: Option<ConversationId>,
    pub history: Vec<ModelMessage>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }

    pub fn with_history(mut self, history: Vec<ModelMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Model client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// No API key or endpoint configured.
    #[error("model client not configured: {0}")]
    NotConfigured(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl ModelError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if the request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable { .. } | Self::Network(_) | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use std::time::Duration;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ModelError::rate_limited(30).is_retryable());
        assert!(ModelError::unavailable("503").is_retryable());
        assert!(ModelError::network("reset").is_retryable());
        assert!(ModelError::Timeout { timeout_secs: 60 }.is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!ModelError::AuthenticationFailed.is_retryable());
        assert!(!ModelError::parse("bad json").is_retryable());
        assert!(!ModelError::InvalidRequest("no".to_string()).is_retryable());
        assert!(!ModelError::NotConfigured("api key".to_string()).is_retryable());
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            ModelError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(ModelError::AuthenticationFailed.to_string(), "authentication failed");
    }

    #[test]
    fn tool_result_message_uses_model_content() {
        let request = ToolInvocationRequest::new("calculate", Map::new());
        let failed = ToolResult::failure(&request, "timeout", Duration::from_secs(5));

        match ModelMessage::tool_result(&failed) {
            ModelMessage::Tool {
                call_id,
                tool_name,
                content,
            } => {
                assert_eq!(call_id, request.call_id);
                assert_eq!(tool_name, "calculate");
                assert_eq!(content, "Error: timeout");
            }
            other => panic!("expected tool message, got {:?}", other),
        }
    }

    #[test]
    fn messages_serialize_with_role_tag() {
        let json = serde_json::to_value(ModelMessage::user("hi")).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn context_builder_sets_fields() {
        let id = ConversationId::parse("conv_1").unwrap();
        let context = ConversationContext::new()
            .with_conversation_id(id.clone())
            .with_history(vec![ModelMessage::user("earlier")]);
        assert_eq!(context.conversation_id, Some(id));
        assert_eq!(context.history.len(), 1);
    }

    #[tokio::test]
    async fn model_client_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ModelClient>();
    }
}
