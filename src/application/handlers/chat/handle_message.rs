//! HandleMessageHandler - Command handler for inbound chat messages.

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::application::{AgentOrchestrator, OrchestratorError};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::domain::tools::ToolResult;
use crate::ports::{ConversationContext, ModelMessage};

/// Longest chat message accepted, in characters.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Command to answer one chat message.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    pub message: String,
    pub conversation_id: Option<ConversationId>,
    pub history: Vec<ModelMessage>,
}

impl HandleMessageCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
            history: Vec::new(),
        }
    }

    pub fn with_conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }
}

/// Result of a handled chat message.
#[derive(Debug, Clone)]
pub struct HandleMessageResult {
    pub conversation_id: ConversationId,
    pub response: String,
    pub tool_usage: Vec<ToolResult>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleMessageError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Handler for chat messages.
pub struct HandleMessageHandler {
    orchestrator: Arc<AgentOrchestrator>,
}

impl HandleMessageHandler {
    pub fn new(orchestrator: Arc<AgentOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(
        &self,
        cmd: HandleMessageCommand,
        cancel: &CancellationToken,
    ) -> Result<HandleMessageResult, HandleMessageError> {
        // 1. Validate
        let message = cmd.message.trim();
        if message.is_empty() {
            return Err(HandleMessageError::EmptyMessage);
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(HandleMessageError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }

        // 2. Run the turn
        let conversation_id = cmd.conversation_id.unwrap_or_default();
        let context = ConversationContext::new()
            .with_conversation_id(conversation_id.clone())
            .with_history(cmd.history);

        let reply = self
            .orchestrator
            .handle_message(message, context, cancel)
            .await?;

        Ok(HandleMessageResult {
            conversation_id,
            response: reply.response,
            tool_usage: reply.trace,
            timestamp: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::ScriptedModelClient;
    use crate::adapters::tools::CalculatorTool;
    use crate::application::{ToolExecutor, ToolRegistry};
    use crate::domain::tools::{ToolInvocationRequest, ToolStatus};
    use crate::ports::ModelError;
    use serde_json::json;

    fn handler(model: ScriptedModelClient) -> HandleMessageHandler {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(CalculatorTool::new()))
            .unwrap();
        let executor = ToolExecutor::new(Arc::new(registry));
        let orchestrator = AgentOrchestrator::new(Arc::new(model), Arc::new(executor));
        HandleMessageHandler::new(Arc::new(orchestrator))
    }

    #[tokio::test]
    async fn answers_with_tool_usage() {
        let model = ScriptedModelClient::new()
            .with_tool_calls(vec![ToolInvocationRequest::from_value(
                "calculate",
                json!({"expression": "25 * 4"}),
            )])
            .with_answer("25 * 4 is 100.");

        let result = handler(model)
            .handle(
                HandleMessageCommand::new("What is 25 * 4?"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.response, "25 * 4 is 100.");
        assert_eq!(result.tool_usage.len(), 1);
        assert_eq!(result.tool_usage[0].status(), ToolStatus::Success);
        assert!(result.tool_usage[0].output().unwrap().contains("100"));
    }

    #[tokio::test]
    async fn keeps_supplied_conversation_id() {
        let id = ConversationId::parse("conv_123456").unwrap();
        let result = handler(ScriptedModelClient::new())
            .handle(
                HandleMessageCommand::new("Hi").with_conversation_id(id.clone()),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.conversation_id, id);
    }

    #[tokio::test]
    async fn generates_conversation_id_when_absent() {
        let result = handler(ScriptedModelClient::new())
            .handle(HandleMessageCommand::new("Hi"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(!result.conversation_id.as_str().is_empty());
    }

    #[tokio::test]
    async fn rejects_blank_message() {
        let model = ScriptedModelClient::new();
        let err = handler(model.clone())
            .handle(HandleMessageCommand::new("   "), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, HandleMessageError::EmptyMessage);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn rejects_oversized_message() {
        let err = handler(ScriptedModelClient::new())
            .handle(
                HandleMessageCommand::new("a".repeat(MAX_MESSAGE_LEN + 1)),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            HandleMessageError::MessageTooLong {
                max: MAX_MESSAGE_LEN
            }
        );
    }

    #[tokio::test]
    async fn model_failure_is_propagated() {
        let model = ScriptedModelClient::new().with_error(ModelError::network("refused"));
        let err = handler(model)
            .handle(HandleMessageCommand::new("Hi"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HandleMessageError::Orchestrator(OrchestratorError::Model(_))
        ));
    }
}
