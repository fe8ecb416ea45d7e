//! HTTP handler for chat messages.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tokio_util::sync::CancellationToken;

use crate::adapters::http::error::ApiError;
use crate::application::{AgentOrchestrator, HandleMessageCommand, HandleMessageHandler};
use crate::domain::foundation::ConversationId;

use super::dto::{ChatRequest, ChatResponse};

/// Application state for the chat endpoint.
#[derive(Clone)]
pub struct ChatAppState {
    pub orchestrator: Arc<AgentOrchestrator>,
    /// Cancelled on shutdown; each turn runs under a child token.
    pub shutdown: CancellationToken,
}

impl ChatAppState {
    pub fn new(orchestrator: Arc<AgentOrchestrator>, shutdown: CancellationToken) -> Self {
        Self {
            orchestrator,
            shutdown,
        }
    }

    pub fn handle_message_handler(&self) -> HandleMessageHandler {
        HandleMessageHandler::new(self.orchestrator.clone())
    }
}

/// POST /api/chat - Run one agent turn
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut cmd = HandleMessageCommand::new(request.message);
    if let Some(raw) = request.conversation_id {
        cmd = cmd.with_conversation_id(ConversationId::parse(raw)?);
    }

    // Dropping the guard cancels the turn if the client goes away.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let result = state.handle_message_handler().handle(cmd, &cancel).await?;
    Ok(Json(ChatResponse::from(result)))
}
