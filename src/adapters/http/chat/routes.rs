//! Axum router configuration for the chat endpoint.

use axum::{routing::post, Router};

use super::handlers::{send_message, ChatAppState};

/// Create the chat API router.
///
/// - `POST /` - Send a message, suitable for mounting at `/api/chat`
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().route("/", post(send_message))
}
