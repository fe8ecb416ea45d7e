//! HTTP adapters - REST API implementations.
//!
//! Each endpoint group has its own state, handlers and router; [`app_router`]
//! mounts them under `/api` with tracing, CORS and timeout layers.

pub mod chat;
pub mod error;
pub mod health;
pub mod tools;

pub use chat::{chat_router, ChatAppState};
pub use error::{ApiError, ErrorResponse};
pub use health::health_router;
pub use tools::{tools_router, ToolsAppState};

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Builds the full application router.
///
/// # Routes
///
/// - `POST /api/chat`
/// - `GET /api/tools`, `GET /api/tools/:name`, `POST /api/tools/execute`
/// - `GET /health`
pub fn app_router(chat: ChatAppState, tools: ToolsAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api/chat", chat_router().with_state(chat))
        .nest("/api/tools", tools_router().with_state(tools))
        .merge(health_router())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin outside production unless origins are listed.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() && !server.is_production() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
