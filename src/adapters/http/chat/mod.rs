//! Chat HTTP adapter - one agent turn per request.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;

pub use handlers::ChatAppState;
pub use routes::chat_router;
