//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application core to external systems:
//! - `tools` - Calculator, weather and search tools plus the shared upstream HTTP client
//! - `ai` - Model clients (OpenAI-compatible HTTP, scripted)
//! - `http` - Axum routes for chat and tool endpoints

pub mod ai;
pub mod http;
pub mod tools;
