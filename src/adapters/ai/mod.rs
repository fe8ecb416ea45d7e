//! Model Client Adapters.
//!
//! Implementations of the `ModelClient` port.
//!
//! ## Available Adapters
//!
//! - `OpenAICompatibleClient` - chat-completions with tool calling (OpenAI, Gemini)
//! - `ScriptedModelClient` - scripted replies for tests and offline runs

mod openai_compatible;
mod scripted_client;

pub use openai_compatible::{
    OpenAICompatibleClient, OpenAICompatibleConfig, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use scripted_client::{RecordedCall, ScriptedModelClient, DEFAULT_ANSWER};
