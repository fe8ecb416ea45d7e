//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application core and the outside world. Adapters implement these ports.
//!
//! - `Tool` - A capability the model can call (calculator, weather, search)
//! - `ModelClient` - The function-calling language model

mod model_client;
mod tool;

pub use model_client::{ConversationContext, ModelClient, ModelError, ModelMessage, ModelOutput};
pub use tool::Tool;
