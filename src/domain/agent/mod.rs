//! Agent module - state of one conversation turn.

mod conversation_turn;
mod turn_phase;

pub use conversation_turn::ConversationTurn;
pub use turn_phase::TurnPhase;
