//! Phases of a single conversation turn.

use serde::{Deserialize, Serialize};

/// Where a turn is in the model/tool loop.
///
/// `AwaitingModel → (ToolCallsRequested → Executing → AwaitingModel)* → Responded`
///
/// `ToolCallsRequested → Responded` is taken when the round cap is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingModel,
    ToolCallsRequested,
    Executing,
    Responded,
}

impl TurnPhase {
    /// Returns true if moving from self to target is allowed.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns all phases reachable in one step.
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::AwaitingModel => vec![Self::ToolCallsRequested, Self::Responded],
            Self::ToolCallsRequested => vec![Self::Executing, Self::Responded],
            Self::Executing => vec![Self::AwaitingModel],
            Self::Responded => vec![],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_transitions_are_valid() {
        assert!(TurnPhase::AwaitingModel.can_transition_to(&TurnPhase::ToolCallsRequested));
        assert!(TurnPhase::ToolCallsRequested.can_transition_to(&TurnPhase::Executing));
        assert!(TurnPhase::Executing.can_transition_to(&TurnPhase::AwaitingModel));
        assert!(TurnPhase::AwaitingModel.can_transition_to(&TurnPhase::Responded));
    }

    #[test]
    fn cap_allows_responding_instead_of_executing() {
        assert!(TurnPhase::ToolCallsRequested.can_transition_to(&TurnPhase::Responded));
    }

    #[test]
    fn executing_cannot_skip_the_model() {
        assert!(!TurnPhase::Executing.can_transition_to(&TurnPhase::Responded));
        assert!(!TurnPhase::Executing.can_transition_to(&TurnPhase::ToolCallsRequested));
    }

    #[test]
    fn responded_is_terminal() {
        assert!(TurnPhase::Responded.is_terminal());
        assert!(!TurnPhase::AwaitingModel.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&TurnPhase::ToolCallsRequested).unwrap();
        assert_eq!(json, "\"tool_calls_requested\"");
    }
}
