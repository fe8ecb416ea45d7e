//! Per-message orchestration state.

use super::TurnPhase;
use crate::domain::tools::ToolResult;

/// State of one inbound message while the orchestrator works on it.
///
/// Created when a message arrives and dropped once the reply is returned;
/// nothing here outlives the request.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    user_message: String,
    phase: TurnPhase,
    rounds: u32,
    accumulated_tool_results: Vec<ToolResult>,
    final_response: Option<String>,
}

impl ConversationTurn {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            phase: TurnPhase::AwaitingModel,
            rounds: 0,
            accumulated_tool_results: Vec::new(),
            final_response: None,
        }
    }

    fn transition(&mut self, target: TurnPhase) {
        debug_assert!(
            self.phase.can_transition_to(&target),
            "invalid turn transition {:?} -> {:?}",
            self.phase,
            target
        );
        self.phase = target;
    }

    /// The model asked for tools; counts a new round.
    pub fn tool_calls_requested(&mut self) {
        self.transition(TurnPhase::ToolCallsRequested);
        self.rounds += 1;
    }

    pub fn begin_execution(&mut self) {
        self.transition(TurnPhase::Executing);
    }

    /// Appends a round's results in request order and hands control back
    /// to the model.
    pub fn record_results(&mut self, results: impl IntoIterator<Item = ToolResult>) {
        self.accumulated_tool_results.extend(results);
        self.transition(TurnPhase::AwaitingModel);
    }

    pub fn respond(&mut self, response: impl Into<String>) {
        self.final_response = Some(response.into());
        self.transition(TurnPhase::Responded);
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of tool-call rounds the model has requested so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn trace(&self) -> &[ToolResult] {
        &self.accumulated_tool_results
    }

    pub fn final_response(&self) -> Option<&str> {
        self.final_response.as_deref()
    }

    /// Consumes the turn, returning the response text and the trace.
    pub fn into_parts(self) -> (String, Vec<ToolResult>) {
        (
            self.final_response.unwrap_or_default(),
            self.accumulated_tool_results,
        )
    }
}
