//! Agent Orchestrator - drives the model/tool loop for one message.
//!
//! ```text
//! AwaitingModel → (ToolCallsRequested → Executing → AwaitingModel)* → Responded
//! ```
//!
//! Each round sends the running message list plus the registry's schemas to
//! the model. Tool calls from one round run concurrently through the
//! executor; their results are appended to the trace in the order the model
//! asked for them and fed back before the next round.
//!
//! The whole turn races a [`CancellationToken`]. Nothing is spawned, so on
//! cancellation the pending model call and any in-flight tools are dropped
//! where they stand.

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::ToolExecutor;
use crate::domain::agent::ConversationTurn;
use crate::domain::tools::ToolResult;
use crate::ports::{ConversationContext, ModelClient, ModelError, ModelMessage, ModelOutput};

/// Default cap on tool-call rounds per message.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 5;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to tools. \
Use the calculator for arithmetic, the weather tool for current conditions and web search \
for recent information. Answer directly when no tool is needed.";

const EMPTY_ANSWER_FALLBACK: &str = "I wasn't able to come up with a response. Please try rephrasing your question.";

/// Errors that end a turn without a reply.
///
/// Tool failures never appear here; they are recorded in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("model client failed: {0}")]
    Model(#[from] ModelError),

    #[error("turn cancelled")]
    Cancelled,
}

/// Reply for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub response: String,
    pub trace: Vec<ToolResult>,
    pub rounds: u32,
}

/// Coordinates the model client and the tool executor.
pub struct AgentOrchestrator {
    model: Arc<dyn ModelClient>,
    executor: Arc<ToolExecutor>,
    max_tool_rounds: u32,
    system_prompt: String,
}

impl AgentOrchestrator {
    pub fn new(model: Arc<dyn ModelClient>, executor: Arc<ToolExecutor>) -> Self {
        Self {
            model,
            executor,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    /// Handles one user message.
    ///
    /// # Errors
    ///
    /// - `Model` if the model client fails
    /// - `Cancelled` if `cancel` fires before the reply is ready
    pub async fn handle_message(
        &self,
        user_message: &str,
        context: ConversationContext,
        cancel: &CancellationToken,
    ) -> Result<AgentReply, OrchestratorError> {
        let mut turn = ConversationTurn::new(user_message);
        let schemas = self.executor.registry().export_schemas();

        let mut messages = Vec::with_capacity(context.history.len() + 2);
        messages.push(ModelMessage::system(&self.system_prompt));
        messages.extend(context.history);
        messages.push(ModelMessage::user(user_message));

        loop {
            let output = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(&turn)),
                output = self.model.complete(&messages, &schemas) => output,
            };

            let calls = match output {
                Ok(ModelOutput::FinalAnswer(text)) => {
                    if text.trim().is_empty() {
                        turn.respond(EMPTY_ANSWER_FALLBACK);
                    } else {
                        turn.respond(text);
                    }
                    break;
                }
                Ok(ModelOutput::ToolCalls(calls)) if calls.is_empty() => {
                    tracing::warn!("model requested an empty set of tool calls");
                    turn.respond(EMPTY_ANSWER_FALLBACK);
                    break;
                }
                Ok(ModelOutput::ToolCalls(calls)) => calls,
                Err(err) => {
                    tracing::error!(
                        model = %self.model.model_name(),
                        round = turn.rounds(),
                        error = %err,
                        "model call failed"
                    );
                    return Err(err.into());
                }
            };

            turn.tool_calls_requested();
            if turn.rounds() > self.max_tool_rounds {
                tracing::warn!(
                    max_tool_rounds = self.max_tool_rounds,
                    "tool round cap reached"
                );
                let message = cap_reached_message(self.max_tool_rounds, turn.trace());
                turn.respond(message);
                break;
            }

            turn.begin_execution();
            tracing::debug!(
                round = turn.rounds(),
                tools = ?calls.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
                "executing tool calls"
            );

            let results = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(&turn)),
                results = self.executor.run_batch(&calls) => results,
            };

            messages.push(ModelMessage::assistant_tool_calls(calls));
            messages.extend(results.iter().map(ModelMessage::tool_result));
            turn.record_results(results);
        }

        let rounds = turn.rounds();
        let (response, trace) = turn.into_parts();
        tracing::info!(rounds, tool_calls = trace.len(), "turn completed");

        Ok(AgentReply {
            response,
            trace,
            rounds,
        })
    }

    fn cancelled(&self, turn: &ConversationTurn) -> OrchestratorError {
        tracing::info!(
            phase = ?turn.phase(),
            round = turn.rounds(),
            "turn cancelled"
        );
        OrchestratorError::Cancelled
    }
}

/// Best-effort reply when the model keeps asking for tools.
fn cap_reached_message(max_tool_rounds: u32, trace: &[ToolResult]) -> String {
    let mut message = format!(
        "I stopped after {} rounds of tool calls without reaching a final answer.",
        max_tool_rounds
    );
    if !trace.is_empty() {
        message.push_str(" Here is what the tools returned:");
        for result in trace {
            message.push_str(&format!("\n- {}: {}", result.tool_name(), result.as_model_content()));
        }
    }
    message
}
