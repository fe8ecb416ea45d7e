//! Scripted model client for testing and offline runs.
//!
//! Provides a configurable implementation of the `ModelClient` port so the
//! orchestrator can be driven without calling a real model.
//!
//! # Features
//!
//! - Queued outputs (final answers or tool-call requests), consumed in order
//! - Error injection
//! - Simulated latency for cancellation tests
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let model = ScriptedModelClient::new()
//!     .with_tool_calls(vec![ToolInvocationRequest::from_value(
//!         "calculate",
//!         json!({"expression": "25 * 4"}),
//!     )])
//!     .with_answer("25 * 4 is 100.");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::tools::{ToolInvocationRequest, ToolSpec};
use crate::ports::{ModelClient, ModelError, ModelMessage, ModelOutput};

/// Answer returned once the queue is exhausted.
pub const DEFAULT_ANSWER: &str = "Scripted response";

/// One recorded `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolSpec>,
}

/// Model client whose replies are set up ahead of time.
#[derive(Debug, Clone)]
pub struct ScriptedModelClient {
    responses: Arc<Mutex<VecDeque<Result<ModelOutput, ModelError>>>>,
    default_answer: String,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for ScriptedModelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedModelClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_answer: DEFAULT_ANSWER.to_string(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a final answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Ok(ModelOutput::FinalAnswer(answer.into())));
        self
    }

    /// Queues a round of tool calls.
    pub fn with_tool_calls(self, calls: Vec<ToolInvocationRequest>) -> Self {
        lock(&self.responses).push_back(Ok(ModelOutput::ToolCalls(calls)));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ModelError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Sets the answer given once the queue runs dry.
    pub fn with_default_answer(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = answer.into();
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> Result<ModelOutput, ModelError> {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(ModelOutput::FinalAnswer(self.default_answer.clone())))
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(
        &self,
        messages: &[ModelMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelOutput, ModelError> {
        lock(&self.calls).push(RecordedCall {
            messages: messages.to_vec(),
            tools: tools.to_vec(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_response()
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn returns_queued_outputs_in_order() {
        let call = ToolInvocationRequest::from_value("calculate", json!({"expression": "1+1"}));
        let model = ScriptedModelClient::new()
            .with_tool_calls(vec![call.clone()])
            .with_answer("Two.");

        assert_eq!(
            model.complete(&[], &[]).await.unwrap(),
            ModelOutput::ToolCalls(vec![call])
        );
        assert_eq!(
            model.complete(&[], &[]).await.unwrap(),
            ModelOutput::FinalAnswer("Two.".to_string())
        );
    }

    #[tokio::test]
    async fn falls_back_to_default_answer() {
        let model = ScriptedModelClient::new().with_default_answer("offline");
        assert_eq!(
            model.complete(&[], &[]).await.unwrap(),
            ModelOutput::FinalAnswer("offline".to_string())
        );
    }

    #[tokio::test]
    async fn injects_errors() {
        let model = ScriptedModelClient::new().with_error(ModelError::AuthenticationFailed);
        assert_eq!(
            model.complete(&[], &[]).await.unwrap_err(),
            ModelError::AuthenticationFailed
        );
    }

    #[tokio::test]
    async fn records_messages_and_tools() {
        let model = ScriptedModelClient::new();
        let spec = ToolSpec::new("calculate", "Math", json!({"type": "object"}));

        model
            .complete(&[ModelMessage::user("hi")], std::slice::from_ref(&spec))
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(model.call_count(), 1);
        assert_eq!(calls[0].messages, vec![ModelMessage::user("hi")]);
        assert_eq!(calls[0].tools, vec![spec]);
    }
}
