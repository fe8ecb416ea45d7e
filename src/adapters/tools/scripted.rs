//! Scripted tool for testing.
//!
//! A configurable implementation of the `Tool` port that returns queued
//! outputs or errors, optionally after a delay, and records every call.
//! Calls dropped before they finish are counted as abandoned.
//!
//! # Example
//!
//! ```ignore
//! let spy = ScriptedTool::new("lookup")
//!     .with_schema(schema)
//!     .with_output("found it")
//!     .with_delay(Duration::from_millis(50));
//!
//! executor.run(request).await;
//! assert_eq!(spy.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::tools::{ParameterSchema, ToolArguments, ToolExecutionError};
use crate::ports::Tool;

/// Tool whose behavior is set up ahead of time.
///
/// Clones share the response queue and call log, so a test can keep one
/// handle while the registry owns another.
#[derive(Debug, Clone)]
pub struct ScriptedTool {
    name: String,
    description: String,
    schema: ParameterSchema,
    responses: Arc<Mutex<VecDeque<Result<String, ToolExecutionError>>>>,
    delay: Duration,
    cache_ttl: Option<Duration>,
    calls: Arc<Mutex<Vec<ToolArguments>>>,
    abandoned: Arc<AtomicUsize>,
}

/// Counts the call as abandoned unless it is marked finished first.
struct InFlight<'a> {
    abandoned: &'a AtomicUsize,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTool {
    /// Creates a tool with no parameters that answers `"ok"`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Scripted tool '{}'", name),
            name,
            schema: ParameterSchema::new(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            cache_ttl: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            abandoned: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_schema(mut self, schema: ParameterSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Queues a successful output.
    pub fn with_output(self, output: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Ok(output.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ToolExecutionError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Returns the number of times `execute` was entered.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns the number of calls dropped before they finished.
    pub fn abandoned_count(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Returns the arguments of every recorded call.
    pub fn calls(&self) -> Vec<ToolArguments> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> Result<String, ToolExecutionError> {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameter_schema(&self) -> &ParameterSchema {
        &self.schema
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError> {
        lock(&self.calls).push(arguments.clone());
        let mut in_flight = InFlight {
            abandoned: &self.abandoned,
            finished: false,
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        in_flight.finished = true;
        self.next_response()
    }

    fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let tool = ScriptedTool::new("lookup")
            .with_output("first")
            .with_error(ToolExecutionError::network("down"));
        let args = ToolArguments::default();

        assert_eq!(tool.execute(&args).await.unwrap(), "first");
        assert_eq!(
            tool.execute(&args).await.unwrap_err(),
            ToolExecutionError::network("down")
        );
        assert_eq!(tool.execute(&args).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let spy = ScriptedTool::new("lookup");
        let handle: Arc<dyn Tool> = Arc::new(spy.clone());

        handle.execute(&ToolArguments::default()).await.unwrap();
        assert_eq!(spy.call_count(), 1);
        assert_eq!(spy.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied() {
        let tool = ScriptedTool::new("slow").with_delay(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        tool.execute(&ToolArguments::default()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_call_is_counted_as_abandoned() {
        let tool = ScriptedTool::new("slow").with_delay(Duration::from_secs(10));
        let args = ToolArguments::default();

        let timed_out =
            tokio::time::timeout(Duration::from_secs(1), tool.execute(&args)).await;
        assert!(timed_out.is_err());
        assert_eq!(tool.abandoned_count(), 1);

        tool.execute(&args).await.unwrap();
        assert_eq!(tool.abandoned_count(), 1);
        assert_eq!(tool.call_count(), 2);
    }

    #[test]
    fn reports_cache_ttl() {
        let tool = ScriptedTool::new("cached").with_cache_ttl(Duration::from_secs(60));
        assert_eq!(tool.cache_ttl(), Some(Duration::from_secs(60)));
        assert_eq!(ScriptedTool::new("plain").cache_ttl(), None);
    }
}
