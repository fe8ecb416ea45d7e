//! Tool Executor - runs tool invocations and produces uniform results.
//!
//! Every invocation ends as a [`ToolResult`]. An unknown tool, rejected
//! arguments, a timeout and a failing tool are all `status = error` with a
//! readable message, so the caller never has to branch on failure kinds.
//!
//! # Pipeline
//!
//! 1. Resolve the tool in the registry
//! 2. Validate arguments against the tool's schema (tool is not invoked on failure)
//! 3. Serve a fresh cached output if the tool opts into caching
//! 4. Invoke with a per-attempt timeout, retrying transient failures with
//!    exponential backoff
//! 5. Sanitize error messages and record wall-clock duration

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout, Instant};

use super::{ResponseCache, ToolRegistry};
use crate::domain::tools::{
    RegistryError, ToolArguments, ToolExecutionError, ToolInvocationRequest, ToolResult,
    ValidationError,
};
use crate::ports::Tool;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry; doubles on each further retry.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Longest error message placed in a [`ToolResult`].
pub const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// Why an invocation did not produce output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error(transparent)]
    NotFound(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("timeout")]
    Timeout,

    #[error(transparent)]
    Execution(#[from] ToolExecutionError),
}

/// Runs tools from a shared registry.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    cache: ResponseCache,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ToolExecutor {
    /// Creates an executor with default timeout and retry settings.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            cache: ResponseCache::default(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a retryable failure is retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Uses a specific cache (e.g. one shared with another executor).
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one invocation and always returns a result record.
    pub async fn run(&self, request: &ToolInvocationRequest) -> ToolResult {
        let started = Instant::now();
        let outcome = self.invoke(request).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(output) => {
                tracing::info!(
                    tool = %request.tool_name,
                    call_id = %request.call_id,
                    duration_ms = elapsed.as_millis() as u64,
                    "tool succeeded"
                );
                ToolResult::success(request, output, elapsed)
            }
            Err(err) => {
                let message = sanitize_message(&err.to_string());
                tracing::warn!(
                    tool = %request.tool_name,
                    call_id = %request.call_id,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %message,
                    "tool failed"
                );
                ToolResult::failure(request, message, elapsed)
            }
        }
    }

    /// Runs several invocations concurrently.
    ///
    /// Results come back in the order of `requests`, whatever order the
    /// tools finish in.
    pub async fn run_batch(&self, requests: &[ToolInvocationRequest]) -> Vec<ToolResult> {
        join_all(requests.iter().map(|request| self.run(request))).await
    }

    /// Runs one invocation, surfacing the failure kind.
    pub async fn invoke(&self, request: &ToolInvocationRequest) -> Result<String, InvocationError> {
        let tool = self.registry.resolve(&request.tool_name)?;
        let arguments = tool.parameter_schema().validate(&request.arguments)?;

        let ttl = tool.cache_ttl();
        if ttl.is_some() {
            if let Some(cached) = self.cache.get(tool.name(), &arguments).await {
                tracing::debug!(tool = %request.tool_name, "serving cached result");
                return Ok(cached);
            }
        }

        let output = self.invoke_with_retry(tool.as_ref(), &arguments).await?;

        if let Some(ttl) = ttl {
            self.cache.insert(tool.name(), &arguments, output.clone(), ttl).await;
        }
        Ok(output)
    }

    async fn invoke_with_retry(
        &self,
        tool: &dyn Tool,
        arguments: &ToolArguments,
    ) -> Result<String, InvocationError> {
        let mut attempt: u32 = 0;
        loop {
            match timeout(self.timeout, tool.execute(arguments)).await {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(err)) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        tool = %tool.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying tool after transient failure"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Ok(Err(err)) => return Err(err.into()),
                Err(_) => return Err(InvocationError::Timeout),
            }
        }
    }

    /// `base * 2^attempt`, saturating.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_base_delay.saturating_mul(factor)
    }
}

/// Strips URL query strings and bearer tokens, then caps the length.
fn sanitize_message(message: &str) -> String {
    let mut redact_next = false;
    let cleaned: Vec<String> = message
        .split(' ')
        .map(|word| {
            if redact_next {
                redact_next = false;
                return "[redacted]".to_string();
            }
            if word.eq_ignore_ascii_case("bearer") {
                redact_next = true;
                return word.to_string();
            }
            if word.contains("://") {
                if let Some(query) = word.find('?') {
                    let tail = word
                        .trim_end_matches(|c: char| ")]}>.,;:'\"".contains(c))
                        .len()
                        .max(query);
                    return format!("{}{}", &word[..query], &word[tail..]);
                }
            }
            let lower = word.to_ascii_lowercase();
            if ["appid=", "api_key=", "apikey=", "key=", "token="]
                .iter()
                .any(|marker| lower.contains(marker))
            {
                return "[redacted]".to_string();
            }
            word.to_string()
        })
        .collect();

    let cleaned = cleaned.join(" ");
    if cleaned.chars().count() <= MAX_ERROR_MESSAGE_LEN {
        return cleaned;
    }
    let truncated: String = cleaned.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tools::ScriptedTool;
    use crate::domain::tools::{ParameterSchema, ParameterSpec, ParameterType, ToolStatus};
    use serde_json::json;

    fn schema() -> ParameterSchema {
        ParameterSchema::new().with(ParameterSpec::required(
            "city",
            ParameterType::String,
            "City name",
        ))
    }

    fn executor_with(tool: ScriptedTool) -> ToolExecutor {
        let registry = ToolRegistry::new().with_tool(Arc::new(tool)).unwrap();
        ToolExecutor::new(Arc::new(registry))
    }

    fn request(name: &str, arguments: serde_json::Value) -> ToolInvocationRequest {
        ToolInvocationRequest::from_value(name, arguments)
    }

    #[tokio::test]
    async fn successful_run_returns_output() {
        let spy = ScriptedTool::new("lookup")
            .with_schema(schema())
            .with_output("Sunny in London");
        let executor = executor_with(spy.clone());

        let result = executor.run(&request("lookup", json!({"city": "London"}))).await;

        assert_eq!(result.status(), ToolStatus::Success);
        assert_eq!(result.output(), Some("Sunny in London"));
        assert_eq!(spy.call_count(), 1);
        assert_eq!(spy.calls()[0].get_str("city"), Some("London"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_result() {
        let executor = executor_with(ScriptedTool::new("lookup"));

        let result = executor.run(&request("teleport", json!({}))).await;

        assert_eq!(result.status(), ToolStatus::Error);
        assert_eq!(result.error_message(), Some("Tool 'teleport' not found"));
        assert_eq!(result.tool_name(), "teleport");
    }

    #[tokio::test]
    async fn missing_required_parameter_never_invokes_tool() {
        let spy = ScriptedTool::new("lookup").with_schema(schema());
        let executor = executor_with(spy.clone());

        let result = executor.run(&request("lookup", json!({}))).await;

        assert_eq!(result.status(), ToolStatus::Error);
        assert!(result.error_message().unwrap().contains("city"));
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_required_parameter_never_invokes_tool() {
        let spy = ScriptedTool::new("lookup").with_schema(schema());
        let executor = executor_with(spy.clone());

        let result = executor.run(&request("lookup", json!({"city": "   "}))).await;

        assert_eq!(result.status(), ToolStatus::Error);
        assert_eq!(
            result.error_message(),
            Some("Parameter 'city' must not be empty")
        );
        assert_eq!(spy.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_tool_times_out() {
        let spy = ScriptedTool::new("slow").with_delay(Duration::from_secs(30));
        let executor = executor_with(spy.clone()).with_timeout(Duration::from_secs(5));

        let result = executor.run(&request("slow", json!({}))).await;

        assert_eq!(result.status(), ToolStatus::Error);
        assert_eq!(result.error_message(), Some("timeout"));
        assert!(result.duration() >= Duration::from_secs(5));
        assert!(result.duration() < Duration::from_secs(30));
        assert_eq!(spy.call_count(), 1);
        assert_eq!(spy.abandoned_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let spy = ScriptedTool::new("flaky")
            .with_error(ToolExecutionError::network("connection reset"))
            .with_error(ToolExecutionError::upstream(503, "unavailable"))
            .with_output("recovered");
        let executor = executor_with(spy.clone())
            .with_max_retries(2)
            .with_retry_base_delay(Duration::from_millis(100));

        let started = Instant::now();
        let result = executor.run(&request("flaky", json!({}))).await;

        assert_eq!(result.output(), Some("recovered"));
        assert_eq!(spy.call_count(), 3);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_are_bounded() {
        let spy = ScriptedTool::new("down")
            .with_error(ToolExecutionError::network("a"))
            .with_error(ToolExecutionError::network("b"))
            .with_error(ToolExecutionError::network("c"));
        let executor = executor_with(spy.clone()).with_max_retries(1);

        let result = executor.run(&request("down", json!({}))).await;

        assert_eq!(result.error_message(), Some("network error: b"));
        assert_eq!(spy.call_count(), 2);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let spy = ScriptedTool::new("strict")
            .with_error(ToolExecutionError::upstream(404, "city 'Atlantis' not found"));
        let executor = executor_with(spy.clone());

        let result = executor.run(&request("strict", json!({}))).await;

        assert_eq!(
            result.error_message(),
            Some("upstream error (404): city 'Atlantis' not found")
        );
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn cached_tool_is_invoked_once_for_equivalent_arguments() {
        let spy = ScriptedTool::new("weather")
            .with_schema(schema())
            .with_cache_ttl(Duration::from_secs(300))
            .with_output("Sunny");
        let executor = executor_with(spy.clone());

        let first = executor.run(&request("weather", json!({"city": "London"}))).await;
        let second = executor.run(&request("weather", json!({"city": " London "}))).await;

        assert_eq!(first.output(), Some("Sunny"));
        assert_eq!(second.output(), Some("Sunny"));
        assert_eq!(spy.call_count(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let spy = ScriptedTool::new("weather")
            .with_schema(schema())
            .with_cache_ttl(Duration::from_secs(300))
            .with_error(ToolExecutionError::upstream(404, "not found"))
            .with_output("Sunny");
        let executor = executor_with(spy.clone());

        executor.run(&request("weather", json!({"city": "London"}))).await;
        let second = executor.run(&request("weather", json!({"city": "London"}))).await;

        assert_eq!(second.output(), Some("Sunny"));
        assert_eq!(spy.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_preserves_request_order() {
        let slow = ScriptedTool::new("slow")
            .with_delay(Duration::from_millis(500))
            .with_output("slow done");
        let fast = ScriptedTool::new("fast")
            .with_delay(Duration::from_millis(10))
            .with_output("fast done");
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(slow))
            .and_then(|r| r.with_tool(Arc::new(fast)))
            .unwrap();
        let executor = ToolExecutor::new(Arc::new(registry));

        let started = Instant::now();
        let results = executor
            .run_batch(&[request("slow", json!({})), request("fast", json!({}))])
            .await;

        let names: Vec<&str> = results.iter().map(|r| r.tool_name()).collect();
        assert_eq!(names, vec!["slow", "fast"]);
        assert!(started.elapsed() < Duration::from_millis(510) + Duration::from_millis(10));
    }

    #[tokio::test]
    async fn invoke_exposes_failure_kind() {
        let executor = executor_with(ScriptedTool::new("lookup").with_schema(schema()));

        assert!(matches!(
            executor.invoke(&request("missing", json!({}))).await,
            Err(InvocationError::NotFound(_))
        ));
        assert!(matches!(
            executor.invoke(&request("lookup", json!({"city": 5}))).await,
            Err(InvocationError::Validation(_))
        ));
    }

    #[test]
    fn backoff_doubles_each_attempt() {
        let registry = Arc::new(ToolRegistry::new());
        let executor =
            ToolExecutor::new(registry).with_retry_base_delay(Duration::from_millis(200));
        assert_eq!(executor.backoff(0), Duration::from_millis(200));
        assert_eq!(executor.backoff(1), Duration::from_millis(400));
        assert_eq!(executor.backoff(2), Duration::from_millis(800));
    }

    #[test]
    fn sanitize_strips_query_strings() {
        let message = "error sending request for url (https://api.example.com/weather?q=London&appid=secret123)";
        let cleaned = sanitize_message(message);
        assert!(!cleaned.contains("secret123"));
        assert!(cleaned.contains("https://api.example.com/weather"));
    }

    #[test]
    fn sanitize_keeps_punctuation_after_stripped_query() {
        let cleaned = sanitize_message("request failed (https://api.example.com/weather?q=x&appid=secret).");
        assert_eq!(cleaned, "request failed (https://api.example.com/weather).");
    }

    #[test]
    fn sanitize_redacts_bearer_tokens_and_key_pairs() {
        let cleaned = sanitize_message("rejected Bearer tvly-abc123 with api_key=xyz");
        assert_eq!(cleaned, "rejected Bearer [redacted] with [redacted]");
    }

    #[test]
    fn sanitize_caps_length() {
        let cleaned = sanitize_message(&"x".repeat(MAX_ERROR_MESSAGE_LEN + 50));
        assert_eq!(cleaned.chars().count(), MAX_ERROR_MESSAGE_LEN + 3);
        assert!(cleaned.ends_with("..."));
    }

    #[test]
    fn sanitize_leaves_plain_messages_alone() {
        assert_eq!(sanitize_message("Tool 'x' not found"), "Tool 'x' not found");
    }
}
