//! OpenAI-compatible Client - `ModelClient` over the chat-completions API.
//!
//! Works with any endpoint that speaks the OpenAI chat-completions dialect
//! with `tools` / `tool_calls`, including Gemini's compatibility layer.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAICompatibleConfig::new(api_key)
//!     .with_model("gemini-2.0-flash-exp")
//!     .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai");
//!
//! let client = OpenAICompatibleClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::{ToolInvocationRequest, ToolSpec};
use crate::ports::{ModelClient, ModelError, ModelMessage, ModelOutput};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time.
    pub retry_base_delay: Duration,
    pub temperature: Option<f32>,
}

impl OpenAICompatibleConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Chat-completions client with tool calling.
pub struct OpenAICompatibleClient {
    config: OpenAICompatibleConfig,
    client: Client,
}

impl OpenAICompatibleClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// `NotConfigured` if the API key is blank or the HTTP client cannot be
    /// built.
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, ModelError> {
        if config.api_key().trim().is_empty() {
            return Err(ModelError::NotConfigured("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our messages and tools to the wire format.
    fn to_wire_request(&self, messages: &[ModelMessage], tools: &[ToolSpec]) -> WireRequest {
        WireRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(ToolSpec::to_openai_format).collect(),
            temperature: self.config.temperature,
        }
    }

    async fn send_request(&self, body: &WireRequest) -> Result<Response, ModelError> {
        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ModelError::network(format!("Connection failed: {}", e.without_url()))
                } else {
                    ModelError::network(e.without_url().to_string())
                }
            })
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(response: Response) -> Result<Response, ModelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(ModelError::AuthenticationFailed),
            429 => Err(ModelError::rate_limited(Self::parse_retry_after(&error_body))),
            400 | 404 | 422 => Err(ModelError::InvalidRequest(error_body)),
            500..=599 => Err(ModelError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ModelError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Reads "try again in Ns" from an error body; 30 otherwise.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<Value>(error_body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string));

        message
            .as_deref()
            .and_then(|s| s.find("try again in ").map(|idx| &s[idx + 13..]))
            .and_then(|rest| {
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
            .unwrap_or(30)
    }

    async fn parse_response(&self, response: Response) -> Result<ModelOutput, ModelError> {
        let response = Self::handle_response_status(response).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| ModelError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::parse("No choices in response"))?;

        Ok(choice.message.into_output())
    }

    async fn attempt(&self, body: &WireRequest) -> Result<ModelOutput, ModelError> {
        let response = self.send_request(body).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl ModelClient for OpenAICompatibleClient {
    async fn complete(
        &self,
        messages: &[ModelMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelOutput, ModelError> {
        let body = self.to_wire_request(messages, tools);
        let mut retry_count = 0;

        loop {
            match self.attempt(&body).await {
                Ok(output) => return Ok(output),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    let delay = self
                        .config
                        .retry_base_delay
                        .saturating_mul(2u32.saturating_pow(retry_count));
                    tracing::warn!(
                        model = %self.config.model,
                        attempt = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying model call"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ----- Chat Completions Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded arguments object.
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl WireMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    fn into_output(self) -> ModelOutput {
        if self.tool_calls.is_empty() {
            return ModelOutput::FinalAnswer(self.content.unwrap_or_default());
        }
        ModelOutput::ToolCalls(self.tool_calls.into_iter().map(WireToolCall::into_request).collect())
    }
}

impl From<&ModelMessage> for WireMessage {
    fn from(message: &ModelMessage) -> Self {
        match message {
            ModelMessage::System { content } => Self::text("system", content),
            ModelMessage::User { content } => Self::text("user", content),
            ModelMessage::Assistant {
                content,
                tool_calls,
            } => Self {
                role: "assistant".to_string(),
                content: content.clone(),
                tool_calls: tool_calls.iter().map(WireToolCall::from).collect(),
                tool_call_id: None,
                name: None,
            },
            ModelMessage::Tool {
                call_id,
                tool_name,
                content,
            } => Self {
                role: "tool".to_string(),
                content: Some(content.clone()),
                tool_calls: Vec::new(),
                tool_call_id: Some(call_id.as_str().to_string()),
                name: Some(tool_name.clone()),
            },
        }
    }
}

impl From<&ToolInvocationRequest> for WireToolCall {
    fn from(request: &ToolInvocationRequest) -> Self {
        Self {
            id: Some(request.call_id.as_str().to_string()),
            kind: function_type(),
            function: WireFunctionCall {
                name: request.tool_name.clone(),
                arguments: Value::Object(request.arguments.clone()).to_string(),
            },
        }
    }
}

impl WireToolCall {
    fn into_request(self) -> ToolInvocationRequest {
        let arguments = if self.function.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&self.function.arguments).unwrap_or_else(|e| {
                tracing::warn!(
                    tool = %self.function.name,
                    error = %e,
                    "model sent unparseable tool arguments"
                );
                Value::Null
            })
        };

        let request = ToolInvocationRequest::from_value(self.function.name, arguments);
        match self.id.map(ToolCallId::parse) {
            Some(Ok(id)) => request.with_call_id(id),
            _ => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}
