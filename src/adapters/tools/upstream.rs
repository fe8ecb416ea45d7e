//! Shared HTTP client for upstream tool APIs.
//!
//! One `reqwest::Client` backs every network tool so connections are pooled
//! across concurrent invocations. A per-host semaphore bounds how many
//! requests are in flight to any single upstream at once.

use reqwest::{Client, StatusCode, Url};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::domain::tools::ToolExecutionError;

/// Default in-flight request bound per upstream host.
pub const DEFAULT_MAX_CONNECTIONS_PER_HOST: usize = 8;

/// Default per-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ToolExecutionError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ToolExecutionError::parse(format!("invalid upstream response: {}", e)))
    }
}

/// Pooled client shared by the network tools.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    max_per_host: usize,
    hosts: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
}

impl UpstreamClient {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(max_per_host: usize, timeout: Duration) -> Result<Self, reqwest::Error> {
        let max_per_host = max_per_host.max(1);
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_per_host)
            .build()?;

        Ok(Self {
            client,
            max_per_host,
            hosts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn max_per_host(&self) -> usize {
        self.max_per_host
    }

    fn permits_for(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self
            .hosts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_host))),
        )
    }

    /// Issues a GET and returns the response whatever its status.
    ///
    /// Transport errors are stripped of the request URL, which may carry
    /// an API key in its query string.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        bearer_token: Option<&str>,
    ) -> Result<UpstreamResponse, ToolExecutionError> {
        let parsed = Url::parse(url).map_err(|e| {
            ToolExecutionError::invalid_argument(format!("invalid upstream URL: {}", e))
        })?;
        let host = parsed.host_str().unwrap_or_default().to_string();

        let permits = self.permits_for(&host);
        let _permit = permits
            .acquire_owned()
            .await
            .map_err(|_| ToolExecutionError::network("upstream connection pool closed"))?;

        let mut request = self.client.get(parsed).query(query);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        tracing::debug!(host = %host, status = status.as_u16(), "upstream response");
        Ok(UpstreamResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> ToolExecutionError {
    if err.is_timeout() {
        return ToolExecutionError::network("upstream request timed out");
    }
    if err.is_connect() {
        return ToolExecutionError::network(format!(
            "connection failed: {}",
            err.without_url()
        ));
    }
    ToolExecutionError::network(err.without_url().to_string())
}

/// Maps a non-success status to an execution error.
pub fn status_error(status: StatusCode, message: impl Into<String>) -> ToolExecutionError {
    ToolExecutionError::upstream(status.as_u16(), message)
}
