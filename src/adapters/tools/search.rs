//! Web search tool backed by a Tavily-compatible search API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::upstream::{status_error, UpstreamClient};
use crate::domain::tools::{
    ParameterSchema, ParameterSpec, ParameterType, ToolArguments, ToolExecutionError,
};
use crate::ports::Tool;

pub const SEARCH_TOOL_NAME: &str = "search_web";

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.tavily.com";

pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 5;

/// Upper bound a caller may request.
pub const MAX_SEARCH_RESULTS: u32 = 10;

/// Result summaries longer than this are cut and marked with "...".
const SUMMARY_LIMIT: usize = 200;

/// Configuration for the search tool.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    api_key: Option<Secret<String>>,
    pub base_url: String,
    pub max_results: u32,
    pub include_answer: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
            include_answer: true,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, MAX_SEARCH_RESULTS);
        self
    }

    pub fn with_include_answer(mut self, include_answer: bool) -> Self {
        self.include_answer = include_answer;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Searches the web and formats the top hits.
pub struct SearchTool {
    config: SearchConfig,
    upstream: UpstreamClient,
    schema: ParameterSchema,
}

impl SearchTool {
    pub fn new(config: SearchConfig, upstream: UpstreamClient) -> Self {
        let schema = ParameterSchema::new()
            .with(ParameterSpec::required(
                "query",
                ParameterType::String,
                "Search query to find information about",
            ))
            .with(
                ParameterSpec::optional(
                    "max_results",
                    ParameterType::Integer,
                    "Maximum number of search results to return (default: 5)",
                )
                .with_default(serde_json::json!(config.max_results))
                .with_range(1.0, MAX_SEARCH_RESULTS as f64),
            );

        Self {
            config,
            upstream,
            schema,
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the internet for current information, news, facts, and answers to questions"
    }

    fn parameter_schema(&self) -> &ParameterSchema {
        &self.schema
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError> {
        let query = arguments.require_str("query")?;
        let max_results = arguments
            .get_i64("max_results")
            .map(|n| n.clamp(1, MAX_SEARCH_RESULTS as i64) as u32)
            .unwrap_or(self.config.max_results);
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ToolExecutionError::not_configured("Search API key"))?;

        let url = format!("{}/search", self.config.base_url);
        let max_results = max_results.to_string();
        let include_answer = self.config.include_answer.to_string();
        let response = self
            .upstream
            .get(
                &url,
                &[
                    ("query", query),
                    ("max_results", max_results.as_str()),
                    ("include_answer", include_answer.as_str()),
                ],
                Some(api_key),
            )
            .await?;

        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "search API error");
            return Err(status_error(
                response.status,
                format!("Unable to perform search for '{}' at the moment.", query),
            ));
        }

        let results: SearchResponse = response.json()?;
        tracing::debug!(results = results.results.len(), "search completed");
        Ok(results.format(query, self.config.include_answer))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

impl SearchResponse {
    fn format(&self, query: &str, include_answer: bool) -> String {
        if self.results.is_empty() {
            return format!("No search results found for '{}'.", query);
        }

        let mut text = format!("Search results for '{}':\n\n", query);

        if include_answer {
            if let Some(answer) = self.answer.as_deref().filter(|a| !a.trim().is_empty()) {
                text.push_str(&format!("**Quick Answer:** {}\n\n", answer));
            }
        }

        for (i, hit) in self.results.iter().enumerate() {
            let title = hit.title.as_deref().unwrap_or("No title");
            let url = hit.url.as_deref().unwrap_or("No URL");
            let summary = truncate(
                hit.content.as_deref().unwrap_or("No content available"),
                SUMMARY_LIMIT,
            );
            text.push_str(&format!(
                "{}. **{}**\n   URL: {}\n   Summary: {}\n\n",
                i + 1,
                title,
                url,
                summary
            ));
        }

        text.trim_end().to_string()
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut)
}
