//! Built-in tool configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::model::is_http_url;
use crate::adapters::tools::{
    SearchConfig, WeatherConfig, DEFAULT_SEARCH_BASE_URL, DEFAULT_SEARCH_MAX_RESULTS,
    DEFAULT_WEATHER_BASE_URL, MAX_SEARCH_RESULTS,
};

/// Weather, search and shared upstream HTTP settings
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// OpenWeatherMap API key
    pub weather_api_key: Option<Secret<String>>,

    #[serde(default = "default_weather_base_url")]
    pub weather_api_base_url: String,

    /// Seconds a weather answer is served from cache, 0 disables caching
    #[serde(default = "default_weather_cache_ttl")]
    pub weather_cache_ttl_secs: u64,

    /// Tavily API key
    pub search_api_key: Option<Secret<String>>,

    #[serde(default = "default_search_base_url")]
    pub search_api_base_url: String,

    #[serde(default = "default_search_max_results")]
    pub search_max_results: u32,

    #[serde(default = "default_true")]
    pub search_include_answer: bool,

    /// In-flight upstream requests allowed per host
    #[serde(default = "default_max_connections")]
    pub max_connections_per_host: usize,

    /// Upstream HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl ToolsConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn weather_config(&self) -> WeatherConfig {
        let mut config = WeatherConfig::new()
            .with_base_url(self.weather_api_base_url.clone())
            .with_cache_ttl(Duration::from_secs(self.weather_cache_ttl_secs));
        if let Some(key) = &self.weather_api_key {
            config = config.with_api_key(key.expose_secret().clone());
        }
        config
    }

    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new()
            .with_base_url(self.search_api_base_url.clone())
            .with_max_results(self.search_max_results)
            .with_include_answer(self.search_include_answer);
        if let Some(key) = &self.search_api_key {
            config = config.with_api_key(key.expose_secret().clone());
        }
        config
    }

    /// Validate tool configuration
    ///
    /// Missing API keys are allowed; the affected tool reports itself as not
    /// configured when called.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.weather_api_base_url) {
            return Err(ValidationError::InvalidUrl("tools.weather_api_base_url"));
        }
        if !is_http_url(&self.search_api_base_url) {
            return Err(ValidationError::InvalidUrl("tools.search_api_base_url"));
        }
        if self.search_max_results == 0 || self.search_max_results > MAX_SEARCH_RESULTS {
            return Err(ValidationError::InvalidSearchMaxResults);
        }
        if self.max_connections_per_host == 0 || self.max_connections_per_host > 256 {
            return Err(ValidationError::InvalidConnectionLimit);
        }
        if self.http_timeout_secs == 0 || self.http_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("tools.http_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_api_base_url: default_weather_base_url(),
            weather_cache_ttl_secs: default_weather_cache_ttl(),
            search_api_key: None,
            search_api_base_url: default_search_base_url(),
            search_max_results: default_search_max_results(),
            search_include_answer: true,
            max_connections_per_host: default_max_connections(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_weather_cache_ttl() -> u64 {
    300
}

fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

fn default_search_max_results() -> u32 {
    DEFAULT_SEARCH_MAX_RESULTS
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> usize {
    8
}

fn default_http_timeout() -> u64 {
    10
}
