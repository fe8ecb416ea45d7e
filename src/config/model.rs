//! Language model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{OpenAICompatibleConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Model client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Which client backs the orchestrator
    #[serde(default)]
    pub provider: ModelProvider,

    /// API key for the chat-completions endpoint
    pub api_key: Option<Secret<String>>,

    /// OpenAI-compatible base URL (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
}

/// Model client type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Any OpenAI-compatible chat-completions API
    #[default]
    OpenAI,
    /// Canned answers, for offline runs
    Scripted,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Build the HTTP client configuration, `None` without an API key
    pub fn client_config(&self) -> Option<OpenAICompatibleConfig> {
        let api_key = self.api_key.as_ref().filter(|_| self.has_api_key())?;

        let mut config = OpenAICompatibleConfig::new(api_key.expose_secret().clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries);
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        Some(config)
    }

    /// Validate model configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ModelProvider::OpenAI && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("TOOL_AGENT__MODEL__API_KEY"));
        }

        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("model.base_url"));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("model.timeout_secs"));
        }

        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries("model.max_retries"));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }

        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
        }
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> ModelConfig {
        ModelConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.provider, ModelProvider::OpenAI);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_openai_requires_api_key() {
        assert_eq!(
            ModelConfig::default().validate(),
            Err(ValidationError::MissingRequired("TOOL_AGENT__MODEL__API_KEY"))
        );
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = ModelConfig {
            api_key: Some(Secret::new("   ".to_string())),
            ..Default::default()
        };
        assert!(!config.has_api_key());
        assert!(config.client_config().is_none());
    }

    #[test]
    fn test_scripted_needs_no_key() {
        let config = ModelConfig {
            provider: ModelProvider::Scripted,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = ModelConfig {
            temperature: Some(2.5),
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));

        let config = ModelConfig {
            max_retries: 11,
            ..with_key()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            base_url: "ftp://example.com".to_string(),
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUrl("model.base_url")));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", with_key());
        assert!(!debug.contains("sk-test"));
    }
}
