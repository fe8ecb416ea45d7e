//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the `config`
//! and `dotenvy` crates. Variables use the `TOOL_AGENT` prefix and `__` between
//! nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use tool_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod agent;
mod error;
mod executor;
mod model;
mod server;
mod tools;

pub use agent::AgentConfig;
pub use error::{ConfigError, ValidationError};
pub use executor::ExecutorConfig;
pub use model::{ModelConfig, ModelProvider};
pub use server::{Environment, ServerConfig};
pub use tools::ToolsConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment deserializes. Only
/// [`AppConfig::validate`] decides whether the result is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model client
    #[serde(default)]
    pub model: ModelConfig,

    /// Weather/search credentials and upstream HTTP limits
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Tool invocation timeout and retry policy
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Conversation loop settings
    #[serde(default)]
    pub agent: AgentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TOOL_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TOOL_AGENT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TOOL_AGENT__EXECUTOR__TIMEOUT_MS=5000` -> `executor.timeout_ms = 5000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TOOL_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.model.validate()?;
        self.tools.validate()?;
        self.executor.validate()?;
        self.agent.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TOOL_AGENT__MODEL__API_KEY",
        "TOOL_AGENT__MODEL__PROVIDER",
        "TOOL_AGENT__SERVER__PORT",
        "TOOL_AGENT__SERVER__ENVIRONMENT",
        "TOOL_AGENT__EXECUTOR__TIMEOUT_MS",
        "TOOL_AGENT__AGENT__MAX_TOOL_ROUNDS",
        "TOOL_AGENT__TOOLS__WEATHER_API_KEY",
        "TOOL_AGENT__TOOLS__SEARCH_MAX_RESULTS",
    ];

    fn set_minimal_env() {
        env::set_var("TOOL_AGENT__MODEL__API_KEY", "test-model-key");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner())
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = lock();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.model.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = lock();
        set_minimal_env();
        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.executor.timeout(), Duration::from_millis(5000));
        assert_eq!(config.executor.max_retries, 2);
        assert_eq!(config.agent.max_tool_rounds, 5);
        assert_eq!(config.tools.search_max_results, 5);
        assert!(config.tools.search_include_answer);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = lock();
        set_minimal_env();
        env::set_var("TOOL_AGENT__SERVER__PORT", "3000");
        env::set_var("TOOL_AGENT__SERVER__ENVIRONMENT", "production");
        env::set_var("TOOL_AGENT__EXECUTOR__TIMEOUT_MS", "750");
        env::set_var("TOOL_AGENT__AGENT__MAX_TOOL_ROUNDS", "3");
        env::set_var("TOOL_AGENT__TOOLS__WEATHER_API_KEY", "owm-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.executor.timeout(), Duration::from_millis(750));
        assert_eq!(config.agent.max_tool_rounds, 3);
        assert!(config.tools.weather_api_key.is_some());
    }

    #[test]
    fn test_missing_model_key_fails_validation() {
        let _guard = lock();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("TOOL_AGENT__MODEL__API_KEY"))
        );
    }

    #[test]
    fn test_scripted_provider_validates_without_keys() {
        let _guard = lock();
        env::set_var("TOOL_AGENT__MODEL__PROVIDER", "scripted");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.model.provider, ModelProvider::Scripted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_section_value_fails_validation() {
        let _guard = lock();
        set_minimal_env();
        env::set_var("TOOL_AGENT__TOOLS__SEARCH_MAX_RESULTS", "50");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(
            result.unwrap().validate(),
            Err(ValidationError::InvalidSearchMaxResults)
        );
    }
}
