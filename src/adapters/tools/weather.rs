//! Weather tool - current conditions from an OpenWeatherMap-compatible API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = WeatherConfig::new()
//!     .with_api_key(api_key)
//!     .with_cache_ttl(Duration::from_secs(300));
//!
//! let tool = WeatherTool::new(config, upstream);
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::upstream::{status_error, UpstreamClient};
use crate::domain::tools::{
    ParameterSchema, ParameterSpec, ParameterType, ToolArguments, ToolExecutionError,
};
use crate::ports::Tool;

pub const WEATHER_TOOL_NAME: &str = "get_weather";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub const DEFAULT_WEATHER_CACHE_TTL: Duration = Duration::from_secs(300);

/// Configuration for the weather tool.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    api_key: Option<Secret<String>>,
    pub base_url: String,
    pub cache_ttl: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            cache_ttl: DEFAULT_WEATHER_CACHE_TTL,
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

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Looks up current weather for a city.
pub struct WeatherTool {
    config: WeatherConfig,
    upstream: UpstreamClient,
    schema: ParameterSchema,
}

impl WeatherTool {
    pub fn new(config: WeatherConfig, upstream: UpstreamClient) -> Self {
        let schema = ParameterSchema::new()
            .with(ParameterSpec::required(
                "city",
                ParameterType::String,
                "City name to get weather for",
            ))
            .with(
                ParameterSpec::optional(
                    "weather_type",
                    ParameterType::String,
                    "Optional weather type (current, forecast, etc.)",
                )
                .with_default(serde_json::json!("current")),
            );

        Self {
            config,
            upstream,
            schema,
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        WEATHER_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get current weather information for any city"
    }

    fn parameter_schema(&self) -> &ParameterSchema {
        &self.schema
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String, ToolExecutionError> {
        let city = arguments.require_str("city")?;
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ToolExecutionError::not_configured("Weather API key"))?;

        let url = format!("{}/weather", self.config.base_url);
        let response = self
            .upstream
            .get(
                &url,
                &[("q", city), ("units", "metric"), ("appid", api_key)],
                None,
            )
            .await?;

        match response.status {
            status if status.is_success() => {
                let report: WeatherReport = response.json()?;
                report.describe(city)
            }
            StatusCode::NOT_FOUND => Err(status_error(
                response.status,
                format!("City '{}' not found. Please check the spelling.", city),
            )),
            StatusCode::UNAUTHORIZED => Err(status_error(
                response.status,
                "weather service rejected the API key",
            )),
            status => {
                tracing::warn!(status = status.as_u16(), city, "weather API error");
                Err(status_error(
                    status,
                    format!("Weather service temporarily unavailable for {}.", city),
                ))
            }
        }
    }

    fn cache_ttl(&self) -> Option<Duration> {
        Some(self.config.cache_ttl).filter(|ttl| !ttl.is_zero())
    }
}

#[derive(Debug, Deserialize)]
struct WeatherReport {
    /// Canonical city name as the service spells it.
    name: Option<String>,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<MainReadings>,
    #[serde(default)]
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

impl WeatherReport {
    fn describe(&self, city: &str) -> Result<String, ToolExecutionError> {
        let unparseable = || {
            ToolExecutionError::parse(format!(
                "Received weather data for {} but couldn't parse it properly.",
                city
            ))
        };
        let condition = self.weather.first().ok_or_else(unparseable)?;
        let main = self.main.as_ref().ok_or_else(unparseable)?;
        let city = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(city);

        let temp = main.temp.round() as i64;
        let feels_like = main.feels_like.round() as i64;

        let mut text = format!(
            "The weather in {} is {} with a temperature of {}°C",
            city,
            condition.description.to_lowercase(),
            temp
        );
        if feels_like != temp {
            text.push_str(&format!(" (feels like {}°C)", feels_like));
        }
        text.push_str(&format!(", humidity {}%", main.humidity));
        if self.wind.speed > 0.0 {
            text.push_str(&format!(", and wind speed {} m/s", self.wind.speed));
        }
        text.push('.');
        Ok(text)
    }
}
