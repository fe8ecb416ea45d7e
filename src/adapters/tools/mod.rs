//! Tool adapters - concrete implementations of the `Tool` port.
//!
//! - `CalculatorTool` - safe arithmetic (pure)
//! - `WeatherTool` - current conditions from OpenWeatherMap
//! - `SearchTool` - web search via Tavily
//! - `ScriptedTool` - scripted spy for tests

mod calculator;
mod scripted;
mod search;
mod upstream;
mod weather;

use std::sync::Arc;

use crate::application::ToolRegistry;
use crate::domain::tools::RegistryError;

pub use calculator::{format_number, CalculatorTool, CALCULATOR_TOOL_NAME};
pub use scripted::ScriptedTool;
pub use search::{
    SearchConfig, SearchTool, DEFAULT_SEARCH_BASE_URL, DEFAULT_SEARCH_MAX_RESULTS,
    MAX_SEARCH_RESULTS, SEARCH_TOOL_NAME,
};
pub use upstream::{
    status_error, UpstreamClient, UpstreamResponse, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_MAX_CONNECTIONS_PER_HOST,
};
pub use weather::{
    WeatherConfig, WeatherTool, DEFAULT_WEATHER_BASE_URL, DEFAULT_WEATHER_CACHE_TTL,
    WEATHER_TOOL_NAME,
};

/// Builds the registry of built-in tools: weather, calculator, search.
///
/// # Errors
///
/// `DuplicateToolName` if two built-ins share a name. Treated as fatal at
/// startup.
pub fn builtin_registry(
    weather: WeatherConfig,
    search: SearchConfig,
    upstream: UpstreamClient,
) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new()
        .with_tool(Arc::new(WeatherTool::new(weather, upstream.clone())))?
        .with_tool(Arc::new(CalculatorTool::new()))?
        .with_tool(Arc::new(SearchTool::new(search, upstream)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builtin_registry_has_three_tools_in_order() {
        let upstream = UpstreamClient::new(2, Duration::from_secs(1)).unwrap();
        let registry =
            builtin_registry(WeatherConfig::new(), SearchConfig::new(), upstream).unwrap();

        assert_eq!(
            registry.names(),
            vec![WEATHER_TOOL_NAME, CALCULATOR_TOOL_NAME, SEARCH_TOOL_NAME]
        );
    }

    #[test]
    fn exported_schemas_have_function_calling_shape() {
        let upstream = UpstreamClient::new(2, Duration::from_secs(1)).unwrap();
        let registry =
            builtin_registry(WeatherConfig::new(), SearchConfig::new(), upstream).unwrap();

        for spec in registry.export_schemas() {
            let parameters = spec.parameters();
            assert_eq!(parameters["type"], "object");
            assert!(parameters["properties"].is_object());
            assert!(parameters["required"].is_array());
            assert!(!spec.description().is_empty());
        }
    }
}
