//! Orchestrator configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::{DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_SYSTEM_PROMPT};

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Tool-call rounds allowed per turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=20).contains(&self.max_tool_rounds) {
            return Err(ValidationError::InvalidToolRounds);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_max_tool_rounds() -> u32 {
    DEFAULT_MAX_TOOL_ROUNDS
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
