//! Error types for tool registration, argument validation and execution.

use thiserror::Error;

use super::ParameterType;
use crate::domain::expression::EvaluationError;

/// Registry failures. Duplicate names are a startup error; lookups of
/// unknown names happen per request and are recovered by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateToolName(String),

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),
}

/// Arguments rejected before a tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("Parameter '{0}' must not be empty")]
    EmptyParameter(String),

    #[error("Parameter '{name}' must be of type {expected}")]
    InvalidType {
        name: String,
        expected: ParameterType,
    },

    #[error("Parameter '{name}' must be {bounds}")]
    OutOfRange { name: String, bounds: String },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Arguments must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// Name of the offending parameter, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::MissingParameter(name)
            | Self::EmptyParameter(name)
            | Self::UnknownParameter(name) => Some(name),
            Self::InvalidType { name, .. } | Self::OutOfRange { name, .. } => Some(name),
            Self::NotAnObject => None,
        }
    }
}

/// Failure raised by a tool's own execution.
///
/// Messages must never contain credentials. Upstream adapters strip URLs
/// from transport errors before constructing these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolExecutionError {
    /// The arguments passed validation but the tool could not use them.
    #[error("{0}")]
    InvalidArgument(String),

    /// A required credential or endpoint is missing from configuration.
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// The upstream API answered with a non-success status.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    /// The upstream response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ToolExecutionError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a later attempt might succeed.
    ///
    /// Transport failures, rate limiting and 5xx responses are transient.
    /// Bad arguments, missing configuration and other 4xx responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Upstream { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::InvalidArgument(_) | Self::NotConfigured(_) | Self::Parse(_) => false,
        }
    }
}

impl From<EvaluationError> for ToolExecutionError {
    fn from(err: EvaluationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
