//! Error responses shared by the HTTP adapters.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::application::{HandleMessageError, OrchestratorError};
use crate::domain::foundation::IdError;
use crate::domain::tools::RegistryError;
use crate::ports::ModelError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    Chat(HandleMessageError),
    Registry(RegistryError),
}

impl From<HandleMessageError> for ApiError {
    fn from(err: HandleMessageError) -> Self {
        Self::Chat(err)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            Self::Chat(HandleMessageError::EmptyMessage)
            | Self::Chat(HandleMessageError::MessageTooLong { .. }) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            Self::Chat(HandleMessageError::Orchestrator(OrchestratorError::Cancelled)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "TURN_CANCELLED")
            }
            Self::Chat(HandleMessageError::Orchestrator(OrchestratorError::Model(err))) => {
                model_status(err)
            }
            Self::Registry(RegistryError::ToolNotFound(_)) => {
                (StatusCode::NOT_FOUND, "TOOL_NOT_FOUND")
            }
            Self::Registry(RegistryError::DuplicateToolName(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

fn model_status(err: &ModelError) -> (StatusCode, &'static str) {
    match err {
        ModelError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "MODEL_RATE_LIMITED"),
        ModelError::NotConfigured(_) | ModelError::AuthenticationFailed => {
            (StatusCode::SERVICE_UNAVAILABLE, "MODEL_NOT_CONFIGURED")
        }
        ModelError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "MODEL_TIMEOUT"),
        _ => (StatusCode::BAD_GATEWAY, "MODEL_UNAVAILABLE"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = self.status_and_code();
        let message = match &self {
            Self::InvalidRequest(message) => message.clone(),
            Self::Chat(err) => err.to_string(),
            Self::Registry(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error_code, %message, "request failed");
        }

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
