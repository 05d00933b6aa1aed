//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service and how each failure
//! class is rendered as an HTTP response.

use crate::config::ConfigError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use study_buddy_core::ports::PortError;
use tracing::{error, warn};
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The JSON body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Port(PortError::Validation(message.into()))
    }

    /// The taxonomy name reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Port(e) => match e {
                PortError::Configuration(_) => "ConfigurationError",
                PortError::Validation(_) => "ValidationError",
                PortError::UnsupportedMediaType(_) => "UnsupportedMediaType",
                PortError::Extraction(_) => "ExtractionError",
                PortError::Generation(_) => "GenerationError",
                PortError::MalformedGeneration(_) => "MalformedGenerationError",
                PortError::Authentication(_) => "AuthenticationError",
                PortError::AccessDenied(_) => "AccessDeniedError",
                PortError::RateLimited(_) => "RateLimitedError",
                PortError::Synthesis(_) => "SynthesisError",
                PortError::NotFound(_) => "NotFound",
                PortError::Unauthorized => "Unauthorized",
                PortError::Forbidden => "Forbidden",
                PortError::Unexpected(_) => "InternalError",
            },
            ApiError::Config(_) => "ConfigurationError",
            ApiError::Io(_) | ApiError::Internal(_) => "InternalError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(e) => match e {
                PortError::Validation(_) | PortError::UnsupportedMediaType(_) => {
                    StatusCode::BAD_REQUEST
                }
                PortError::Authentication(_) | PortError::Unauthorized => StatusCode::UNAUTHORIZED,
                PortError::AccessDenied(_) | PortError::Forbidden => StatusCode::FORBIDDEN,
                PortError::NotFound(_) => StatusCode::NOT_FOUND,
                PortError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                PortError::Configuration(_)
                | PortError::Extraction(_)
                | PortError::Generation(_)
                | PortError::MalformedGeneration(_)
                | PortError::Synthesis(_)
                | PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "Request failed: {}", self);
        } else {
            warn!(kind = self.kind(), status = status.as_u16(), "Request rejected: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
