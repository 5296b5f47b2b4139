//! Error types for chirp-proxy HTTP handlers
//!
//! Error bodies use `{"detail": <message>, "code": <CODE>}`. Upstream failures
//! of synchronous proxy calls all surface as 500; the upstream status is only
//! visible inside the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::prompts::PromptError;
use crate::services::UpstreamError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed bearer token (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Upstream call failed (500)
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// chirp-common error
    #[error(transparent)]
    Common(#[from] chirp_common::Error),
}

impl From<PromptError> for ApiError {
    fn from(err: PromptError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Common(_) => (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %self, "Request failed");
        }

        let body = Json(json!({
            "detail": self.to_string(),
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
