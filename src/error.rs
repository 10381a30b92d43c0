//! Handler error type
//!
//! Every failure after input validation ends up here and is rendered as a
//! single `{"error": "<message>"}` body. No partial data is ever returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// url/username/password absent or empty
    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Upstream HTTP call failed (network error, timeout or non-2xx status)
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Upstream answered but reported invalid credentials
    #[error("Invalid credentials or authentication failed")]
    AuthenticationFailed,

    /// Upstream answered with JSON that does not match the expected records
    #[error("{0}")]
    InvalidUpstreamResponse(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameters => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UpstreamUnavailable(_)
            | AppError::AuthenticationFailed
            | AppError::InvalidUpstreamResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingParameters => "missing_parameters",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::UpstreamUnavailable(_) => "upstream_unavailable",
            AppError::AuthenticationFailed => "authentication_failed",
            AppError::InvalidUpstreamResponse(_) => "invalid_upstream_response",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
