//! Helper types for cleaner route handlers.
//!
//! Converts core errors into `{ "error": ... }` JSON responses with the
//! status code their class calls for.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lingua_dispatch_core::{Error, ProviderFailure};
use serde_json::{Value, json};

/// Standard result type for JSON route handlers.
pub type RouteResult<T> = Result<T, ApiError>;

/// An error response: status plus the `error` payload.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: Value::String(message.into()),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { .. } | Error::UnsupportedModel(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            Error::Provider {
                kind: ProviderFailure::Status { status, body },
                ..
            } => Self {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                error: body,
            },
            Error::Provider {
                kind: ProviderFailure::Timeout,
                ..
            } => Self::new(StatusCode::GATEWAY_TIMEOUT, err.to_string()),
            Error::Provider { .. } | Error::Configuration(_) | Error::Storage(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Unreadable bodies are client errors like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.error }))).into_response()
    }
}
