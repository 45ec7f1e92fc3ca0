//! Error types for cinemerit-api
//!
//! Every handler returns [`ApiResult`]; the error side renders as
//! `{"error": {"code": ..., "message": ...}}`, plus a `fields` map for
//! validation failures.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinemerit_common::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more payload fields are missing or malformed (400)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// cinemerit-common error
    #[error(transparent)]
    Common(#[from] cinemerit_common::Error),
}

impl ApiError {
    /// Resolve common-library errors that map onto a client error
    fn classify(self) -> Self {
        match self {
            ApiError::Common(cinemerit_common::Error::NotFound(what)) => ApiError::NotFound(what),
            ApiError::Common(cinemerit_common::Error::Validation(errors)) => {
                ApiError::Validation(errors)
            }
            other => other,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Unreadable request bodies (bad JSON, wrong content type)
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.classify() {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": { "code": "NOT_FOUND", "message": msg } }),
            ),
            ApiError::Validation(fields) => {
                warn!("Rejected payload: {}", fields);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": {
                            "code": "VALIDATION_ERROR",
                            "message": "Invalid input.",
                            "fields": fields,
                        }
                    }),
                )
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "BAD_REQUEST", "message": msg } }),
            ),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": { "code": "INTERNAL_ERROR", "message": msg } }),
                )
            }
            ApiError::Common(err) => {
                error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": { "code": "INTERNAL_ERROR", "message": err.to_string() } }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
