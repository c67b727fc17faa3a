//! # HTTP API Errors
//!
//! Every failure the handlers can produce, with its status code and the
//! `{"error": ...}` body the client sees.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::countries::ValidationError;
use crate::observability::Event;
use crate::storage::StorageError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required field missing, empty, or not a string
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unsupported verb on a known path
    #[error("Method not allowed.")]
    MethodNotAllowed,

    /// The record store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A blocking store task was cancelled or panicked
    #[error("store task failed: {0}")]
    Task(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Server faults stay generic.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Task(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(event = %Event::StorageFailure, error = %self, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
