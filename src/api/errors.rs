//! # API Errors
//!
//! Error types for the trivia request handlers.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Request handler errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Requested entity or route does not exist
    #[error("{0}")]
    NotFound(String),

    /// Wrong HTTP method for an existing path
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request body is malformed or rejected by the store
    #[error("Unprocessable request: {0}")]
    Validation(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store call exceeded its time budget
    #[error("Store did not respond within {}ms", .0.as_millis())]
    StoreTimeout(Duration),

    /// Unexpected store or runtime failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StoreTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients; internal details stay in the logs
    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(detail) => ApiError::Validation(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            error: err.status_code().as_u16(),
            message: err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
