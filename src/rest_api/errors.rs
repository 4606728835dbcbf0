//! # REST API Errors
//!
//! Maps storage and validation failures onto HTTP responses. Bodies look
//! like `{"detail": "...", "errors": ["..."]}`; `errors` is present only for
//! validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::schema::ValidationError;
use crate::storage::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Payload rejected against the inferred schema
    #[error("Validation failed")]
    Validation(#[from] ValidationError),

    /// Record not found
    #[error("Not found")]
    NotFound,

    /// Resource name not configured
    #[error("Resource '{0}' not found")]
    ResourceNotFound(String),

    // ==================
    // Storage Errors
    // ==================
    /// Failure inside the record store
    #[error("{0}")]
    Store(StoreError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Internal error, e.g. a blocking task panicked
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RestError::NotFound,
            other => RestError::Store(other),
        }
    }
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            RestError::Store(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        let errors = match err {
            RestError::Validation(v) => Some(v.messages()),
            _ => None,
        };
        Self {
            detail: err.to_string(),
            errors,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else if status != StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, FieldViolation};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidQueryParam("limit".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RestError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_propagation() {
        let err = RestError::from(StoreError::NotFound { key: "9".into() });
        assert!(matches!(err, RestError::NotFound));

        let err = RestError::from(StoreError::LockTimeout {
            path: PathBuf::from("users.csv"),
            waited: Duration::from_secs(5),
        });
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_body_lists_errors() {
        let err = RestError::from(ValidationError::Fields(vec![FieldViolation::new(
            "age",
            ColumnType::Integer,
            "old",
        )]));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["detail"], "Validation failed");
        assert_eq!(body["errors"][0], "Field 'age': Expected integer, got 'old'");
    }

    #[test]
    fn test_plain_body_has_no_errors_key() {
        let body = serde_json::to_value(ErrorResponse::from(&RestError::NotFound)).unwrap();
        assert_eq!(body, serde_json::json!({"detail": "Not found"}));
    }
}
