//! Error handling for the Owl HTTP layer

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Header carrying the id logged alongside every error response.
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// Body of every error response.
///
/// `detail` is a message string for single-cause errors and an array of
/// `{field, error}` objects for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    /// Create a validation error for a single field
    pub fn invalid_field(field: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        Self::validation(
            vec![json!({"field": field, "error": error})],
            format!("invalid field '{field}'"),
        )
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::now_v7();
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                error_code = code,
                status_code = status.as_u16(),
                error = %self,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                error_code = code,
                status_code = status.as_u16(),
                error = %self,
                "request rejected"
            );
        }

        let detail = match self {
            AppError::Validation { details, .. } => serde_json::Value::Array(details),
            AppError::NotFound { message } => serde_json::Value::String(message),
            // Internal details stay in the logs for release builds.
            AppError::Internal(e) => {
                if cfg!(debug_assertions) {
                    serde_json::Value::String(e.to_string())
                } else {
                    serde_json::Value::String("an internal server error occurred".to_string())
                }
            }
        };

        let mut response = (status, Json(ErrorBody { detail })).into_response();
        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
            response.headers_mut().insert(TRACE_ID_HEADER, value);
        }
        response
    }
}

/// Any body that cannot be read as the expected JSON document (bad syntax,
/// wrong shape, empty, or sent without a JSON content type) is a
/// validation failure on `body`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_field("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid_field("path", rejection.body_text())
    }
}
