//! Error types for web handlers.
//!
//! Bridges domain errors and HTTP responses by implementing axum's
//! `IntoResponse`. Error bodies are JSON `{code, message}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use donelist_core::{TodoId, TodoServiceError};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type alias for web handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error type for web handlers.
#[derive(Debug)]
pub enum ApiError {
    /// No todo matches the addressed id.
    NotFound(TodoId),
    /// Request payload violates a model invariant.
    Validation(String),
    /// Request shape is wrong (e.g. missing required query flag).
    BadRequest(String),
    /// Unrecovered failure below the HTTP layer.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("todo with id {id} not found"),
            Self::Validation(message) | Self::BadRequest(message) => message.clone(),
            // Internal details stay in the logs.
            Self::Internal(_) => "an internal error occurred".to_string(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl Error for ApiError {}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            TodoServiceError::NotFound(id) => Self::NotFound(id),
            TodoServiceError::Validation(err) => Self::Validation(err.to_string()),
            TodoServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let detail = match &self {
                Self::Internal(detail) => detail.as_str(),
                _ => "",
            };
            error!(
                "event=request_failed module=web status=error http_status={} code={} detail={detail}",
                status.as_u16(),
                self.code()
            );
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
