//! HTTP error boundary
//!
//! Every handler returns `Result<_, ApiError>`. Messages go out as plain
//! text, field validation failures as a JSON object keyed by field name.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::domain::{DomainError, OibError};

/// Prefix of every catch-all 500 response.
pub const UNEXPECTED_ERROR_PREFIX: &str = "An unexpected error occurred: ";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidOib(#[from] OibError),

    #[error("{0}")]
    AlreadyExists(String),

    /// Malformed request argument or body
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Field name (as sent by the client) to message
    #[error("Validation failed")]
    FieldErrors(BTreeMap<String, String>),

    #[error("Active file already exists with file name: {0}")]
    ActiveFileExists(String),

    /// Export failure reported with a fixed message
    #[error("{0}")]
    ExportFailed(&'static str),

    #[error("{0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            DomainError::Storage(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidOib(_)
            | Self::AlreadyExists(_)
            | Self::BadRequest(_)
            | Self::FieldErrors(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ActiveFileExists(_) | Self::ExportFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::FieldErrors(fields) => (status, Json(fields)).into_response(),
            Self::ExportFailed(message) => (status, message).into_response(),
            Self::ActiveFileExists(_) | Self::Internal(_) => {
                error!(error = %self, "Request failed");
                (status, format!("{}{}", UNEXPECTED_ERROR_PREFIX, self)).into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}
