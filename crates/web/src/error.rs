//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Responses carry only the standard status text (e.g. `Bad Request`);
//! details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crm_core::{SearchError, ValidationError};

use crate::db::{RepositoryError, WriteError};

/// Application-level error type for the customer records site.
#[derive(Debug, Error)]
pub enum AppError {
    /// A read from the record store failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// A create or update failed.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Submitted customer fields failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Search query could not be split into name tokens.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required parameter was missing, empty, or unparsable.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Route exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Write(err) => match err {
                WriteError::NotFound(_) => StatusCode::NOT_FOUND,
                WriteError::Begin(_)
                | WriteError::StatementFailed(_)
                | WriteError::CommitFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) | Self::Search(_) | Self::MalformedInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let message = status.canonical_reason().unwrap_or_default();
        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
