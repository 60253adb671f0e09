use axum::{Json, http::StatusCode, response::IntoResponse};
use reqwest::StatusCode as UpstreamStatus;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::{models::AddressError, storage::StorageError};

/// Failures while delivering a payload to the dashboard webhooks.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build webhook client")]
    ClientBuilder {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the connection dropped.
    #[error("failed to send webhook request to `{path}`")]
    RequestSend {
        /// Webhook path.
        path: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// No response arrived before the request timeout.
    #[error("webhook request to `{path}` timed out")]
    Timeout {
        /// Webhook path.
        path: String,
    },
    /// The receiver answered with a non-2xx status.
    #[error("unexpected webhook response status {status} for `{path}`")]
    RequestStatus {
        /// Webhook path.
        path: String,
        /// Status returned by the receiver.
        status: UpstreamStatus,
    },
}

impl TransportError {
    /// Whether another attempt may succeed. Client errors (4xx) will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ClientBuilder { .. } => false,
            TransportError::RequestSend { .. } | TransportError::Timeout { .. } => true,
            TransportError::RequestStatus { status, .. } => !status.is_client_error(),
        }
    }
}

/// Errors raised by the sync pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Requested game has no backing sheet.
    #[error("game `{game}` not found")]
    NotFound {
        /// Name of the missing game.
        game: String,
    },
    /// A balance or ticket cell holds data that cannot be used as a number.
    #[error("cell {cell} of game `{game}` is not numeric (found {value})")]
    NonNumericState {
        /// Game holding the cell.
        game: String,
        /// A1 address of the cell.
        cell: String,
        /// Offending value, JSON-encoded.
        value: String,
    },
    /// The dashboard could not be reached.
    #[error("webhook delivery failed")]
    Transport(#[from] TransportError),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SheetNotFound { sheet } => SyncError::NotFound { game: sheet },
        }
    }
}

impl From<AddressError> for SyncError {
    fn from(err: AddressError) -> Self {
        SyncError::InvalidInput(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current sheet contents.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Dashboard unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotFound { game } => AppError::NotFound(format!("game `{game}`")),
            err @ SyncError::NonNumericState { .. } => AppError::Conflict(err.to_string()),
            SyncError::Transport(source) => AppError::ServiceUnavailable(source.to_string()),
            SyncError::InvalidInput(message) => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
