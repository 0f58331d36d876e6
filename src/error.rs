use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Custom error type for hub_relay operations
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HipChat API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Helper type for Results that use RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

/// Reasons an inbound webhook is rejected before anything is forwarded.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Only POST methods supported")]
    MethodNotAllowed,

    #[error("error parsing url: {0}")]
    MalformedUrl(String),

    #[error("Auth info incorrect")]
    Unauthorized,

    #[error("error reading body: {0}")]
    UnreadableBody(String),

    #[error("error parsing json body: {0}")]
    MalformedBody(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::MalformedUrl(_) | WebhookError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Unauthorized => StatusCode::UNAUTHORIZED,
            // body over MAX_BODY_BYTES
            WebhookError::UnreadableBody(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
