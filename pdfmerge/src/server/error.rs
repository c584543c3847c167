//! HTTP error responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::MergeError;

/// Body of every processing failure.
pub const MERGE_FAILURE_BODY: &str = "Error merging PDFs";

/// Error returned by the merge handler.
///
/// Rendered as plain text. Only requester mistakes are described in the
/// body; everything else is logged and answered with a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request itself was unacceptable.
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// The body exceeded the configured limit.
    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    /// Reading, merging or writing failed.
    #[error(transparent)]
    Merge(MergeError),
}

impl AppError {
    /// Classify a failure to read the multipart body.
    pub fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }

    /// Status code this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Merge(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MergeError> for AppError {
    fn from(err: MergeError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Merge(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) | AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Rejected merge request ({}): {}", status, msg);
                msg
            }
            AppError::Merge(e) => {
                tracing::error!("Merge failed: {}", e);
                MERGE_FAILURE_BODY.to_string()
            }
        };

        (status, message).into_response()
    }
}
