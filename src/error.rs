//! Error types for the upload pipeline and the HTTP surface around it.

use axum::{extract::multipart::MultipartError, http::StatusCode};
use thiserror::Error;

/// Main error type for upload operations.
#[derive(Error, Debug)]
pub enum UploadError {
    // Request validation errors
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid repository name: expected owner/repo")]
    InvalidRepoName,

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    // Remote API errors. The remote's own message is kept verbatim so the
    // form can show it as-is.
    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    RateLimitExceeded(String),

    #[error("failed to find default branch for repo: {0}")]
    MissingDefaultBranch(String),

    #[error("ref {0} does not point at a commit")]
    UnexpectedRefTarget(String),

    // Local staging errors
    #[error("{0}")]
    LocalIo(#[from] std::io::Error),
}

/// Result type alias using UploadError
pub type Result<T> = std::result::Result<T, UploadError>;

impl UploadError {
    /// Create a remote error with the message surfaced to the caller
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Whether the error was detected before any remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::InvalidRepoName
                | Self::InvalidMultipart(_)
                | Self::PayloadTooLarge(_)
        )
    }

    /// HTTP status used when reporting this error to the form.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            err if err.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// GitHub API errors carry a human readable message (e.g. "Bad credentials")
// which is what the caller gets to see.
impl From<octocrab::Error> for UploadError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded(source.message.clone())
            }
            octocrab::Error::GitHub { source, .. } => {
                Self::Remote(source.message.clone())
            }
            _ => Self::Remote(err.to_string()),
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        // The body limit surfaces as a multipart error while streaming.
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::InvalidMultipart(err.body_text())
        }
    }
}
