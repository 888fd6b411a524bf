//! Error types module
//!
//! Every failure of the upload client is reported through [`UploadError`].
//! Callers see a single failure channel carrying a human-readable message;
//! the variant tells the retry loop whether another attempt can help.

use std::io;
use std::time::Duration;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Pre-flight size/type rejection. Raised before any network call.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Network failure or a non-2xx answer from the storage data plane.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Missing ETag or a negative verification answer.
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// The control plane rejected the call or answered with an unexpected body.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UploadError {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "VALIDATION_ERROR",
            UploadError::Transport(_) => "TRANSPORT_ERROR",
            UploadError::Timeout(_) => "TIMEOUT",
            UploadError::Integrity(_) => "INTEGRITY_ERROR",
            UploadError::Server { .. } => "SERVER_ERROR",
            UploadError::Config(_) => "CONFIG_ERROR",
            UploadError::Cancelled => "CANCELLED",
            UploadError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether another attempt of the same transfer unit may succeed.
    ///
    /// Control-plane rejections are only retried for 5xx and 429 answers;
    /// a 4xx means the request itself is wrong.
    pub fn is_retryable(&self) -> bool {
        match self {
            UploadError::Transport(_) | UploadError::Timeout(_) | UploadError::Integrity(_) => true,
            UploadError::Server { status, .. } => *status >= 500 || *status == 429,
            UploadError::Validation(_)
            | UploadError::Config(_)
            | UploadError::Cancelled
            | UploadError::Io(_) => false,
        }
    }

    /// Build a `Server` error for a 2xx answer whose body did not match the schema.
    pub fn invalid_response(status: u16, detail: impl std::fmt::Display) -> Self {
        UploadError::Server {
            status,
            message: format!("Invalid response: {}", detail),
        }
    }
}
