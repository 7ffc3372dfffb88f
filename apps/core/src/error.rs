use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The corpus directory itself is missing or unreadable. Fatal at startup.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// The classification capability failed (transport, timeout, unusable ranking).
    /// Non-fatal: the router degrades to the `simple` route.
    #[error("Classification error: {0}")]
    Classification(String),

    /// An outbound collaborator (image generation, translation) failed.
    /// Non-fatal: surfaced to the user as textual content.
    #[error("External capability error: {0}")]
    Capability(String),

    /// Represents configuration-related errors (e.g., missing environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents data validation errors (e.g., invalid rule files).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Capability(format!("HTTP error: {}", err))
    }
}
