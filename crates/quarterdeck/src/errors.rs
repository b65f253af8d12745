//! Error types for the quarterdeck crate.

use serde::Serialize;
use thiserror::Error;

/// Machine-readable error kind carried in the tool result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUser,
    Validation,
    TaskNotFound,
    SectionNotFound,
    DocumentNotFound,
    Io,
}

/// Errors surfaced by the storage engines and the tool layer
#[derive(Error, Debug, Clone)]
pub enum QuarterdeckError {
    #[error("Invalid user name provided")]
    InvalidUser,

    #[error("Invalid input: {reason}")]
    Validation { reason: String },

    #[error("Task with ID {task_id} not found in {user}'s list")]
    TaskNotFound { user: String, task_id: u32 },

    #[error("Article not found: '{title}'")]
    SectionNotFound { title: String },

    #[error("File not found: {path}")]
    DocumentNotFound { path: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("I/O failure: {reason}")]
    Io { reason: String },
}

impl QuarterdeckError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// The stable kind string reported to the orchestration layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUser => ErrorKind::InvalidUser,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::TaskNotFound { .. } => ErrorKind::TaskNotFound,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::DocumentNotFound { .. } => ErrorKind::DocumentNotFound,
            Self::FileReadError { .. } | Self::FileWriteError { .. } | Self::Io { .. } => {
                ErrorKind::Io
            }
        }
    }
}

impl From<std::io::Error> for QuarterdeckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for quarterdeck operations
pub type QuarterdeckResult<T> = Result<T, QuarterdeckError>;
