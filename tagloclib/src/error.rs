//! Error types for tagloclib

use thiserror::Error;

/// Errors that can occur while reading history or building a report
#[derive(Error, Debug)]
pub enum TaglocError {
    /// The reference does not resolve to a tree in the repository
    #[error("could not read checkpoint '{reference}': {message}")]
    CheckpointNotFound { reference: String, message: String },

    /// No entry exists at the path in the checkpoint's tree
    #[error("'{path}' does not exist at '{reference}'")]
    FileNotFound { reference: String, path: String },

    /// The entry exists but has no readable content (directory, submodule)
    #[error("'{path}' at '{reference}' is not a file")]
    NotAFile { reference: String, path: String },

    /// The content is not valid UTF-8
    #[error("'{path}' at '{reference}' is not valid UTF-8 text")]
    NotText { reference: String, path: String },

    /// A classification pattern cannot be used
    #[error("invalid pattern '{pattern}' for category '{category}'")]
    InvalidPattern { category: String, pattern: String },

    /// The category name collides with the reserved label key
    #[error("category name '{0}' is reserved")]
    ReservedCategory(String),

    /// A checkpoint specification could not be parsed
    #[error("invalid checkpoint '{0}': expected TAG or TAG=LABEL")]
    InvalidCheckpoint(String),

    /// Git operation error
    #[error("git error: {0}")]
    Git(String),

    /// Chart rendering error
    #[error("chart error: {0}")]
    Chart(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
