//! Error types shared across the registry, session, and marketplace layers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing registry and session documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error for every fallible operation in the crate.
///
/// Absence (unknown record name) is not an error at the registry layer; it is
/// reported as `None` / `false`. `NotFound` is only produced by callers that
/// require a record to exist.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("Not logged in. Run 'agenco login' or set AGENCO_TOKEN")]
    NotLoggedIn,

    #[error("Remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Input error: {0}")]
    Input(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<dialoguer::Error> for ApiError {
    fn from(err: dialoguer::Error) -> Self {
        ApiError::Input(format!("Failed to get user input: {}", err))
    }
}
