//! Error types for braintrust-export
//!
//! This module provides the error taxonomy for an export run:
//! - Fatal run-level errors (configuration, project resolution, listing calls)
//! - Item-level errors (fetching or writing a single experiment/dataset)
//! - Process exit code and machine-readable error code mapping

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ExportKind;

/// Result type alias for braintrust-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for braintrust-export
///
/// Each variant carries enough context to name the failing stage in a log line.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment variable or option that caused the error (e.g., "PROJECT_NAME")
        key: Option<String>,
    },

    /// The project lookup returned no matches
    #[error("project '{name}' was not found")]
    ProjectNotFound {
        /// The project name that was looked up
        name: String,
    },

    /// A lookup or listing call failed (non-2xx status, network failure, or unreadable body)
    #[error("request to {url} failed: {reason}")]
    RemoteRequest {
        /// The URL that was requested
        url: String,
        /// Why the request failed
        reason: String,
    },

    /// Fetching or flattening one experiment/dataset failed
    #[error("failed to export {kind} '{name}': {reason}")]
    ExportItem {
        /// Whether the item is an experiment or a dataset
        kind: ExportKind,
        /// The item name as returned by the listing call
        name: String,
        /// Why the export failed
        reason: String,
    },

    /// Persisting output to disk failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file or directory being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Returns true if the error only concerns a single experiment/dataset
    ///
    /// Item-level errors are subject to the configured
    /// [`FailurePolicy`](crate::config::FailurePolicy); every other error ends the run.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            Error::ExportItem { .. } | Error::Write { .. } | Error::Csv(_)
        )
    }
}

/// Map errors to process exit status and machine-readable codes
pub trait ToExitCode {
    /// Process exit status to report for this error
    fn exit_code(&self) -> u8;

    /// Machine-readable error code, stable across releases
    fn error_code(&self) -> &str;
}

impl ToExitCode for Error {
    fn exit_code(&self) -> u8 {
        match self {
            // Usage errors: nothing was attempted
            Error::Config { .. } => 2,

            Error::ProjectNotFound { .. } => 1,
            Error::RemoteRequest { .. } => 1,
            Error::ExportItem { .. } => 1,
            Error::Write { .. } => 1,
            Error::Csv(_) => 1,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::ProjectNotFound { .. } => "project_not_found",
            Error::RemoteRequest { .. } => "remote_request_failed",
            Error::ExportItem { .. } => "export_item_failed",
            Error::Write { .. } => "write_failed",
            Error::Csv(_) => "write_failed",
        }
    }
}
