//! Error types for configuration and session operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A file could not be read or written.
    #[error("configuration io failed")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A file did not contain the expected JSON document.
    #[error("configuration file is not valid json")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            field,
            value: Some(value.into()),
            reason,
        }
    }

    /// One-line description including the structured context.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::InvalidField {
                field,
                value: Some(value),
                reason,
            } => format!("invalid {field} '{value}': {reason}"),
            Self::InvalidField {
                field,
                value: None,
                reason,
            } => format!("invalid {field}: {reason}"),
            Self::Io {
                operation,
                path,
                source,
            } => format!("failed to {operation} {}: {source}", path.display()),
            Self::Parse { path, source } => {
                format!("{} is not valid json: {source}", path.display())
            }
        }
    }
}

/// Convenience result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
