//! Error types for transport calls and row actions.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the REST API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed")]
    Request {
        /// Operation being attempted.
        operation: &'static str,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("server rejected request")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Most specific message found in the response body.
        message: Option<String>,
    },
    /// A success response carried an unreadable body.
    #[error("response body is not valid json")]
    InvalidBody {
        /// Parser diagnostic.
        detail: String,
    },
    /// A resource path could not be joined onto the base URL.
    #[error("invalid request url")]
    InvalidUrl {
        /// Path that failed to join.
        path: String,
    },
    /// A header value could not be encoded.
    #[error("invalid header value")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },
    /// A local file could not be read for upload.
    #[error("failed to read upload file")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl ClientError {
    /// Message suitable for a notice, preferring the server's own wording.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { source, .. } if source.is_timeout() => "request timed out".to_string(),
            Self::Request { source, .. } if source.is_connect() => {
                "could not reach the server".to_string()
            }
            Self::Request { operation, .. } => format!("{operation} request failed"),
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status {
                status,
                message: None,
            } => format!("request failed with status {status}"),
            Self::InvalidBody { .. } => "server returned an unreadable response".to_string(),
            Self::InvalidUrl { path } => format!("invalid request path '{path}'"),
            Self::InvalidHeader { name } => format!("invalid value for header {name}"),
            Self::Io { path, source } => format!("could not read {}: {source}", path.display()),
        }
    }

    /// HTTP status when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of a row action, as shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// Blocked before any network call.
    #[error("{message}")]
    Validation {
        /// Why the action was refused.
        message: String,
    },
    /// The remote call failed; any optimistic change was reverted.
    #[error("{message}")]
    Transport {
        /// Most specific message available.
        message: String,
        /// HTTP status when the server answered.
        status: Option<u16>,
    },
    /// The server answered with a payload that could not be used.
    #[error("{message}")]
    Decode {
        /// Decode diagnostic.
        message: String,
    },
    /// The background task running the action was aborted or panicked.
    #[error("action was interrupted")]
    Interrupted,
}

impl ActionError {
    /// Validation failure with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the action was refused before reaching the network.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<ClientError> for ActionError {
    fn from(err: ClientError) -> Self {
        Self::Transport {
            message: err.user_message(),
            status: err.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_prefer_server_message() {
        let err = ClientError::Status {
            status: 422,
            message: Some("Email already exists".into()),
        };
        assert_eq!(err.user_message(), "Email already exists");
        let action = ActionError::from(err);
        assert_eq!(
            action,
            ActionError::Transport {
                message: "Email already exists".into(),
                status: Some(422)
            }
        );
    }

    #[test]
    fn status_errors_fall_back_to_generic_message() {
        let err = ClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "request failed with status 500");
        assert_eq!(ActionError::from(err).to_string(), "request failed with status 500");
        assert!(ActionError::validation("no records selected").is_validation());
    }
}
