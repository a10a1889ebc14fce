//! Session persistence between CLI runs.
//!
//! The session is a bearer token plus a small user profile stored as JSON.
//! Reading it at startup decides whether requests go out authenticated.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

/// Operator profile cached alongside the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Display name.
    pub name: Option<String>,
    /// Login email.
    pub email: Option<String>,
    /// Access role.
    pub role: Option<String>,
}

/// Persisted session document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token sent with every request.
    pub token: String,
    /// Cached operator profile.
    #[serde(default)]
    pub user: UserProfile,
    /// When the session was written.
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    /// New session stamped with the current time.
    #[must_use]
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
            saved_at: Utc::now(),
        }
    }
}

/// Authentication state derived from the session file at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// A usable token was found.
    Authenticated(StoredSession),
    /// No session, or the session file was unusable.
    Anonymous,
}

impl AuthState {
    /// Bearer token, when authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated(session) => Some(session.token.as_str()),
            Self::Anonymous => None,
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session; a missing file or blank token yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
    pub fn load(&self) -> ConfigResult<Option<StoredSession>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "read session",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let session: StoredSession =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(session).filter(|session| !session.token.trim().is_empty()))
    }

    /// Startup auth state; unreadable sessions degrade to anonymous.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        match self.load() {
            Ok(Some(session)) => AuthState::Authenticated(session),
            Ok(None) => AuthState::Anonymous,
            Err(err) => {
                warn!(error = %err.describe(), "ignoring unusable session file");
                AuthState::Anonymous
            }
        }
    }

    /// Persist `session`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be written.
    pub fn save(&self, session: &StoredSession) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                operation: "create session directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_vec_pretty(session).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|source| ConfigError::Io {
            operation: "write session",
            path: self.path.clone(),
            source,
        })?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Delete the session file; returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file exists but cannot be removed.
    pub fn clear(&self) -> ConfigResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::Io {
                operation: "remove session",
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ConfigResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|source| {
        ConfigError::Io {
            operation: "restrict session permissions",
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn restrict_permissions(_path: &Path) -> ConfigResult<()> {
    Ok(())
}
