//! Typed client settings and the partial layers they are built from.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Fully resolved settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL; always absolute and ends with `/`.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Page size lists start with.
    pub default_page_size: usize,
    /// Where the session token is persisted.
    pub session_path: PathBuf,
}

/// One partial configuration source (file, environment, or flags).
///
/// Later layers win field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsLayer {
    /// Raw base URL, validated at load.
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    pub http_timeout_secs: Option<u64>,
    /// Default page size.
    pub page_size: Option<usize>,
    /// Session file location.
    pub session_path: Option<PathBuf>,
}

impl SettingsLayer {
    /// Overlay `other` on top of `self`.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            api_url: other.api_url.or(self.api_url),
            http_timeout_secs: other.http_timeout_secs.or(self.http_timeout_secs),
            page_size: other.page_size.or(self.page_size),
            session_path: other.session_path.or(self.session_path),
        }
    }
}
