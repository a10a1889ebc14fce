//! Built-in defaults and environment variable names.

/// API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/";
/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest accepted request timeout.
pub(crate) const MAX_TIMEOUT_SECS: u64 = 600;
/// Largest accepted page size.
pub(crate) const MAX_PAGE_SIZE: usize = 500;
/// Session file name under the config directory.
pub(crate) const SESSION_FILE: &str = "session.json";

/// Overrides the API base URL.
pub const ENV_API_URL: &str = "TALENTDESK_API_URL";
/// Overrides the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TALENTDESK_HTTP_TIMEOUT_SECS";
/// Overrides the default page size.
pub const ENV_PAGE_SIZE: &str = "TALENTDESK_PAGE_SIZE";
/// Overrides the session file location.
pub const ENV_SESSION_PATH: &str = "TALENTDESK_SESSION_PATH";
/// Points at a JSON configuration file.
pub const ENV_CONFIG: &str = "TALENTDESK_CONFIG";
