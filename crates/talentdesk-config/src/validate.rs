//! Validation helpers for configuration values.

use std::time::Duration;

use url::Url;

use crate::defaults::{MAX_PAGE_SIZE, MAX_TIMEOUT_SECS};
use crate::error::{ConfigError, ConfigResult};

/// Parse the API base URL.
///
/// Surrounding whitespace is trimmed, the scheme must be `http` or `https`,
/// query and fragment are dropped, and the path gains a trailing `/` so
/// relative resource paths join underneath it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is blank, not an
/// absolute URL, or uses another scheme.
pub fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid("api_url", raw, "must not be empty"));
    }
    let mut url = Url::parse(trimmed)
        .map_err(|_| ConfigError::invalid("api_url", trimmed, "must be an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "api_url",
            trimmed,
            "must use http or https",
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::invalid("api_url", trimmed, "must include a host"));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Convert a timeout in seconds, rejecting zero and values above ten minutes.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when out of range.
pub fn validate_timeout_secs(secs: u64) -> ConfigResult<Duration> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::invalid(
            "http_timeout_secs",
            secs.to_string(),
            "must be between 1 and 600",
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Check a default page size.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when zero or above 500.
pub fn validate_page_size(size: usize) -> ConfigResult<usize> {
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ConfigError::invalid(
            "page_size",
            size.to_string(),
            "must be between 1 and 500",
        ));
    }
    Ok(size)
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> ConfigResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, raw, "must be a positive integer"))
}
