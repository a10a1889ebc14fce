//! Layered configuration loading.
//!
//! # Design
//! - Layers apply in order: built-in defaults, JSON file, environment, flags.
//! - The environment is read through an injected lookup so tests never touch
//!   process-global state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use talentdesk_core::DEFAULT_PAGE_SIZE;

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_PAGE_SIZE, ENV_SESSION_PATH,
    ENV_TIMEOUT_SECS, SESSION_FILE,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ClientConfig, SettingsLayer};
use crate::validate::{parse_base_url, parse_number, validate_page_size, validate_timeout_secs};

/// Builds a [`ClientConfig`] from its sources.
pub struct ConfigLoader<E> {
    env: E,
    file: Option<PathBuf>,
}

impl ConfigLoader<fn(&str) -> Option<String>> {
    /// Loader reading the real process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            env: process_env,
            file: None,
        }
    }
}

impl<E: Fn(&str) -> Option<String>> ConfigLoader<E> {
    /// Loader reading variables through `env`.
    pub const fn with_env(env: E) -> Self {
        Self { env, file: None }
    }

    /// Read a JSON settings file as the first layer.
    #[must_use]
    pub fn with_file(mut self, file: Option<&Path>) -> Self {
        self.file = file.map(Path::to_path_buf);
        self
    }

    /// Resolve and validate every layer, with `flags` applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when
    /// any resolved value fails validation.
    pub fn load(&self, flags: SettingsLayer) -> ConfigResult<ClientConfig> {
        let file_layer = match &self.file {
            Some(path) => read_file_layer(path)?,
            None => SettingsLayer::default(),
        };
        let env_layer = self.env_layer()?;
        let resolved = file_layer.merged_with(env_layer).merged_with(flags);

        let api_base_url =
            parse_base_url(resolved.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let request_timeout =
            validate_timeout_secs(resolved.http_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))?;
        let default_page_size =
            validate_page_size(resolved.page_size.unwrap_or(DEFAULT_PAGE_SIZE))?;
        let session_path = match resolved.session_path {
            Some(path) if !path.as_os_str().is_empty() => path,
            Some(_) => {
                return Err(ConfigError::InvalidField {
                    field: "session_path",
                    value: None,
                    reason: "must not be empty",
                });
            }
            None => self.default_session_path(),
        };

        debug!(
            api_base_url = %api_base_url,
            timeout_secs = request_timeout.as_secs(),
            default_page_size,
            session_path = %session_path.display(),
            "resolved client configuration"
        );
        Ok(ClientConfig {
            api_base_url,
            request_timeout,
            default_page_size,
            session_path,
        })
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|value| !value.trim().is_empty())
    }

    fn env_layer(&self) -> ConfigResult<SettingsLayer> {
        Ok(SettingsLayer {
            api_url: self.var(ENV_API_URL),
            http_timeout_secs: self
                .var(ENV_TIMEOUT_SECS)
                .map(|raw| parse_number("http_timeout_secs", &raw))
                .transpose()?,
            page_size: self
                .var(ENV_PAGE_SIZE)
                .map(|raw| parse_number("page_size", &raw))
                .transpose()?,
            session_path: self.var(ENV_SESSION_PATH).map(PathBuf::from),
        })
    }

    fn default_session_path(&self) -> PathBuf {
        let base = self
            .var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| self.var("HOME").map(|home| PathBuf::from(home).join(".config")));
        base.map_or_else(
            || PathBuf::from(".talentdesk").join(SESSION_FILE),
            |dir| dir.join("talentdesk").join(SESSION_FILE),
        )
    }
}

/// Load configuration from an optional file, the process environment, and flags.
///
/// # Errors
///
/// See [`ConfigLoader::load`].
pub fn load_config(file: Option<&Path>, flags: SettingsLayer) -> ConfigResult<ClientConfig> {
    ConfigLoader::from_process_env().with_file(file).load(flags)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn read_file_layer(path: &Path) -> ConfigResult<SettingsLayer> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "read config",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
