//! Subscriber installation and logging configuration.
//!
//! # Design
//! - Exactly one of the compact or JSON formatters is active.
//! - Everything is written to stderr; stdout carries command output only.
//! - The build SHA is stored on first install.

use std::io;

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const QUIET_TARGETS: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Install the process-wide subscriber for a CLI invocation.
///
/// # Errors
///
/// [`TelemetryError::SubscriberInstall`] when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let _ = BUILD_SHA.set(config.build_sha.to_string());

    let (json, pretty) = match config.format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(io::stderr)
                    .with_target(false),
            ),
            None,
        ),
        LogFormat::Pretty => (
            None,
            Some(fmt::layer().compact().with_writer(io::stderr).with_target(false)),
        ),
    };
    tracing_subscriber::registry()
        .with(cli_filter(config.level))
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Build SHA given to [`init_logging`], or `dev`.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Inputs to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Directive applied when `RUST_LOG` is unset.
    pub level: &'a str,
    /// Formatter to install.
    pub format: LogFormat,
    /// Build identifier attached to the root span.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: option_env!("TALENTDESK_BUILD_SHA").unwrap_or("dev"),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, with the current span.
    Json,
    /// Compact single-line text.
    Pretty,
}

impl LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Parse `json` or `pretty`; anything else falls back to [`Self::infer`].
    #[must_use]
    pub fn parse_or_infer(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ => Self::infer(),
        }
    }
}

/// HTTP internals stay at `warn` unless `RUST_LOG` asks otherwise.
fn cli_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{QUIET_TARGETS}")))
}
