//! CLI error types and the context shared by command handlers.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use talentdesk_client::{
    ActionError, ClientError, HttpTransport, NoticeLog, NoticeSink, RowActionDispatcher, Transport,
    shared_list,
};
use talentdesk_config::{ClientConfig, ConfigError, ConfigLoader, SessionStore, SettingsLayer};
use talentdesk_core::Entity;
use talentdesk_telemetry::trace_id;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};

const EXIT_VALIDATION: i32 = 2;
const EXIT_FAILURE: i32 = 3;

/// Why a command did not complete, mapped onto the process exit code.
#[derive(Debug)]
pub(crate) enum CliError {
    /// Input was rejected before any request was sent. Exits with 2.
    Validation(String),
    /// A request or a local file read failed. Exits with 3.
    Failure(anyhow::Error),
}

/// Result of a command handler; `Ok` carries the text printed to stdout.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => EXIT_VALIDATION,
            Self::Failure(_) => EXIT_FAILURE,
        }
    }

    /// Line printed after `error: `; failures include their context chain.
    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(formatter, "invalid input: {message}"),
            Self::Failure(error) => write!(formatter, "command failed: {error:#}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ActionError> for CliError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation { message } => Self::Validation(message),
            other => Self::failure(other),
        }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        Self::failure(anyhow!(err.user_message()))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField { .. } => Self::Validation(err.describe()),
            other => Self::failure(anyhow!(other.describe())),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) config: ClientConfig,
    pub(crate) session: SessionStore,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) notices: Arc<NoticeLog>,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Resolve configuration and the stored session, then build the transport.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let flags = SettingsLayer {
            api_url: cli.api_url.clone(),
            http_timeout_secs: cli.timeout,
            ..SettingsLayer::default()
        };
        let config = ConfigLoader::from_process_env()
            .with_file(cli.config.as_deref())
            .load(flags)?;
        let session = SessionStore::new(config.session_path.clone());
        let token = session.auth_state().token().map(str::to_string);
        debug!(
            api = %config.api_base_url,
            authenticated = token.is_some(),
            "cli context resolved"
        );
        let transport = HttpTransport::new(
            config.api_base_url.clone(),
            config.request_timeout,
            token,
            trace_id(),
        )?;
        Ok(Self::with_transport(config, session, Arc::new(transport), cli.output))
    }

    pub(crate) fn with_transport(
        config: ClientConfig,
        session: SessionStore,
        transport: Arc<dyn Transport>,
        output: OutputFormat,
    ) -> Self {
        Self {
            config,
            session,
            transport,
            notices: Arc::new(NoticeLog::new()),
            output,
        }
    }

    /// Fresh dispatcher over an empty list for `T`.
    pub(crate) fn dispatcher<T: Entity>(&self) -> RowActionDispatcher<T> {
        let sink: Arc<dyn NoticeSink> = self.notices.clone();
        RowActionDispatcher::new(
            shared_list(self.config.default_page_size),
            Arc::clone(&self.transport),
            sink,
        )
    }
}

/// Parse a `key=value` argument.
pub(crate) fn parse_pair(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{input}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{input}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;
    use std::time::Duration;

    use talentdesk_config::parse_base_url;

    use super::*;

    /// Context pointed at a mock server, with its session under `dir`.
    pub(crate) fn context_for(base_url: &str, dir: &Path, output: OutputFormat) -> AppContext {
        let config = ClientConfig {
            api_base_url: parse_base_url(&format!("{base_url}/api")).unwrap(),
            request_timeout: Duration::from_secs(5),
            default_page_size: 10,
            session_path: dir.join("session.json"),
        };
        let session = SessionStore::new(config.session_path.clone());
        let transport = HttpTransport::new(
            config.api_base_url.clone(),
            config.request_timeout,
            Some("test-token".into()),
            "trace-test",
        )
        .unwrap();
        AppContext::with_transport(config, session, Arc::new(transport), output)
    }

    #[test]
    fn pairs_split_on_first_equals() {
        assert_eq!(
            parse_pair("status = Active").unwrap(),
            ("status".to_string(), "Active".to_string())
        );
        assert_eq!(
            parse_pair("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("status").is_err());
        assert!(parse_pair("=Active").is_err());
    }

    #[test]
    fn action_errors_keep_their_exit_class() {
        let validation = CliError::from(ActionError::validation("no records selected"));
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "no records selected");

        let failure = CliError::from(ActionError::Transport {
            message: "boom".into(),
            status: Some(500),
        });
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "boom");
        assert_eq!(failure.to_string(), "command failed: boom");
        assert_eq!(validation.to_string(), "invalid input: no records selected");
    }

    #[test]
    fn config_validation_errors_exit_with_two() {
        let err = CliError::from(parse_base_url("ftp://example.com").unwrap_err());
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().starts_with("invalid api_url"));
    }
}
