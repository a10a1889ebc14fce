//! Telemetry failures.

use thiserror::Error;

/// Result alias for telemetry setup.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failure while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Another global subscriber was installed first.
    #[error("logging is already initialised")]
    SubscriberInstall {
        /// Error from `tracing-subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}
