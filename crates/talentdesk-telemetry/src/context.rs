//! Process-wide trace context.
//!
//! # Design
//! - One trace id per process, sent as `x-request-id` on every request so
//!   backend logs can be correlated with a CLI invocation.
//! - An `app` span stays entered for the process lifetime.

use once_cell::sync::OnceCell;
use tracing::{Span, span::Entered};
use uuid::Uuid;

use crate::init::build_sha;

static TRACE_ID: OnceCell<String> = OnceCell::new();

/// Trace identifier for this process, generated on first use.
#[must_use]
pub fn trace_id() -> &'static str {
    TRACE_ID.get_or_init(|| Uuid::new_v4().to_string())
}

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the `app` span tagged with the command being run.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "app",
            command = %command,
            trace_id = %trace_id(),
            build_sha = %build_sha()
        )));
        Self {
            _guard: span.enter(),
        }
    }
}
