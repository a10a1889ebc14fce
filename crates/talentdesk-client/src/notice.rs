//! User-facing outcome messages.
//!
//! Row actions report every outcome twice: as a `Result` for the caller and
//! as a [`Notice`] for whatever renders toasts, so a presentation layer can
//! show feedback without inspecting errors.

use std::fmt::{self, Display, Formatter};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// The action completed.
    Success,
    /// The action failed.
    Error,
}

impl NoticeKind {
    /// Short label for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Error => "error",
        }
    }
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Receives notices from row actions.
pub trait NoticeSink: Send + Sync {
    /// Deliver one notice.
    fn notify(&self, notice: Notice);
}

/// Sink that logs each notice and keeps it for later display.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notice received so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take every notice received so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => warn!(notice = %notice.message, "action failed"),
            NoticeKind::Info | NoticeKind::Success => {
                info!(notice = %notice.message, "action notice");
            }
        }
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_notices_in_order() {
        let log = NoticeLog::new();
        log.notify(Notice::success("Candidate updated"));
        log.notify(Notice::error("Failed to delete candidate"));
        assert_eq!(log.snapshot().len(), 2);
        let drained = log.drain();
        assert_eq!(drained[0].kind, NoticeKind::Success);
        assert_eq!(drained[1].to_string(), "error: Failed to delete candidate");
        assert!(log.snapshot().is_empty());
    }
}
