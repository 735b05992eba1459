//! User-facing notices.
//!
//! Every submission attempt ends in at most one notice. The controller only
//! sees the `Notifier` trait; the binary prints notices to the terminal and
//! tests record them.

use parking_lot::Mutex;
use std::fmt;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Sink for user-facing notices.
///
/// `notify` must return quickly; it is called from the submission path.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{notice}"),
            NoticeLevel::Error => eprintln!("{notice}"),
        }
    }
}

/// Keeps every notice for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices.lock().iter().filter(|n| n.level == level).count()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::success("Bid Successful").to_string(), "[success] Bid Successful");
        assert_eq!(
            Notice::error("Failed to submit bid.").to_string(),
            "[error] Failed to submit bid."
        );
    }

    #[test]
    fn test_recording_notifier_counts_by_level() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::success("a"));
        notifier.notify(Notice::error("b"));
        notifier.notify(Notice::error("c"));

        assert_eq!(notifier.count(NoticeLevel::Success), 1);
        assert_eq!(notifier.count(NoticeLevel::Error), 2);
        assert_eq!(notifier.last().map(|n| n.message), Some("c".to_string()));
    }
}
