use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Warning,
    Error,
}

impl NoticeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A user-visible notification. `message` is a translation key for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub style: NoticeStyle,
    pub message: &'static str,
}

impl Notice {
    pub const QUERY_UNAVAILABLE: Notice = Notice {
        style: NoticeStyle::Warning,
        message: "No query endpoint configured; cannot choose from existing records",
    };

    pub const QUERY_FAILED: Notice = Notice {
        style: NoticeStyle::Error,
        message: "Query failed, please try again later",
    };
}

/// The host's toast/notification surface.
pub trait Notifier: Send + Sync {
    fn show(&self, notice: &Notice);
}

/// Fallback notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, notice: &Notice) {
        let style = notice.style.as_str();
        match notice.style {
            NoticeStyle::Warning => warn!(style, notice = notice.message, "user notice"),
            NoticeStyle::Error => error!(style, notice = notice.message, "user notice"),
        }
    }
}
