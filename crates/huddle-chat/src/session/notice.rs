//! Transient status text shown for a fixed window.

use std::time::Duration;

use crate::timer::OneShotTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Holds at most one notice; a new one replaces the old and restarts the
/// window.
#[derive(Debug)]
pub(crate) struct NoticeBoard {
    window: Duration,
    timer: OneShotTimer,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            timer: OneShotTimer::new(),
            current: None,
        }
    }

    pub(crate) fn show(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.current = Some(Notice {
            level,
            text: text.into(),
        });
        self.timer.arm(self.window);
    }

    pub(crate) fn info(&mut self, text: impl Into<String>) {
        self.show(NoticeLevel::Info, text);
    }

    pub(crate) fn error(&mut self, text: impl Into<String>) {
        self.show(NoticeLevel::Error, text);
    }

    pub(crate) fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Resolve when the visible notice's window ends, clearing it.
    /// Cancel-safe.
    pub(crate) async fn expired(&mut self) {
        self.timer.fired().await;
        self.current = None;
    }

    pub(crate) fn cancel(&mut self) {
        self.timer.cancel();
        self.current = None;
    }
}
