//! Debounced typing signal.
//!
//! Collapses a burst of raw input events into a single `Started` edge and,
//! once input has been quiet for the configured period, a single `Stopped`
//! edge.

use std::time::Duration;

use crate::timer::OneShotTimer;

/// Edge emitted by [`TypingDebouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingEdge {
    Started,
    Stopped,
}

#[derive(Debug)]
pub struct TypingDebouncer {
    quiet: Duration,
    timer: OneShotTimer,
    typing: bool,
}

impl TypingDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            timer: OneShotTimer::new(),
            typing: false,
        }
    }

    /// Record one raw input event.
    ///
    /// Returns `Some(Started)` only for the first event of a burst. Every
    /// call pushes the quiet deadline back.
    pub fn on_activity(&mut self) -> Option<TypingEdge> {
        self.timer.arm(self.quiet);
        if self.typing {
            None
        } else {
            self.typing = true;
            Some(TypingEdge::Started)
        }
    }

    /// Resolve with `Stopped` once the quiet period elapses after the last
    /// activity. Pending forever outside a burst. Cancel-safe.
    pub async fn quiet(&mut self) -> TypingEdge {
        self.timer.fired().await;
        self.typing = false;
        TypingEdge::Stopped
    }

    /// Drop any pending deadline without emitting. Returns `true` if a burst
    /// was in progress, in which case the caller owes peers a stop signal.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel();
        std::mem::replace(&mut self.typing, false)
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}
