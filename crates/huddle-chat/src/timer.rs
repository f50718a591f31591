//! Single-deadline timer driven by the owning task's event loop.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// A cancellable one-shot timer with exactly one authoritative deadline.
///
/// Re-arming replaces the previous deadline, so two timers can never be
/// pending for the same owner. `fired()` is cancel-safe: dropping it inside
/// a `tokio::select!` leaves the deadline armed for the next poll.
#[derive(Debug, Default)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the timer to fire `after` from now.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
    }

    /// Disarm the timer. Returns `true` if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve once the armed deadline passes, disarming the timer.
    /// Never resolves while disarmed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
