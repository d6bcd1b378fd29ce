//! One-shot reconnection timer
//!
//! At most one timer is pending at any instant. The scheduler is
//! designed to live inside its owner's mutex: a fire callback receives
//! a [`TimerToken`] and must trade it in via
//! [`ReconnectScheduler::try_consume`] under that same mutex before
//! acting, which makes cancellation and firing mutually exclusive.

use crate::traits::error::{FeedError, Result};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

struct PendingTimer {
    token: TimerToken,
    task: JoinHandle<()>,
}

/// Owner of the single pending reconnection timer
pub struct ReconnectScheduler {
    pending: Option<PendingTimer>,
    next_token: u64,
}

impl ReconnectScheduler {
    pub fn new() -> Self {
        Self {
            pending: None,
            next_token: 0,
        }
    }

    /// Arm a one-shot timer
    ///
    /// Fails with `AlreadyScheduled` if a timer is already pending;
    /// call [`cancel`](Self::cancel) first.
    pub fn schedule<F>(&mut self, delay: Duration, fire: F) -> Result<()>
    where
        F: FnOnce(TimerToken) + Send + 'static,
    {
        if self.pending.is_some() {
            return Err(FeedError::AlreadyScheduled);
        }

        self.next_token += 1;
        let token = TimerToken(self.next_token);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(token);
        });

        self.pending = Some(PendingTimer { token, task });
        debug!(?delay, "reconnect timer armed");
        Ok(())
    }

    /// Cancel any pending timer; idempotent
    ///
    /// A timer that already fired but has not yet been consumed is
    /// invalidated: its `try_consume` will return false.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            debug!("pending reconnect timer cancelled");
        }
    }

    /// Check whether a timer is pending; no side effect
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume a fired timer
    ///
    /// Returns true iff `token` identifies the currently pending timer,
    /// clearing it. Returns false for cancelled or superseded timers,
    /// in which case the caller must discard the firing.
    pub fn try_consume(&mut self, token: TimerToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for ReconnectScheduler {
    fn default() -> Self {
        Self::new()
    }
}
