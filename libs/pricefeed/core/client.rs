//! Connection lifecycle state machine
//!
//! [`StreamingClient`] owns the single logical feed subscription:
//! `Idle -> Connecting -> Connected -> Disconnected -> Connecting ...`,
//! with any state returning to `Idle` when the last subscriber leaves.
//! Network failures are never surfaced as errors; they become a
//! `Disconnected` notification plus a scheduled retry, indefinitely.
//!
//! All state mutation and all subscriber notification happen under one
//! `parking_lot::Mutex`. Connection events carry the epoch of the
//! attempt that produced them and timer firings carry a scheduler
//! token; both are checked under that mutex, so an event racing a
//! `stop` is discarded and no notification escapes after the last
//! unsubscribe returns.

use crate::core::config::FeedConfig;
use crate::core::connection_state::ConnectionState;
use crate::core::handle::{ConnectionHandle, HandleEvent};
use crate::core::registry::{SubscriberId, SubscriberRegistry};
use crate::core::scheduler::{ReconnectScheduler, TimerToken};
use crate::traits::backoff::BackoffPolicy;
use crate::traits::error::{FeedError, Result};
use crate::traits::sink::{DisconnectReason, EventSink, FeedEvent, FeedMessage};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Resilient price-feed client
///
/// All methods take `&self` and are non-blocking; completion is
/// signaled through subscriber notifications. Requires a tokio runtime
/// context: `subscribe` spawns the connection task.
pub struct StreamingClient {
    shared: Arc<Shared>,
}

struct Shared {
    config: FeedConfig,
    backoff: BackoffPolicy,
    inner: Mutex<Inner>,
}

/// The single serialization domain: state, retry count, pending timer
/// and the live handle are only ever touched while this is locked.
struct Inner {
    state: ConnectionState,
    retry_count: u32,
    /// Bumped per connection attempt and on stop; events from older
    /// attempts are discarded.
    epoch: u64,
    handle: Option<ConnectionHandle>,
    scheduler: ReconnectScheduler,
    registry: SubscriberRegistry,
}

impl StreamingClient {
    /// Create a client; validates the backoff parameters
    pub fn new(config: FeedConfig) -> Result<Self> {
        let backoff =
            BackoffPolicy::new(config.base_delay, config.max_delay, config.growth_factor)?;

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                backoff,
                inner: Mutex::new(Inner {
                    state: ConnectionState::Idle,
                    retry_count: 0,
                    epoch: 0,
                    handle: None,
                    scheduler: ReconnectScheduler::new(),
                    registry: SubscriberRegistry::new(),
                }),
            }),
        })
    }

    /// Register a subscriber; the first one starts the connection
    ///
    /// Idempotent: re-subscribing an existing id replaces its sink.
    pub fn subscribe(&self, id: impl Into<SubscriberId>, sink: Arc<dyn EventSink>) -> Result<()> {
        let mut inner = self.shared.inner.lock();
        let is_first = inner.registry.add(id.into(), sink);
        if is_first {
            Self::start_locked(&self.shared, &mut inner)?;
        }
        Ok(())
    }

    /// Remove a subscriber; the last one stops the connection
    ///
    /// Unsubscribing an unknown id is a no-op. After this returns for
    /// the last subscriber, no further notifications are delivered.
    pub fn unsubscribe(&self, id: &str) -> Result<()> {
        let mut inner = self.shared.inner.lock();
        if inner.registry.remove(id) {
            Self::stop_locked(&mut inner);
        }
        Ok(())
    }

    /// Send a payload over the live connection; fire-and-forget
    pub fn send(&self, payload: FeedMessage) -> Result<()> {
        let inner = self.shared.inner.lock();
        match (&inner.state, &inner.handle) {
            (ConnectionState::Connected, Some(handle)) => handle.send(payload),
            _ => Err(FeedError::NotConnected),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Consecutive failed attempts since the last successful connection
    pub fn retry_count(&self) -> u32 {
        self.shared.inner.lock().retry_count
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.shared.inner.lock().registry.len()
    }

    /// Feed URL this client was built for
    pub fn url(&self) -> &str {
        &self.shared.config.url
    }

    /// First-subscriber transition: `Idle -> Connecting`
    fn start_locked(shared: &Arc<Shared>, inner: &mut Inner) -> Result<()> {
        if inner.state != ConnectionState::Idle {
            return Err(FeedError::InvalidState(format!(
                "cannot start while {}",
                inner.state
            )));
        }
        inner.retry_count = 0;
        info!(url = %shared.config.url, "starting feed client");
        Self::connect_locked(shared, inner)
    }

    /// Open a fresh handle for the current attempt
    fn connect_locked(shared: &Arc<Shared>, inner: &mut Inner) -> Result<()> {
        inner.state = ConnectionState::Connecting;
        inner.epoch += 1;
        let epoch = inner.epoch;

        let events = {
            let shared = Arc::clone(shared);
            move |event: HandleEvent| Self::on_handle_event(&shared, epoch, event)
        };

        let mut handle = ConnectionHandle::new();
        handle.open(&shared.config.url, events)?;
        inner.handle = Some(handle);
        Ok(())
    }

    /// Last-subscriber transition: any state -> `Idle`
    ///
    /// Cancelling the timer and closing the handle happen under the
    /// lock, and the epoch bump invalidates anything already in flight.
    fn stop_locked(inner: &mut Inner) {
        inner.epoch += 1;
        inner.scheduler.cancel();
        if let Some(handle) = inner.handle.take() {
            handle.close();
        }
        inner.state = ConnectionState::Idle;
        inner.retry_count = 0;
        info!("feed client stopped");
    }

    /// Entry point for all connection-task events
    fn on_handle_event(shared: &Arc<Shared>, epoch: u64, event: HandleEvent) {
        let mut inner = shared.inner.lock();
        if inner.epoch != epoch {
            debug!("discarding event from a superseded connection attempt");
            return;
        }

        match event {
            HandleEvent::Opened => {
                inner.state = ConnectionState::Connected;
                inner.retry_count = 0;
                info!(url = %shared.config.url, "feed connected");
                inner.registry.notify(FeedEvent::Connected);
            }
            HandleEvent::Message(payload) => {
                if inner.state == ConnectionState::Connected {
                    inner.registry.notify(FeedEvent::Message(payload));
                }
            }
            HandleEvent::Terminated(reason) => {
                Self::on_terminated_locked(shared, &mut inner, reason);
            }
        }
    }

    /// Connection ended: transition to `Disconnected` and arm a retry
    fn on_terminated_locked(shared: &Arc<Shared>, inner: &mut Inner, reason: DisconnectReason) {
        let was_connected = inner.state == ConnectionState::Connected;
        inner.handle = None;
        inner.state = ConnectionState::Disconnected;

        // The delay is indexed by the count before this failure, so the
        // first retry after a healthy connection uses the base delay.
        let delay = shared.backoff.next_delay(inner.retry_count);
        inner.retry_count += 1;
        let attempt = inner.retry_count;

        if was_connected {
            inner.registry.notify(FeedEvent::Disconnected { reason });
        }
        warn!(?reason, attempt, ?delay, "feed connection lost, retry scheduled");

        let fire = {
            let shared = Arc::clone(shared);
            move |token: TimerToken| Self::on_timer_fired(&shared, token)
        };
        match inner.scheduler.schedule(delay, fire) {
            Ok(()) => {
                inner
                    .registry
                    .notify(FeedEvent::Reconnecting { attempt, delay });
            }
            Err(e) => {
                // Single-owner discipline should make this unreachable
                error!(error = %e, "failed to arm reconnect timer");
            }
        }
    }

    /// Reconnect timer fired: `Disconnected -> Connecting`
    fn on_timer_fired(shared: &Arc<Shared>, token: TimerToken) {
        let mut inner = shared.inner.lock();
        if !inner.scheduler.try_consume(token) {
            debug!("discarding cancelled reconnect timer");
            return;
        }
        if inner.state != ConnectionState::Disconnected {
            debug!(state = %inner.state, "reconnect timer fired in unexpected state");
            return;
        }

        debug!(attempt = inner.retry_count, "attempting reconnection");
        if let Err(e) = Self::connect_locked(shared, &mut inner) {
            error!(error = %e, "reconnection attempt could not be started");
        }
    }
}

impl Drop for StreamingClient {
    fn drop(&mut self) {
        let mut inner = self.shared.inner.lock();
        Self::stop_locked(&mut inner);
    }
}
