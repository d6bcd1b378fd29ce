//! Subscriber bookkeeping
//!
//! The registry is the sole authority on whether the connection should
//! exist: `add` returning true starts the client, `remove` returning
//! true stops it. It also holds the per-subscriber sinks used for
//! event fan-out.

use crate::traits::sink::{EventSink, FeedEvent};
use std::collections::HashMap;
use std::sync::Arc;

/// Unique identifier for a subscriber
pub type SubscriberId = String;

/// Tracks active subscribers and their notification sinks
pub struct SubscriberRegistry {
    sinks: HashMap<SubscriberId, Arc<dyn EventSink>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            sinks: HashMap::new(),
        }
    }

    /// Register a subscriber; returns true iff it is the first
    ///
    /// Re-registering an existing id replaces its sink and is never
    /// "first" unless the registry was empty.
    pub fn add(&mut self, id: SubscriberId, sink: Arc<dyn EventSink>) -> bool {
        let is_first = self.sinks.is_empty();
        self.sinks.insert(id, sink);
        is_first
    }

    /// Remove a subscriber; returns true iff it was the last
    ///
    /// Removing an unknown id is a no-op and never "last".
    pub fn remove(&mut self, id: &str) -> bool {
        self.sinks.remove(id).is_some() && self.sinks.is_empty()
    }

    /// Fan an event out to every registered sink
    pub fn notify(&self, event: FeedEvent) {
        for sink in self.sinks.values() {
            sink.on_event(event.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
