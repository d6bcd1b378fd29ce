use std::time::Duration;

/// Configuration for a [`StreamingClient`](crate::core::client::StreamingClient)
///
/// Fixed at construction; there is no runtime mutation path. The URL,
/// message encoding and any subscription handshake belong to the feed
/// provider and are opaque to the client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL (wss:// or ws://)
    pub url: String,
    /// Delay before the first reconnection attempt
    pub base_delay: Duration,
    /// Cap on the reconnection delay
    pub max_delay: Duration,
    /// Backoff growth factor per consecutive failure
    pub growth_factor: f64,
}

impl FeedConfig {
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
    pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

    /// Create a configuration with default backoff parameters
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Override the delay before the first reconnection attempt
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Override the reconnection delay cap
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Override the backoff growth factor
    pub fn with_growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }
}
