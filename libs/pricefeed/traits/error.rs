use thiserror::Error;

/// Main error type for pricefeed
#[derive(Error, Debug)]
pub enum FeedError {
    /// An operation was invoked that is not valid in the current state.
    /// Indicates caller misuse, never a network condition.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A send was attempted while the connection is not open.
    #[error("not connected")]
    NotConnected,

    /// Any error from the underlying transport (DNS, TLS, protocol).
    /// Never fatal: always converted into a disconnect plus scheduled retry.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// A reconnect timer was armed while one was already pending.
    /// Internal invariant breach; logged, never silently swallowed.
    #[error("a reconnect timer is already scheduled")]
    AlreadyScheduled,

    /// Configuration rejected at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for pricefeed operations
pub type Result<T> = std::result::Result<T, FeedError>;
