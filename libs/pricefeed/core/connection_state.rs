use std::fmt;

/// Connection lifecycle state
///
/// Exactly one value at any instant, owned exclusively by the client;
/// the state-machine transitions are the only mutation path.
/// `Connecting` and `Connected` imply a live connection handle exists;
/// `Idle` and `Disconnected` imply none does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No subscribers, no connection, no pending reconnect
    Idle,
    /// A connection attempt is in flight
    Connecting,
    /// The feed connection is live
    Connected,
    /// The connection was lost; a reconnect is pending
    Disconnected,
}

impl ConnectionState {
    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}
