//! Core client: configuration, connection ownership, reconnection
//! scheduling and the lifecycle state machine.

pub mod client;
pub mod config;
pub mod connection_state;
pub(crate) mod handle;
pub mod registry;
pub mod scheduler;

pub use client::StreamingClient;
pub use config::FeedConfig;
pub use connection_state::ConnectionState;
pub use registry::{SubscriberId, SubscriberRegistry};
pub use scheduler::{ReconnectScheduler, TimerToken};
