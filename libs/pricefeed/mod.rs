//! # pricefeed
//!
//! A resilient real-time price-streaming client. One logical
//! subscription to a live feed over a persistent WebSocket, with
//! automatic exponential-backoff reconnection: transient network
//! failures surface to subscribers only as `disconnected` /
//! `reconnecting` notifications, never as fatal errors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pricefeed::{ChannelSink, FeedConfig, FeedEvent, StreamingClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> pricefeed::Result<()> {
//!     let config = FeedConfig::new("wss://ws.bitstamp.net")
//!         .with_base_delay(Duration::from_secs(1))
//!         .with_max_delay(Duration::from_secs(30));
//!     let client = StreamingClient::new(config)?;
//!
//!     let (sink, events) = ChannelSink::unbounded();
//!     client.subscribe("ticker-screen", sink)?;
//!
//!     while let Ok(event) = events.recv() {
//!         match event {
//!             FeedEvent::Message(msg) => println!("tick: {:?}", msg),
//!             other => println!("lifecycle: {:?}", other),
//!         }
//!     }
//!
//!     client.unsubscribe("ticker-screen")?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use core::{
    ConnectionState, FeedConfig, ReconnectScheduler, StreamingClient, SubscriberId,
    SubscriberRegistry, TimerToken,
};
