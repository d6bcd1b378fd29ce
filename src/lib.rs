//! BTC Price Stream - Main Library
//!
//! Thin host-bridge layer over the [`pricefeed`] core. The core owns
//! the connection lifecycle (connect, failure detection, backoff
//! reconnection, subscriber fan-out); this crate adapts it to a
//! concrete feed and presentation, nothing more.
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use btc_price_stream::pricefeed::{ChannelSink, FeedConfig, StreamingClient};
//! ```

// Re-export the core library for convenience
pub use pricefeed;
