//! Core traits and types for the pricefeed client
//!
//! - **BackoffPolicy**: reconnection delay computation
//! - **EventSink**: subscriber notification interface
//! - **FeedError**: error taxonomy and `Result` alias

pub mod backoff;
pub mod error;
pub mod sink;

pub use backoff::BackoffPolicy;
pub use error::{FeedError, Result};
pub use sink::{ChannelSink, DisconnectReason, EventSink, FeedEvent, FeedMessage};
