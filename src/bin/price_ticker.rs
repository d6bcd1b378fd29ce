//! Live BTC/EUR ticker over the Bitstamp WebSocket feed
//!
//! Subscribes to the `live_trades_btceur` channel and prints each
//! trade price as it arrives, surviving feed outages via the client's
//! backoff reconnection.
//!
//! Usage:
//!   cargo run --bin price_ticker

use anyhow::Result;
use pricefeed::{ChannelSink, FeedConfig, FeedEvent, FeedMessage, StreamingClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

const FEED_URL: &str = "wss://ws.bitstamp.net";
const CHANNEL: &str = "live_trades_btceur";
const SUBSCRIBER_ID: &str = "price-ticker";

/// Bitstamp channel subscription handshake
fn subscribe_message() -> FeedMessage {
    let payload = serde_json::json!({
        "event": "bts:subscribe",
        "data": { "channel": CHANNEL },
    });
    FeedMessage::Text(payload.to_string())
}

/// Pull the trade price out of a Bitstamp live_trades event, if any
fn extract_price(payload: &str) -> Option<f64> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    if value.get("event")?.as_str()? != "trade" {
        return None;
    }
    value.get("data")?.get("price")?.as_f64()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pricefeed=debug")),
        )
        .init();

    let config = FeedConfig::new(FEED_URL)
        .with_base_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(30))
        .with_growth_factor(2.0);
    let client = Arc::new(StreamingClient::new(config)?);

    let (sink, events) = ChannelSink::unbounded();
    client.subscribe(SUBSCRIBER_ID, sink)?;
    info!(url = FEED_URL, channel = CHANNEL, "streaming BTC/EUR trades, ctrl-c to stop");

    // Event loop on a dedicated thread; the crossbeam receiver blocks
    let event_client = Arc::clone(&client);
    let event_loop = std::thread::spawn(move || {
        while let Ok(event) = events.recv() {
            match event {
                FeedEvent::Connected => {
                    info!("connected, subscribing to {}", CHANNEL);
                    if let Err(e) = event_client.send(subscribe_message()) {
                        warn!(error = %e, "failed to send channel subscription");
                    }
                }
                FeedEvent::Message(msg) => {
                    if let Some(price) = msg.as_text().and_then(extract_price) {
                        println!("BTC/EUR {:.2}", price);
                    }
                }
                FeedEvent::Disconnected { reason } => {
                    warn!(?reason, "feed connection lost");
                }
                FeedEvent::Reconnecting { attempt, delay } => {
                    info!(attempt, ?delay, "reconnecting");
                }
            }
        }
    });

    signal::ctrl_c().await?;
    info!("shutting down");
    // Unsubscribing drops the sink, which closes the event channel
    // and lets the event loop exit
    client.unsubscribe(SUBSCRIBER_ID)?;
    let _ = event_loop.join();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trade_prices() {
        let payload = r#"{"event":"trade","channel":"live_trades_btceur","data":{"price":42000.5}}"#;
        assert_eq!(extract_price(payload), Some(42000.5));
    }

    #[test]
    fn ignores_non_trade_events() {
        let ack = r#"{"event":"bts:subscription_succeeded","channel":"live_trades_btceur","data":{}}"#;
        assert_eq!(extract_price(ack), None);
        assert_eq!(extract_price("not json"), None);
    }
}
