//! Ownership of one underlying WebSocket connection
//!
//! A [`ConnectionHandle`] wraps exactly one transport resource and
//! reports everything that happens to it through a single event
//! callback. `Terminated` fires exactly once on every path (connect
//! failure, read error, remote close, local close), so the owner never
//! needs a second "did it actually close" check.

use crate::traits::error::{FeedError, Result};
use crate::traits::sink::{DisconnectReason, FeedMessage};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

/// Events reported by the connection task to its owner
#[derive(Debug)]
pub(crate) enum HandleEvent {
    /// The connection is established
    Opened,
    /// A payload frame arrived; only delivered while open
    Message(FeedMessage),
    /// The connection ended; delivered exactly once
    Terminated(DisconnectReason),
}

#[derive(Debug)]
enum Command {
    Send(FeedMessage),
    Close,
}

/// Handle to one live or attempted connection instance
pub(crate) struct ConnectionHandle {
    cmd_tx: Option<mpsc::UnboundedSender<Command>>,
    open: Arc<AtomicBool>,
}

impl ConnectionHandle {
    pub(crate) fn new() -> Self {
        Self {
            cmd_tx: None,
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start establishing the connection; non-blocking
    ///
    /// Completion is signaled through `events`: `Opened` on success,
    /// `Terminated` on failure. Opening an already-opened handle fails
    /// with `InvalidState`.
    pub(crate) fn open<F>(&mut self, url: &str, events: F) -> Result<()>
    where
        F: Fn(HandleEvent) + Send + Sync + 'static,
    {
        if self.cmd_tx.is_some() {
            return Err(FeedError::InvalidState(
                "connection handle is already open".to_string(),
            ));
        }

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        self.cmd_tx = Some(cmd_tx);

        let url = url.to_string();
        let open = Arc::clone(&self.open);
        tokio::spawn(async move {
            run_connection(url, cmd_rx, open, events).await;
        });

        Ok(())
    }

    /// Enqueue a payload for transmission; fire-and-forget
    pub(crate) fn send(&self, payload: FeedMessage) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(FeedError::NotConnected);
        }
        let cmd_tx = self.cmd_tx.as_ref().ok_or(FeedError::NotConnected)?;
        cmd_tx
            .send(Command::Send(payload))
            .map_err(|_| FeedError::NotConnected)
    }

    /// Request connection teardown; idempotent, safe on an unopened handle
    ///
    /// If the connection has not already terminated this results in
    /// `Terminated(LocalClose)`.
    pub(crate) fn close(&self) {
        if let Some(cmd_tx) = &self.cmd_tx {
            // A closed channel means the task already terminated
            let _ = cmd_tx.send(Command::Close);
        }
    }
}

/// Connection task: connect, then pump frames and commands until the
/// connection ends, reporting the termination reason exactly once.
async fn run_connection<F>(
    url: String,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    open: Arc<AtomicBool>,
    events: F,
) where
    F: Fn(HandleEvent) + Send + Sync + 'static,
{
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            warn!(%url, error = %e, "failed to connect");
            events(HandleEvent::Terminated(DisconnectReason::Error));
            return;
        }
    };

    debug!(%url, "connection established");
    open.store(true, Ordering::Release);
    events(HandleEvent::Opened);

    let (mut write, mut read) = ws_stream.split();

    let reason = loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        events(HandleEvent::Message(FeedMessage::Text(text)));
                    }
                    Some(Ok(Message::Binary(data))) => {
                        events(HandleEvent::Message(FeedMessage::Binary(data)));
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if write.send(Message::Pong(data)).await.is_err() {
                            break DisconnectReason::Error;
                        }
                    }
                    Some(Ok(Message::Pong(_) | Message::Frame(_))) => {}
                    Some(Ok(Message::Close(_))) => {
                        debug!("server sent close frame");
                        break DisconnectReason::RemoteClose;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket read error");
                        break DisconnectReason::Error;
                    }
                    None => {
                        debug!("websocket stream ended");
                        break DisconnectReason::RemoteClose;
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Send(payload)) => {
                        let frame = match payload {
                            FeedMessage::Text(text) => Message::Text(text),
                            FeedMessage::Binary(data) => Message::Binary(data),
                        };
                        if write.send(frame).await.is_err() {
                            break DisconnectReason::Error;
                        }
                    }
                    // Sender dropped counts as a close request
                    Some(Command::Close) | None => {
                        let _ = write.close().await;
                        break DisconnectReason::LocalClose;
                    }
                }
            }
        }
    };

    open.store(false, Ordering::Release);
    debug!(?reason, "connection terminated");
    events(HandleEvent::Terminated(reason));
}
