//! Common test utilities for pricefeed integration tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};

/// A mock WebSocket feed server for testing
///
/// Accepts any number of connections, echoes text/binary frames,
/// pushes broadcast ticks to every live connection, and can drop all
/// live connections without a close handshake to simulate a transport
/// failure.
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    tick_tx: broadcast::Sender<String>,
    kill_tx: broadcast::Sender<()>,
    total: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Create and start a new mock server on an ephemeral port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let (tick_tx, _) = broadcast::channel(64);
        let (kill_tx, _) = broadcast::channel(4);
        let total = Arc::new(AtomicUsize::new(0));
        let active = Arc::new(AtomicUsize::new(0));

        {
            let shutdown = shutdown.clone();
            let tick_tx = tick_tx.clone();
            let kill_tx = kill_tx.clone();
            let total = total.clone();
            let active = active.clone();

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => {
                            match result {
                                Ok((stream, _)) => {
                                    total.fetch_add(1, Ordering::SeqCst);
                                    let tick_rx = tick_tx.subscribe();
                                    let kill_rx = kill_tx.subscribe();
                                    let active = active.clone();
                                    tokio::spawn(async move {
                                        active.fetch_add(1, Ordering::SeqCst);
                                        Self::handle_connection(stream, tick_rx, kill_rx).await;
                                        active.fetch_sub(1, Ordering::SeqCst);
                                    });
                                }
                                Err(e) => {
                                    eprintln!("accept error: {}", e);
                                    break;
                                }
                            }
                        }
                        _ = shutdown.notified() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            addr,
            shutdown,
            tick_tx,
            kill_tx,
            total,
            active,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        mut tick_rx: broadcast::Receiver<String>,
        mut kill_rx: broadcast::Receiver<()>,
    ) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::Message;

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("websocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if msg.is_text() || msg.is_binary() {
                                // Echo the message back
                                if write.send(msg).await.is_err() {
                                    break;
                                }
                            } else if msg.is_ping() {
                                let pong = Message::Pong(msg.into_data());
                                if write.send(pong).await.is_err() {
                                    break;
                                }
                            } else if msg.is_close() {
                                break;
                            }
                        }
                        Some(Err(_)) | None => break,
                    }
                }
                tick = tick_rx.recv() => {
                    match tick {
                        Ok(text) => {
                            if write.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                // Drop the socket with no close handshake
                _ = kill_rx.recv() => break,
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Push a text frame to every live connection
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.tick_tx.send(text.into());
    }

    /// Drop every live connection without a close handshake
    pub fn drop_connections(&self) {
        let _ = self.kill_tx.send(());
    }

    /// Total connections ever accepted
    pub fn total_connections(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Connections currently live
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Shutdown the listener
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
        self.drop_connections();
    }
}
