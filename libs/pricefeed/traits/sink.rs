use std::sync::Arc;
use std::time::Duration;

/// Opaque feed payload, forwarded verbatim to subscribers
///
/// The core never inspects the contents; decoding the price tick is
/// the host layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl FeedMessage {
    /// Get the message as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeedMessage::Text(s) => Some(s),
            FeedMessage::Binary(_) => None,
        }
    }

    /// Get the message as binary, if it is binary
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            FeedMessage::Text(_) => None,
            FeedMessage::Binary(b) => Some(b),
        }
    }

    /// Check if message is text
    pub fn is_text(&self) -> bool {
        matches!(self, FeedMessage::Text(_))
    }

    /// Check if message is binary
    pub fn is_binary(&self) -> bool {
        matches!(self, FeedMessage::Binary(_))
    }
}

/// Why a connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The server closed the connection
    RemoteClose,
    /// A transport error ended the connection
    Error,
    /// We closed the connection ourselves
    LocalClose,
}

/// Notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The feed connection is established
    Connected,
    /// The feed connection was lost
    Disconnected { reason: DisconnectReason },
    /// A feed payload, forwarded verbatim in receipt order
    Message(FeedMessage),
    /// A reconnection attempt has been scheduled
    Reconnecting { attempt: u32, delay: Duration },
}

/// Sink for subscriber notifications
///
/// The client invokes `on_event` from its serialized state-mutation
/// section, so implementations must return promptly and must not call
/// back into the client.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: FeedEvent);
}

/// An [`EventSink`] backed by an unbounded crossbeam channel
///
/// The receiving half is handed to the host layer, which consumes
/// events at its own pace.
pub struct ChannelSink {
    tx: crossbeam_channel::Sender<FeedEvent>,
}

impl ChannelSink {
    /// Create a sink plus the receiver the host layer drains
    pub fn unbounded() -> (Arc<Self>, crossbeam_channel::Receiver<FeedEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Arc::new(Self { tx }), rx)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&self, event: FeedEvent) {
        // Receiver gone means the host stopped listening; nothing to do
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_accessors() {
        let text = FeedMessage::Text("42000.5".to_string());
        assert!(text.is_text());
        assert_eq!(text.as_text(), Some("42000.5"));
        assert_eq!(text.as_binary(), None);

        let binary = FeedMessage::Binary(vec![1, 2, 3]);
        assert!(binary.is_binary());
        assert_eq!(binary.as_binary(), Some(&[1u8, 2, 3][..]));
        assert_eq!(binary.as_text(), None);
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (sink, rx) = ChannelSink::unbounded();
        sink.on_event(FeedEvent::Connected);
        sink.on_event(FeedEvent::Message(FeedMessage::Text("tick".into())));

        assert_eq!(rx.try_recv().unwrap(), FeedEvent::Connected);
        assert_eq!(
            rx.try_recv().unwrap(),
            FeedEvent::Message(FeedMessage::Text("tick".into()))
        );
    }
}
