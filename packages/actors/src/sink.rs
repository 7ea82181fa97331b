//! Connection handles the dispatcher pushes notifications into.

use std::sync::Arc;

use gig_core::Notification;
use tokio::sync::mpsc;
use ulid::Ulid;

/// Identifier of one realtime connection (one tab, one device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub Ulid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Why a push did not reach the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    #[error("connection closed")]
    Closed,

    #[error("connection buffer full")]
    Full,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Transport side of a connection.
///
/// Implement this trait to deliver notifications over a concrete transport.
/// `push` must not block: the dispatcher calls it inline for every
/// connection of every recipient. It should not panic either; a panic is
/// caught and counted as a failed push.
pub trait NotificationSink: Send + Sync + 'static {
    fn push(&self, notification: &Notification) -> Result<(), PushError>;
}

/// Sink backed by a bounded channel. A full buffer fails the push instead
/// of waiting for the reader.
pub struct ChannelSink {
    tx: mpsc::Sender<Notification>,
}

impl ChannelSink {
    /// Create a sink and the receiver the connection reads from.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn push(&self, notification: &Notification) -> Result<(), PushError> {
        self.tx
            .try_send(notification.clone())
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PushError::Full,
                mpsc::error::TrySendError::Closed(_) => PushError::Closed,
            })
    }
}

/// A registered connection: its ID plus the sink to push into.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sink: Arc<dyn NotificationSink>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sink: Arc<dyn NotificationSink>) -> Self {
        Self { id, sink }
    }

    /// Wrap a sink under a fresh connection ID.
    pub fn from_sink<S: NotificationSink>(sink: S) -> Self {
        Self::new(ConnectionId::new(), Arc::new(sink))
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn push(&self, notification: &Notification) -> Result<(), PushError> {
        self.sink.push(notification)
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle").field("id", &self.id).finish()
    }
}
