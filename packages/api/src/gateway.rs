//! Connection gateway: opens realtime connections for identified clients.

use std::sync::Arc;

use actors::{ChannelSink, ConnectionHandle, ConnectionId, SessionRegistry};
use futures_util::Stream;
use gig_core::{Notification, UserId};
use tokio::sync::mpsc;

/// Hands out registered connections.
///
/// The client identifies once when connecting; nothing else is negotiated.
#[derive(Clone)]
pub struct ConnectionGateway {
    registry: Arc<SessionRegistry>,
    buffer: usize,
}

impl ConnectionGateway {
    pub fn new(registry: Arc<SessionRegistry>, buffer: usize) -> Self {
        Self { registry, buffer }
    }

    /// Open a connection for `identity` and register it.
    pub fn connect(&self, identity: UserId) -> Connection {
        let (sink, rx) = ChannelSink::channel(self.buffer);
        let handle = ConnectionHandle::from_sink(sink);
        let id = handle.id();
        self.registry.register(&identity, handle);
        tracing::info!("{} connected as {}", id, identity);

        Connection {
            id,
            identity,
            rx,
            registry: self.registry.clone(),
            closed: false,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}

/// One open realtime connection. Dropping it deregisters it.
pub struct Connection {
    id: ConnectionId,
    identity: UserId,
    rx: mpsc::Receiver<Notification>,
    registry: Arc<SessionRegistry>,
    closed: bool,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &UserId {
        &self.identity
    }

    /// Wait for the next notification. `None` once closed and drained.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Deregister now. Notifications already buffered can still be read.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.registry.deregister(&self.identity, self.id);
            self.rx.close();
            tracing::info!("{} closed for {}", self.id, self.identity);
        }
    }

    /// Consume the connection as a stream of notifications.
    pub fn into_stream(self) -> impl Stream<Item = Notification> + Send + 'static {
        futures_util::stream::unfold(self, |mut connection| async move {
            connection
                .recv()
                .await
                .map(|notification| (notification, connection))
        })
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
