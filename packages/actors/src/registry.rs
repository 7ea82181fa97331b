//! Session registry: which identities have live realtime connections.

use std::collections::HashMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use gig_core::UserId;

use crate::sink::{ConnectionHandle, ConnectionId};

/// Maps an identity to its currently open connections.
///
/// An identity can hold many connections at once (several tabs or devices).
/// Entries are sharded, so connects and disconnects for different
/// identities do not block each other. Identities with no connections left
/// are dropped from the map.
///
/// Stale handles are only removed by an explicit [`deregister`]; there is no
/// heartbeat or expiry.
///
/// [`deregister`]: SessionRegistry::deregister
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, HashMap<ConnectionId, ConnectionHandle>>,
}

impl SessionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a connection for an identity.
    ///
    /// Returns `false` if this connection ID was already registered, in
    /// which case nothing changes.
    pub fn register(&self, identity: &UserId, connection: ConnectionHandle) -> bool {
        let mut connections = self.sessions.entry(identity.clone()).or_default();
        if connections.contains_key(&connection.id()) {
            return false;
        }
        tracing::debug!("Registered {} for {}", connection.id(), identity);
        connections.insert(connection.id(), connection);
        true
    }

    /// Remove a connection. Returns whether it was registered.
    pub fn deregister(&self, identity: &UserId, connection_id: ConnectionId) -> bool {
        match self.sessions.entry(identity.clone()) {
            Entry::Occupied(mut entry) => {
                let removed = entry.get_mut().remove(&connection_id).is_some();
                if entry.get().is_empty() {
                    entry.remove();
                }
                if removed {
                    tracing::debug!("Deregistered {} for {}", connection_id, identity);
                }
                removed
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Snapshot of the live connections for an identity, possibly empty.
    pub fn connections_for(&self, identity: &UserId) -> Vec<ConnectionHandle> {
        self.sessions
            .get(identity)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Check if an identity has at least one live connection.
    pub fn is_connected(&self, identity: &UserId) -> bool {
        self.sessions.contains_key(identity)
    }

    /// Number of identities with at least one connection.
    pub fn identity_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.sessions.iter().map(|entry| entry.value().len()).sum()
    }
}
