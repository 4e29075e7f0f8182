//! Connection registry: which connections are live and which player
//! identity, if any, each one is bound to.
//!
//! Pure bookkeeping, no actor types. The coordinator actor owns the single
//! instance and serializes all access through its mailbox.

use std::collections::HashMap;
use uuid::Uuid;

use super::types::PlayerId;

/// Tracks live connections and their optional player bindings.
///
/// A connection appears at most once. A player identifier is bound to at
/// most one connection at a time; binding it elsewhere displaces the old
/// binding.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<Uuid, Option<PlayerId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Add a connection at accept time, with no identity bound yet.
    pub fn register(&mut self, conn_id: Uuid) {
        self.connections.insert(conn_id, None);
    }

    /// Bind a player identity to a connection, overwriting any prior binding
    /// on that connection.
    ///
    /// If the identity was bound on another live connection, that binding is
    /// cleared and the displaced connection's id is returned so the caller
    /// can kick it. The displaced connection itself stays registered.
    pub fn bind(&mut self, conn_id: Uuid, player_id: PlayerId) -> Option<Uuid> {
        let displaced = self
            .connections
            .iter()
            .find(|(id, bound)| **id != conn_id && bound.as_deref() == Some(player_id.as_str()))
            .map(|(id, _)| *id);
        if let Some(old) = displaced {
            self.connections.insert(old, None);
        }
        self.connections.insert(conn_id, Some(player_id));
        displaced
    }

    /// Clear the binding without removing the connection. Returns the
    /// identity that was bound, if any.
    pub fn unbind(&mut self, conn_id: Uuid) -> Option<PlayerId> {
        self.connections.get_mut(&conn_id).and_then(Option::take)
    }

    /// Remove the connection entirely. Safe on never-bound or already-removed
    /// connections; returns the identity that was still bound at close.
    pub fn deregister(&mut self, conn_id: Uuid) -> Option<PlayerId> {
        self.connections.remove(&conn_id).flatten()
    }

    /// The identity currently bound to a connection.
    pub fn player_of(&self, conn_id: Uuid) -> Option<&PlayerId> {
        self.connections.get(&conn_id).and_then(Option::as_ref)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }
}
