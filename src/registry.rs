//! Session registry
//!
//! Process-wide shared state: the set of live connections and the
//! mapping from client identity to display name. Owned exclusively by
//! the `ChatServer` actor, which serializes every mutation and snapshot,
//! so no interior locking is needed.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::session::Session;
use crate::types::{ClientId, ConnectionId};

/// Live connections and joined identities
///
/// A session present in `sessions` but with no entry in `names` is
/// "connected but not yet joined". A name entry exists exactly between
/// its join event being processed and its exit event being processed.
#[derive(Debug, Default)]
pub struct Registry {
    /// All live connections: ConnectionId -> Session
    sessions: HashMap<ConnectionId, Session>,
    /// Joined identities: ClientId -> display name
    names: HashMap<ClientId, String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly accepted connection (no name yet)
    pub fn add_connection(&mut self, session: Session) {
        self.sessions.insert(session.conn_id, session);
    }

    /// Remove a connection; idempotent
    pub fn remove_connection(&mut self, conn_id: ConnectionId) -> Option<Session> {
        self.sessions.remove(&conn_id)
    }

    /// Associate a display name with an id; last-write-wins
    pub fn bind_name(&mut self, id: ClientId, name: String) {
        self.names.insert(id, name);
    }

    /// Look up the display name bound to an id
    pub fn lookup_name(&self, id: &ClientId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Remove and return the display name bound to an id; idempotent
    pub fn remove_name(&mut self, id: &ClientId) -> Option<String> {
        self.names.remove(id)
    }

    /// Get a session by connection handle
    pub fn session(&self, conn_id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&conn_id)
    }

    /// Get a mutable session by connection handle
    pub fn session_mut(&mut self, conn_id: ConnectionId) -> Option<&mut Session> {
        self.sessions.get_mut(&conn_id)
    }

    /// Point-in-time snapshot of every live connection's outbound channel
    ///
    /// The fan-out target set. Senders are cheap clones; the snapshot
    /// stays valid even if the registry mutates afterwards.
    pub fn connections(&self) -> Vec<mpsc::UnboundedSender<String>> {
        self.sessions.values().map(|s| s.sender.clone()).collect()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of joined identities
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> (Session, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Session::new(ConnectionId::new(), tx), rx)
    }

    fn id(s: &str) -> ClientId {
        ClientId::from_string(s.to_string())
    }

    #[test]
    fn test_add_and_remove_connection() {
        let mut registry = Registry::new();
        let (session, _rx) = test_session();
        let conn_id = session.conn_id;

        registry.add_connection(session);
        assert_eq!(registry.connection_count(), 1);
        assert!(registry.session(conn_id).is_some());

        assert!(registry.remove_connection(conn_id).is_some());
        assert_eq!(registry.connection_count(), 0);

        // Second removal is a no-op
        assert!(registry.remove_connection(conn_id).is_none());
    }

    #[test]
    fn test_bind_lookup_remove_name() {
        let mut registry = Registry::new();

        assert!(registry.lookup_name(&id("u1")).is_none());

        registry.bind_name(id("u1"), "Alice".to_string());
        assert_eq!(registry.lookup_name(&id("u1")), Some("Alice"));
        assert_eq!(registry.name_count(), 1);

        assert_eq!(registry.remove_name(&id("u1")), Some("Alice".to_string()));
        assert!(registry.lookup_name(&id("u1")).is_none());
        assert!(registry.remove_name(&id("u1")).is_none());
    }

    #[test]
    fn test_bind_name_last_write_wins() {
        let mut registry = Registry::new();

        registry.bind_name(id("u1"), "Alice".to_string());
        registry.bind_name(id("u1"), "Alicia".to_string());

        assert_eq!(registry.lookup_name(&id("u1")), Some("Alicia"));
        assert_eq!(registry.name_count(), 1);
    }

    #[test]
    fn test_connections_snapshot() {
        let mut registry = Registry::new();
        let (s1, mut rx1) = test_session();
        let (s2, mut rx2) = test_session();
        let conn1 = s1.conn_id;
        registry.add_connection(s1);
        registry.add_connection(s2);

        let snapshot = registry.connections();
        assert_eq!(snapshot.len(), 2);

        // Snapshot remains deliverable after the registry mutates
        registry.remove_connection(conn1);
        for sender in &snapshot {
            sender.send("line".to_string()).unwrap();
        }
        assert_eq!(rx1.try_recv().unwrap(), "line");
        assert_eq!(rx2.try_recv().unwrap(), "line");
    }

    #[test]
    fn test_connected_but_not_joined() {
        let mut registry = Registry::new();
        let (session, _rx) = test_session();
        registry.add_connection(session);

        // Transport-level member with no name entry yet
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.name_count(), 0);
    }
}
