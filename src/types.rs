//! Basic type definitions for the chat room
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: opaque client-chosen identifier carried in protocol lines
//! - `ConnectionId`: server-side handle for one accepted connection

use uuid::Uuid;

/// Opaque client identifier (newtype pattern)
///
/// Generated client-side (a UUID v4 rendered as a string) and carried in
/// every protocol line; the server treats it as an opaque key.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(pub String);

impl ClientId {
    /// Generate a new random client ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a ClientId from wire text
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique connection handle identifier (newtype pattern)
///
/// Assigned by the server when a connection is accepted, before the
/// client has joined. Keys the registry's connection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_generate_unique() {
        let id1 = ClientId::generate();
        let id2 = ClientId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_client_id_from_string_roundtrip() {
        let id = ClientId::from_string("u1".to_string());
        assert_eq!(id.as_str(), "u1");
        assert_eq!(id.to_string(), "u1");
    }

    #[test]
    fn test_connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }
}
