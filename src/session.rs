//! Session struct definition
//!
//! Represents one accepted connection with its protocol state and
//! outbound line channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::{ClientId, ConnectionId};

/// Protocol state of a session
///
/// A session starts `Connected`, becomes `Joined` once its join event is
/// processed, and ends `Left` (terminal) when it departs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection accepted, no join processed yet
    Connected,
    /// Join processed; the identity has a bound display name
    Joined,
    /// Departed (terminal)
    Left,
}

/// Connected session information
///
/// Holds the connection handle identity, the outbound line channel to
/// the connection's writer task, and the protocol-level identity once
/// the client has joined. The writer task owns the socket; the session
/// only holds the channel into it.
#[derive(Debug)]
pub struct Session {
    /// Handle identity for this connection
    pub conn_id: ConnectionId,
    /// Server -> client outbound line channel
    pub sender: mpsc::UnboundedSender<String>,
    /// Protocol identity (None before the join event)
    pub identity: Option<ClientId>,
    /// Protocol state machine position
    pub state: SessionState,
}

impl Session {
    /// Create a new session for an accepted connection
    pub fn new(conn_id: ConnectionId, sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            conn_id,
            sender,
            identity: None,
            state: SessionState::Connected,
        }
    }

    /// Send one line to this session's connection
    ///
    /// Returns an error if the channel is closed (client disconnected).
    /// Unbounded send, so broadcast fan-out never blocks on a slow peer.
    pub fn send(&self, line: String) -> Result<(), SendError> {
        self.sender.send(line).map_err(|_| SendError::ChannelClosed)
    }

    /// Record a processed join event for this session
    pub fn mark_joined(&mut self, id: ClientId) {
        self.identity = Some(id);
        self.state = SessionState::Joined;
    }

    /// Record the terminal transition
    pub fn mark_left(&mut self) {
        self.state = SessionState::Left;
    }

    /// Check if this session has completed its join handshake
    pub fn is_joined(&self) -> bool {
        self.state == SessionState::Joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = Session::new(ConnectionId::new(), tx);

        assert!(session.identity.is_none());
        assert_eq!(session.state, SessionState::Connected);
        assert!(!session.is_joined());
    }

    #[tokio::test]
    async fn test_session_join_transition() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(ConnectionId::new(), tx);

        session.mark_joined(ClientId::from_string("u1".to_string()));

        assert!(session.is_joined());
        assert_eq!(
            session.identity,
            Some(ClientId::from_string("u1".to_string()))
        );

        session.mark_left();
        assert_eq!(session.state, SessionState::Left);
        assert!(!session.is_joined());
    }

    #[tokio::test]
    async fn test_session_send() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = Session::new(ConnectionId::new(), tx);

        session.send("hello".to_string()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_session_send_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session::new(ConnectionId::new(), tx);
        drop(rx);

        assert!(matches!(
            session.send("hello".to_string()),
            Err(SendError::ChannelClosed)
        ));
    }
}
