//! Broadcast engine
//!
//! Turns one parsed client event into its registry mutation plus the
//! rendered broadcast line and the recipient snapshot. Pure with respect
//! to I/O; the `ChatServer` actor performs the actual fan-out.

use tokio::sync::mpsc;

use crate::protocol::{self, ClientEvent, UNKNOWN_NAME};
use crate::registry::Registry;
use crate::types::{ClientId, ConnectionId};

/// One rendered broadcast with its fan-out target snapshot
#[derive(Debug)]
pub struct Broadcast {
    /// Rendered, timestamp-prefixed line
    pub line: String,
    /// Outbound channels captured at dispatch time
    pub recipients: Vec<mpsc::UnboundedSender<String>>,
}

/// Apply one event to the registry and compute the resulting broadcast
///
/// Returns `None` when the event produces no broadcast (a duplicate
/// exit for an already-departed session).
pub fn dispatch(
    conn_id: ConnectionId,
    event: ClientEvent,
    registry: &mut Registry,
    timestamp: &str,
) -> Option<Broadcast> {
    match event {
        ClientEvent::Join { id, name } => {
            // Bind before snapshotting so the joiner's own connection is
            // among the recipients of the announcement.
            registry.bind_name(id.clone(), name.clone());
            if let Some(session) = registry.session_mut(conn_id) {
                session.mark_joined(id);
            }
            Some(Broadcast {
                line: protocol::render_join(timestamp, &name),
                recipients: registry.connections(),
            })
        }
        ClientEvent::Words { id, text } => {
            let name = registry.lookup_name(&id).unwrap_or(UNKNOWN_NAME);
            Some(Broadcast {
                line: protocol::render_words(timestamp, name, &text),
                recipients: registry.connections(),
            })
        }
        ClientEvent::Exit { id } => depart(conn_id, &id, registry, timestamp),
    }
}

/// Remove a departing session and compose its exit announcement
///
/// Shared by explicit exit events and implicit disconnect cleanup. The
/// name is captured before removal so the announcement still carries it;
/// the snapshot is taken after removal so the departing connection does
/// not receive its own announcement.
pub fn depart(
    conn_id: ConnectionId,
    id: &ClientId,
    registry: &mut Registry,
    timestamp: &str,
) -> Option<Broadcast> {
    let name = registry.remove_name(id);
    let mut session = registry.remove_connection(conn_id);

    // Both gone already: duplicate exit, nothing to announce
    if name.is_none() && session.is_none() {
        return None;
    }

    if let Some(session) = session.as_mut() {
        session.mark_left();
    }

    let name = name.unwrap_or_else(|| UNKNOWN_NAME.to_string());
    Some(Broadcast {
        line: protocol::render_exit(timestamp, &name),
        recipients: registry.connections(),
    })
}
