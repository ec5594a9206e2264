//! ChatServer Actor implementation
//!
//! The central actor that owns the session registry. Uses the Actor
//! pattern with mpsc channels for message passing: every registry
//! mutation and fan-out snapshot happens inside this task, so two
//! clients joining, speaking, or leaving concurrently can never observe
//! a torn registry state.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::broadcast::{self, Broadcast};
use crate::clock::{Clock, SystemClock};
use crate::protocol::ClientEvent;
use crate::registry::Registry;
use crate::session::Session;
use crate::types::ConnectionId;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        conn_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
    },
    /// One parsed protocol event from a connection
    Event {
        conn_id: ConnectionId,
        event: ClientEvent,
    },
    /// Connection closed (end of stream or IO error)
    Disconnect { conn_id: ConnectionId },
}

/// The main ChatServer actor
///
/// Receives commands from connection handlers and drives the broadcast
/// engine over the registry it owns.
pub struct ChatServer {
    /// All shared session state
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
    /// Timestamp source for broadcast rendering
    clock: Box<dyn Clock>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_clock(receiver, Box::new(SystemClock))
    }

    /// Create a ChatServer with an explicit timestamp source
    pub fn with_clock(receiver: mpsc::Receiver<ServerCommand>, clock: Box<dyn Clock>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
            clock,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { conn_id, sender } => {
                self.handle_connect(conn_id, sender);
            }
            ServerCommand::Event { conn_id, event } => {
                self.handle_event(conn_id, event);
            }
            ServerCommand::Disconnect { conn_id } => {
                self.handle_disconnect(conn_id);
            }
        }
    }

    /// Handle a newly accepted connection
    fn handle_connect(&mut self, conn_id: ConnectionId, sender: mpsc::UnboundedSender<String>) {
        info!("Connection {} registered", conn_id);
        self.registry.add_connection(Session::new(conn_id, sender));
        debug!(
            "Total connections: {}, joined: {}",
            self.registry.connection_count(),
            self.registry.name_count()
        );
    }

    /// Handle one protocol event from a connection
    fn handle_event(&mut self, conn_id: ConnectionId, event: ClientEvent) {
        let timestamp = self.clock.timestamp();
        match broadcast::dispatch(conn_id, event, &mut self.registry, &timestamp) {
            Some(plan) => self.deliver(plan),
            None => debug!("Ignoring event from already-departed connection {}", conn_id),
        }
    }

    /// Handle a connection closed without an explicit exit
    ///
    /// A joined session is treated as an implicit exit so the registry
    /// never accumulates broadcast-unreachable stale handles. Arrives
    /// after an explicit exit too, in which case the session is already
    /// gone and nothing happens.
    fn handle_disconnect(&mut self, conn_id: ConnectionId) {
        let identity = self
            .registry
            .session(conn_id)
            .and_then(|s| s.identity.clone());

        match identity {
            Some(id) => {
                info!("Connection {} dropped, treating as exit of {}", conn_id, id);
                let timestamp = self.clock.timestamp();
                if let Some(plan) =
                    broadcast::depart(conn_id, &id, &mut self.registry, &timestamp)
                {
                    self.deliver(plan);
                }
            }
            None => {
                if self.registry.remove_connection(conn_id).is_some() {
                    info!("Connection {} dropped before joining", conn_id);
                }
            }
        }

        debug!(
            "Total connections: {}, joined: {}",
            self.registry.connection_count(),
            self.registry.name_count()
        );
    }

    /// Fan one rendered line out to every recipient in the snapshot
    ///
    /// Unbounded sends: a slow connection buffers in its own channel and
    /// never stalls delivery to the rest of the room.
    fn deliver(&self, plan: Broadcast) {
        // Audit echo: every broadcast also lands in the server log
        info!("{}", plan.line);

        for sender in &plan.recipients {
            if sender.send(plan.line.clone()).is_err() {
                warn!("Dropping broadcast to a closed connection");
            }
        }
    }
}
