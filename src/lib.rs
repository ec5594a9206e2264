//! Multi-Client TCP Chat Room Library
//!
//! A chat room server built on tokio, using the Actor pattern for state
//! management and a line-oriented text protocol over plain TCP.
//!
//! # Features
//! - Concurrent TCP connection handling with explicit line framing
//! - Delimiter-based protocol codec (`join` / `words` / `exit` events)
//! - Session registry binding client identities to display names
//! - Timestamped broadcast fan-out to every connected participant
//! - Implicit departure cleanup on abrupt disconnect
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the session registry
//! - Each connection has a handler task communicating with the server
//! - No locks needed - all state access goes through message passing
//! - Outbound delivery is per-connection and unbounded, so one slow
//!   client never stalls the room
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_room::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:12345").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod broadcast;
pub mod clock;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use broadcast::Broadcast;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, ProtocolError, SendError};
pub use handler::handle_connection;
pub use protocol::ClientEvent;
pub use registry::Registry;
pub use server::{ChatServer, ServerCommand};
pub use session::{Session, SessionState};
pub use types::{ClientId, ConnectionId};
