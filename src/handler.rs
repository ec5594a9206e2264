//! TCP connection handler
//!
//! Handles one client connection: explicit line framing over the byte
//! stream, protocol parsing, and bidirectional plumbing between the
//! socket and the ChatServer actor.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::protocol::{self, ClientEvent};
use crate::server::ServerCommand;
use crate::types::ConnectionId;

/// Handle a new TCP connection
///
/// Registers the connection with the ChatServer, then runs a read task
/// (inbound lines to parsed events) and a write task (broadcast lines to
/// the socket) until either side finishes. A malformed line is dropped
/// and logged without ending the connection; one client's bad input
/// never affects the rest of the room.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let conn_id = ConnectionId::new();
    info!("Connection {} accepted from {}", conn_id, peer_addr);

    let (read_half, write_half) = stream.into_split();

    // Channel for server -> client broadcast lines
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    // Register with ChatServer
    if cmd_tx
        .send(ServerCommand::Connect {
            conn_id,
            sender: line_tx,
        })
        .await
        .is_err()
    {
        warn!("Failed to register connection {} - server closed", conn_id);
        return Err(AppError::ChannelSend);
    }

    let cmd_tx_read = cmd_tx.clone();

    // Read task: framed lines -> parsed events -> ServerCommand.
    // TCP gives no message boundaries, so logical messages are split on
    // the line terminator regardless of how the bytes arrived.
    let read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match protocol::parse_line(&line) {
                    Ok(event) => {
                        let is_exit = matches!(event, ClientEvent::Exit { .. });
                        if cmd_tx_read
                            .send(ServerCommand::Event { conn_id, event })
                            .await
                            .is_err()
                        {
                            debug!("Server closed, ending read task for {}", conn_id);
                            break;
                        }
                        if is_exit {
                            // Terminal transition: nothing further to read
                            debug!("Connection {} sent exit", conn_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Dropping malformed line from {}: {}", conn_id, e);
                    }
                },
                Ok(None) => {
                    debug!("Connection {} closed by peer", conn_id);
                    break;
                }
                Err(e) => {
                    warn!("Read error on connection {}: {}", conn_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", conn_id);
    });

    // Write task: broadcast lines -> socket, newline-terminated, flushed
    // per line. Ends when the session is removed from the registry and
    // the channel closes.
    let write_task = tokio::spawn(async move {
        let mut writer = write_half;
        while let Some(line) = line_rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                debug!("Socket write failed, ending write task");
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
        debug!("Write task ended for connection");
        let _ = writer.shutdown().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", conn_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", conn_id);
        }
    }

    // Report the close. If the peer dropped without an explicit exit,
    // the server turns this into the departure announcement; after a
    // processed exit it is a no-op.
    let _ = cmd_tx.send(ServerCommand::Disconnect { conn_id }).await;

    info!("Connection {} closed", conn_id);

    Ok(())
}
