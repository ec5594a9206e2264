//! Error types for the chat room
//!
//! Defines application-level errors, protocol parse errors, and message
//! send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Fatal conditions that terminate a connection handler. Malformed
/// protocol input is deliberately not represented here: it is dropped
/// and logged without ending the connection.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Protocol parse errors
///
/// Produced when an inbound line does not match the wire format. The
/// connection handler logs and skips the offending line; these never
/// propagate further.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Line does not contain exactly one event delimiter
    #[error("expected exactly one \"~&~\" delimiter")]
    MalformedFrame,

    /// Payload does not contain exactly one field delimiter
    #[error("{tag} payload expected exactly one \"~#~\" delimiter")]
    MalformedPayload {
        /// Event type tag of the offending line
        tag: &'static str,
    },

    /// Type tag is not join/words/exit
    #[error("unknown event type: {0}")]
    UnknownEventType(String),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
