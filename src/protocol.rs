//! Wire protocol codec
//!
//! Line-oriented text protocol, one event per line. Inbound lines are
//! tokenized into [`ClientEvent`] values; outbound broadcasts are
//! rendered as timestamp-prefixed text. All functions are pure.
//!
//! Wire format:
//! - `join~&~<id>~#~<name>`
//! - `words~&~<id>~#~<text>`
//! - `exit~&~<id>`

use crate::error::ProtocolError;
use crate::types::ClientId;

/// Separates the event type tag from the payload
pub const EVENT_DELIMITER: &str = "~&~";

/// Separates the two payload fields of `join` and `words`
pub const FIELD_DELIMITER: &str = "~#~";

/// Display name rendered when an id has no bound name
pub const UNKNOWN_NAME: &str = "unknown";

/// Label for join/exit announcements ("system message")
const SYSTEM_LABEL: &str = "系统消息";

/// Client -> Server event
///
/// The typed result of parsing one wire line. Consumed exactly once by
/// the broadcast engine; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Client joined the room with a display name
    Join { id: ClientId, name: String },
    /// Client sent a chat message
    Words { id: ClientId, text: String },
    /// Client left the room
    Exit { id: ClientId },
}

/// Parse one inbound line into a [`ClientEvent`]
///
/// The line must contain exactly one event delimiter, and a `join` or
/// `words` payload must contain exactly one field delimiter. The `exit`
/// payload is the id as-is, with no secondary split. Text containing a
/// delimiter sequence cannot be represented in this format; such lines
/// fail the exactly-one checks and are rejected.
pub fn parse_line(line: &str) -> Result<ClientEvent, ProtocolError> {
    let (tag, payload) =
        split_exactly_once(line, EVENT_DELIMITER).ok_or(ProtocolError::MalformedFrame)?;

    match tag {
        "join" => {
            let (id, name) = split_exactly_once(payload, FIELD_DELIMITER)
                .ok_or(ProtocolError::MalformedPayload { tag: "join" })?;
            Ok(ClientEvent::Join {
                id: ClientId::from_string(id.to_string()),
                name: name.to_string(),
            })
        }
        "words" => {
            let (id, text) = split_exactly_once(payload, FIELD_DELIMITER)
                .ok_or(ProtocolError::MalformedPayload { tag: "words" })?;
            Ok(ClientEvent::Words {
                id: ClientId::from_string(id.to_string()),
                text: text.to_string(),
            })
        }
        "exit" => Ok(ClientEvent::Exit {
            id: ClientId::from_string(payload.to_string()),
        }),
        other => Err(ProtocolError::UnknownEventType(other.to_string())),
    }
}

/// Split on a delimiter that must occur exactly once
fn split_exactly_once<'a>(input: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let (head, tail) = input.split_once(delimiter)?;
    if tail.contains(delimiter) {
        return None;
    }
    Some((head, tail))
}

/// Encode a join line for the wire
pub fn encode_join(id: &ClientId, name: &str) -> String {
    format!("join{}{}{}{}", EVENT_DELIMITER, id, FIELD_DELIMITER, name)
}

/// Encode a chat line for the wire
pub fn encode_words(id: &ClientId, text: &str) -> String {
    format!("words{}{}{}{}", EVENT_DELIMITER, id, FIELD_DELIMITER, text)
}

/// Encode an exit line for the wire
pub fn encode_exit(id: &ClientId) -> String {
    format!("exit{}{}", EVENT_DELIMITER, id)
}

/// Render a chat broadcast: `<timestamp> 【<name>】<text>`
pub fn render_words(timestamp: &str, name: &str, text: &str) -> String {
    format!("{} 【{}】{}", timestamp, name, text)
}

/// Render a join announcement: `<timestamp> 【系统消息】<name> 加入了群聊`
pub fn render_join(timestamp: &str, name: &str) -> String {
    format!("{} 【{}】{} 加入了群聊", timestamp, SYSTEM_LABEL, name)
}

/// Render an exit announcement: `<timestamp> 【系统消息】<name> 退出了群聊`
pub fn render_exit(timestamp: &str, name: &str) -> String {
    format!("{} 【{}】{} 退出了群聊", timestamp, SYSTEM_LABEL, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2020-08-07 19:50:00";

    #[test]
    fn test_parse_join() {
        let event = parse_line("join~&~u1~#~Alice").unwrap();
        assert_eq!(
            event,
            ClientEvent::Join {
                id: ClientId::from_string("u1".to_string()),
                name: "Alice".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_words() {
        let event = parse_line("words~&~u1~#~hello there").unwrap();
        assert_eq!(
            event,
            ClientEvent::Words {
                id: ClientId::from_string("u1".to_string()),
                text: "hello there".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_exit() {
        let event = parse_line("exit~&~u1").unwrap();
        assert_eq!(
            event,
            ClientEvent::Exit {
                id: ClientId::from_string("u1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_exit_payload_not_split() {
        // exit has no secondary split; the whole payload is the id
        let event = parse_line("exit~&~u1~#~junk").unwrap();
        assert_eq!(
            event,
            ClientEvent::Exit {
                id: ClientId::from_string("u1~#~junk".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_missing_event_delimiter() {
        assert!(matches!(
            parse_line("hello"),
            Err(ProtocolError::MalformedFrame)
        ));
        assert!(matches!(parse_line(""), Err(ProtocolError::MalformedFrame)));
    }

    #[test]
    fn test_parse_repeated_event_delimiter() {
        assert!(matches!(
            parse_line("words~&~u1~&~hello"),
            Err(ProtocolError::MalformedFrame)
        ));
    }

    #[test]
    fn test_parse_missing_field_delimiter() {
        assert!(matches!(
            parse_line("join~&~u1"),
            Err(ProtocolError::MalformedPayload { tag: "join" })
        ));
        assert!(matches!(
            parse_line("words~&~u1"),
            Err(ProtocolError::MalformedPayload { tag: "words" })
        ));
    }

    #[test]
    fn test_parse_repeated_field_delimiter() {
        assert!(matches!(
            parse_line("words~&~u1~#~a~#~b"),
            Err(ProtocolError::MalformedPayload { tag: "words" })
        ));
    }

    #[test]
    fn test_parse_unknown_tag() {
        match parse_line("rename~&~u1~#~Bob") {
            Err(ProtocolError::UnknownEventType(tag)) => assert_eq!(tag, "rename"),
            other => panic!("expected UnknownEventType, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_matches_parse() {
        let id = ClientId::from_string("u1".to_string());
        assert_eq!(encode_join(&id, "Alice"), "join~&~u1~#~Alice");
        assert_eq!(encode_words(&id, "hello"), "words~&~u1~#~hello");
        assert_eq!(encode_exit(&id), "exit~&~u1");

        let event = parse_line(&encode_join(&id, "Alice")).unwrap();
        assert_eq!(
            event,
            ClientEvent::Join {
                id,
                name: "Alice".to_string(),
            }
        );
    }

    #[test]
    fn test_render_words() {
        assert_eq!(
            render_words(TS, "Alice", "hello"),
            "2020-08-07 19:50:00 【Alice】hello"
        );
    }

    #[test]
    fn test_render_join() {
        assert_eq!(
            render_join(TS, "Alice"),
            "2020-08-07 19:50:00 【系统消息】Alice 加入了群聊"
        );
    }

    #[test]
    fn test_render_exit() {
        assert_eq!(
            render_exit(TS, "Alice"),
            "2020-08-07 19:50:00 【系统消息】Alice 退出了群聊"
        );
    }
}
