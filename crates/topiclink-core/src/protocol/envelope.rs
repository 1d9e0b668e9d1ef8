//! Outbound envelope (JSON text frame).
//!
//! The message body is an externally tagged sum type, so every envelope
//! carries exactly one variant:
//! `{"topic":"room1","message":{"join_room":{}}}`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopicLinkError};

/// Topic value reserved for envelopes that address no channel (login).
pub const NO_TOPIC: &str = "";

/// Client -> server envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Pub/sub channel. Empty for `login`.
    pub topic: String,
    /// Exactly one request variant.
    pub message: Message,
}

/// Request variants understood by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Establish the display name of this connection.
    Login(Login),
    /// Subscribe the connection to the envelope topic.
    JoinRoom(JoinRoom),
    /// Drop the subscription to the envelope topic.
    LeaveRoom(LeaveRoom),
    /// Publish text to the envelope topic.
    SendMessage(String),
}

/// Payload of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub name: String,
}

/// Payload of `join_room` (always `{}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {}

/// Payload of `leave_room` (always `{}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoom {}

impl Envelope {
    pub fn login(name: impl Into<String>) -> Self {
        Self {
            topic: NO_TOPIC.to_string(),
            message: Message::Login(Login { name: name.into() }),
        }
    }

    pub fn join_room(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            message: Message::JoinRoom(JoinRoom {}),
        }
    }

    pub fn leave_room(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            message: Message::LeaveRoom(LeaveRoom {}),
        }
    }

    pub fn send_message(topic: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            message: Message::SendMessage(text.into()),
        }
    }

    /// Serialize to the JSON text sent over the connection.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| TopicLinkError::Internal(format!("envelope encode failed: {e}")))
    }

    /// Parse an outbound envelope (used by fixtures and servers speaking the same wire).
    pub fn decode(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| TopicLinkError::Protocol(format!("invalid envelope json: {e}")))
    }

    /// Variant name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self.message {
            Message::Login(_) => "login",
            Message::JoinRoom(_) => "join_room",
            Message::LeaveRoom(_) => "leave_room",
            Message::SendMessage(_) => "send_message",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn encodes_each_variant_in_wire_shape() {
        assert_eq!(
            Envelope::login("hello world").encode().unwrap(),
            r#"{"topic":"","message":{"login":{"name":"hello world"}}}"#
        );
        assert_eq!(
            Envelope::join_room("room1").encode().unwrap(),
            r#"{"topic":"room1","message":{"join_room":{}}}"#
        );
        assert_eq!(
            Envelope::leave_room("room1").encode().unwrap(),
            r#"{"topic":"room1","message":{"leave_room":{}}}"#
        );
        assert_eq!(
            Envelope::send_message("a", "hello world").encode().unwrap(),
            r#"{"topic":"a","message":{"send_message":"hello world"}}"#
        );
    }

    #[test]
    fn decode_rejects_two_variants() {
        let s = r#"{"topic":"a","message":{"join_room":{},"send_message":"x"}}"#;
        let err = Envelope::decode(s).unwrap_err();
        assert_eq!(err.kind().as_str(), "PROTOCOL");
    }

    #[test]
    fn server_side_join_aliases_are_not_part_of_the_client_wire() {
        for v in ["create_room", "join_user", "leave_user"] {
            let s = format!(r#"{{"topic":"a","message":{{"{v}":{{}}}}}}"#);
            let err = Envelope::decode(&s).unwrap_err();
            assert_eq!(err.kind().as_str(), "PROTOCOL", "variant={v}");
        }
    }

    #[test]
    fn decode_rejects_unknown_variant() {
        let s = r#"{"topic":"a","message":{"shout":"x"}}"#;
        assert!(Envelope::decode(s).is_err());
    }
}
