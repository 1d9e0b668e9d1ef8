//! Inbound envelope parsing (panic-free).
//!
//! Server messages carry `topic`, a per-topic `sequence`, and a `message`
//! whose schema belongs to the server. The client keeps `message` opaque and
//! only flattens it for display.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TopicLinkError};

/// Server -> client envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    /// Channel the message was published on.
    pub topic: String,
    /// Server-assigned sequence number. Opaque to the client.
    pub sequence: u64,
    /// Server-defined payload.
    #[serde(default)]
    pub message: Option<Value>,
}

impl InboundEnvelope {
    /// Decode from raw frame bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| TopicLinkError::Protocol(format!("invalid inbound envelope: {e}")))
    }

    /// Flattened display form of `message`.
    pub fn render(&self) -> String {
        self.message.as_ref().map(render_value).unwrap_or_default()
    }
}

/// Strings verbatim, single-key objects by their payload, null as empty,
/// anything else as compact JSON.
pub fn render_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(inner) => render_value(inner),
            None => String::new(),
        },
        other => other.to_string(),
    }
}
