//! Protocol modules (outbound requests + inbound deliveries).
//!
//! Both directions use JSON text frames:
//! - `envelope`: client requests, a tagged sum type per frame.
//! - `inbound`: server deliveries with an opaque `message` payload.
//!
//! All parsers are panic-free: malformed input is reported as
//! `TopicLinkError::Protocol`.

pub mod envelope;
pub mod inbound;

pub use envelope::{Envelope, JoinRoom, LeaveRoom, Login, Message, NO_TOPIC};
pub use inbound::{render_value, InboundEnvelope};
