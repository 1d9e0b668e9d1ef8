//! topiclink core: wire envelopes, inbound decoding, and the shared error type.
//!
//! This crate defines the JSON contract spoken between a topiclink client and
//! a pub/sub server, plus the error surface shared by the client runtime and
//! the terminal front-end. It carries no transport or runtime dependencies so
//! it can be reused by any driver (WebSocket, in-memory, test harness).
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed inbound
//! data surfaces as `TopicLinkError::Protocol` instead of crashing the client.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorKind, Result, TopicLinkError};
pub use protocol::{Envelope, InboundEnvelope, Login, Message};
