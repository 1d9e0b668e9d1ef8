//! topiclink client library entry.
//!
//! This crate wires the session engine, the transport seam, and the async
//! driver into a pub/sub client. It is consumed by the terminal binary
//! (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod command;
pub mod config;
pub mod session;
pub mod transport;

pub use client::Client;
pub use session::{ChannelObserver, ConnectionState, Session, SessionEvent, SessionObserver};
