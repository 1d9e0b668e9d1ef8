//! Transport layer.
//!
//! The session engine never touches sockets. A `Connector` opens a `Link`;
//! the driver writes encoded frames to it and reads `LinkEvent`s back.
//! Two implementations ship: WebSocket (`ws`) and in-process (`memory`).

pub mod codec;
pub mod memory;
pub mod ws;

use async_trait::async_trait;
use bytes::Bytes;

use topiclink_core::error::Result;

pub use memory::{MemoryConnector, MemoryLink, MemoryPeer};
pub use ws::{WsConnector, WsLink};

/// What a link reports to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// One inbound frame payload.
    Data(Bytes),
    /// The link is gone. `Some(reason)` when the link knows why; the
    /// session reports every remote close as a transport error either way.
    Closed(Option<String>),
}

/// One open connection.
#[async_trait]
pub trait Link: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Next inbound event. Must be cancel-safe: the driver races it against
    /// user input inside `tokio::select!`.
    async fn next_event(&mut self) -> LinkEvent;

    async fn close(&mut self) -> Result<()>;
}

/// Opens links to an endpoint URL.
#[async_trait]
pub trait Connector: Send + Sync {
    type Link: Link;

    async fn connect(&self, url: &str) -> Result<Self::Link>;
}
