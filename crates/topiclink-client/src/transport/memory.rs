//! In-process link over tokio channels.
//!
//! `MemoryConnector` behaves like a dialer to a listener: every successful
//! `connect` hands a `MemoryPeer` to whoever holds the accept receiver.
//! Dropping that receiver makes further connects fail (connection refused).

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use topiclink_core::error::{Result, TopicLinkError};

use super::{Connector, Link, LinkEvent};

#[derive(Debug, Clone)]
pub struct MemoryConnector {
    accept_tx: mpsc::UnboundedSender<MemoryPeer>,
}

impl MemoryConnector {
    /// Connector plus the "listener" side that receives one peer per connect.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemoryPeer>) {
        let (accept_tx, accept_rx) = mpsc::unbounded_channel();
        (Self { accept_tx }, accept_rx)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Link = MemoryLink;

    async fn connect(&self, url: &str) -> Result<MemoryLink> {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        let peer = MemoryPeer {
            url: url.to_string(),
            sent: out_rx,
            inbound: in_tx,
        };
        self.accept_tx
            .send(peer)
            .map_err(|_| TopicLinkError::Transport(format!("connection refused: {url}")))?;

        Ok(MemoryLink {
            outbound: Some(out_tx),
            inbound: in_rx,
        })
    }
}

#[derive(Debug)]
pub struct MemoryLink {
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: mpsc::UnboundedReceiver<LinkEvent>,
}

#[async_trait]
impl Link for MemoryLink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        let tx = self
            .outbound
            .as_ref()
            .ok_or_else(|| TopicLinkError::Transport("link closed".into()))?;
        tx.send(text)
            .map_err(|_| TopicLinkError::Transport("peer gone".into()))
    }

    async fn next_event(&mut self) -> LinkEvent {
        self.inbound.recv().await.unwrap_or(LinkEvent::Closed(None))
    }

    async fn close(&mut self) -> Result<()> {
        self.outbound = None;
        self.inbound.close();
        Ok(())
    }
}

/// Server-side half of a memory link.
#[derive(Debug)]
pub struct MemoryPeer {
    url: String,
    sent: mpsc::UnboundedReceiver<String>,
    inbound: mpsc::UnboundedSender<LinkEvent>,
}

impl MemoryPeer {
    /// URL the client dialed.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Next frame written by the client; `None` once the client closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.sent.recv().await
    }

    /// Frame already written by the client, without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        self.sent.try_recv().ok()
    }

    /// Push a text frame to the client. Returns `false` when the client is gone.
    pub fn deliver(&self, text: impl Into<String>) -> bool {
        self.deliver_bytes(Bytes::from(text.into()))
    }

    pub fn deliver_bytes(&self, data: Bytes) -> bool {
        self.inbound.send(LinkEvent::Data(data)).is_ok()
    }

    /// End the link from the server side.
    pub fn close(self, reason: Option<String>) {
        let _ = self.inbound.send(LinkEvent::Closed(reason));
    }
}
