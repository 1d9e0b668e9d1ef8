//! WebSocket link (tokio-tungstenite client).
//!
//! Responsibilities:
//! - Connect to `ws://` / `wss://` endpoints (rustls, webpki roots)
//! - Write text frames, read frames through the codec
//! - Best-effort close handshake

use std::sync::Once;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use topiclink_core::error::Result;

use super::codec::{self, transport_err};
use super::{Connector, Link, LinkEvent};

#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    type Link = WsLink;

    async fn connect(&self, url: &str) -> Result<WsLink> {
        install_crypto_provider();
        let (stream, response) = connect_async(url).await.map_err(transport_err)?;
        debug!(url, status = %response.status(), "websocket connected");
        Ok(WsLink { stream })
    }
}

/// `wss://` handshakes need a process-wide rustls provider.
fn install_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // Err: some other provider was installed first
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }
    });
}

pub struct WsLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Link for WsLink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        debug!(frame = %text, "sending");
        self.stream
            .send(codec::encode(text))
            .await
            .map_err(transport_err)
    }

    async fn next_event(&mut self) -> LinkEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if let Some(ev) = codec::decode(msg) {
                        return ev;
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "websocket error");
                    return LinkEvent::Closed(Some(e.to_string()));
                }
                None => return LinkEvent::Closed(None),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await.map_err(transport_err)
    }
}
