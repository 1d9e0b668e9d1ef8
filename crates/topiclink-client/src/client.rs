//! Async driver: one `Session`, one `Connector`, at most one open `Link`.
//!
//! Everything runs on the caller's task. Intents return validation and
//! connection errors synchronously; transport failures surface through the
//! observer as a `Closed` transition with a reason.

use tracing::{debug, warn};

use topiclink_core::error::{Result, TopicLinkError};

use crate::session::{ConnectionState, Session, SessionObserver};
use crate::transport::{Connector, Link, LinkEvent};

pub struct Client<C: Connector, O> {
    connector: C,
    url: String,
    session: Session<O>,
    link: Option<C::Link>,
}

impl<C: Connector, O: SessionObserver> Client<C, O> {
    pub fn new(connector: C, url: impl Into<String>, observer: O) -> Self {
        Self {
            connector,
            url: url.into(),
            session: Session::new(observer),
            link: None,
        }
    }

    pub fn session(&self) -> &Session<O> {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.session.state()
    }

    /// Connect if `Disconnected`/`Closed`. The outcome is reported to the
    /// observer (`Open`, or `Closed` with the failure reason); no retries.
    pub async fn open(&mut self) {
        if !self.session.open() {
            return;
        }
        match self.connector.connect(&self.url).await {
            Ok(link) => {
                self.link = Some(link);
                self.session.on_connected();
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "connect failed");
                self.session.on_connect_failed(reason_of(e));
            }
        }
    }

    pub async fn login(&mut self, name: &str) -> Result<()> {
        self.session.login(name)?;
        self.flush().await;
        Ok(())
    }

    pub async fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.session.subscribe(topic)?;
        self.flush().await;
        Ok(())
    }

    pub async fn unsubscribe(&mut self, topic: &str) -> Result<()> {
        self.session.unsubscribe(topic)?;
        self.flush().await;
        Ok(())
    }

    pub async fn publish(&mut self, topic: &str, text: &str) -> Result<()> {
        self.session.publish(topic, text)?;
        self.flush().await;
        Ok(())
    }

    /// Tear down the current link. Idempotent.
    pub async fn close(&mut self) {
        if !self.session.state().is_active() {
            return;
        }
        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.close().await {
                debug!(error = %e, "close handshake failed");
            }
        }
        self.session.close();
    }

    /// Wait for the next link event. Never resolves while no link is open,
    /// so it can sit in a `tokio::select!` next to other sources.
    pub async fn next_link_event(&mut self) -> LinkEvent {
        match self.link.as_mut() {
            Some(link) => link.next_event().await,
            None => std::future::pending::<LinkEvent>().await,
        }
    }

    pub fn handle_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Data(data) => self.session.handle_inbound(&data),
            LinkEvent::Closed(reason) => {
                self.link = None;
                self.session.on_disconnected(reason);
            }
        }
    }

    /// Receive and apply one link event. Returns the state afterwards.
    pub async fn pump(&mut self) -> ConnectionState {
        let event = self.next_link_event().await;
        self.handle_link_event(event);
        self.session.state()
    }

    async fn flush(&mut self) {
        while let Some(frame) = self.session.pop_outbound() {
            let Some(link) = self.link.as_mut() else {
                // session thinks it is open without a link: treat as lost
                self.session.on_disconnected(Some("no transport".into()));
                return;
            };
            if let Err(e) = link.send_text(frame).await {
                warn!(error = %e, "send failed");
                self.link = None;
                self.session.on_disconnected(Some(reason_of(e)));
                return;
            }
        }
    }
}

fn reason_of(e: TopicLinkError) -> String {
    match e {
        TopicLinkError::Transport(reason) => reason,
        other => other.to_string(),
    }
}
