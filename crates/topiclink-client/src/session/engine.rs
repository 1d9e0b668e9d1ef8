//! Session engine (sans-IO).
//!
//! Responsibilities:
//! - Connection lifecycle: Disconnected -> Connecting -> Open -> Closed
//! - Validate and encode intents (login / subscribe / unsubscribe / publish)
//! - Decode inbound frames and hand them to the observer in receipt order
//!
//! The engine never performs I/O. Encoded frames are queued in an outbox that
//! the driver flushes to the transport, and transport events are fed back in
//! through the `on_*` / `handle_inbound` methods.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use topiclink_core::error::{Result, TopicLinkError};
use topiclink_core::protocol::{Envelope, InboundEnvelope};

use super::observer::SessionObserver;
use super::state::{ConnectionState, SessionState};

/// Reason attached when the link ends without saying why.
pub const PEER_CLOSED: &str = "closed by peer";

pub struct Session<O> {
    state: SessionState,
    outbox: VecDeque<String>,
    observer: O,
}

impl<O: SessionObserver> Session<O> {
    pub fn new(observer: O) -> Self {
        Self {
            state: SessionState::default(),
            outbox: VecDeque::new(),
            observer,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.connection
    }

    pub fn identity(&self) -> Option<&str> {
        self.state.identity.as_deref()
    }

    pub fn subscribed_topics(&self) -> &BTreeSet<String> {
        &self.state.subscribed
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.state.subscribed.contains(topic)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    // --------------------
    // Lifecycle
    // --------------------

    /// Enter `Connecting`. Returns `false` (and does nothing) when a
    /// connection is already open or being established.
    pub fn open(&mut self) -> bool {
        if !self.state.connection.can_open() {
            debug!(state = %self.state.connection, "open ignored");
            return false;
        }
        self.transition(ConnectionState::Connecting, None);
        true
    }

    /// Transport established.
    pub fn on_connected(&mut self) {
        if self.state.connection != ConnectionState::Connecting {
            debug!(state = %self.state.connection, "late connect ignored");
            return;
        }
        self.transition(ConnectionState::Open, None);
    }

    /// Transport could not be established.
    pub fn on_connect_failed(&mut self, reason: impl Into<String>) {
        if self.state.connection != ConnectionState::Connecting {
            return;
        }
        let err = TopicLinkError::Transport(reason.into());
        self.enter_closed(Some(err));
    }

    /// Transport went away (peer close, read/write failure). Always reported
    /// with a `Transport` reason; only a local `close()` closes without one.
    pub fn on_disconnected(&mut self, reason: Option<String>) {
        if !self.state.connection.is_active() {
            return;
        }
        let reason = reason.unwrap_or_else(|| PEER_CLOSED.to_string());
        self.enter_closed(Some(TopicLinkError::Transport(reason)));
    }

    /// Local shutdown. Returns `true` when there was a connection to tear down;
    /// repeated calls are no-ops without notifications.
    pub fn close(&mut self) -> bool {
        if !self.state.connection.is_active() {
            return false;
        }
        self.enter_closed(None);
        true
    }

    // --------------------
    // Intents
    // --------------------

    /// Send `login` with the trimmed name and adopt it as identity (optimistic).
    pub fn login(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TopicLinkError::Validation("name must not be empty".into()));
        }
        self.ensure_open()?;

        self.enqueue(&Envelope::login(name))?;
        self.state.identity = Some(name.to_string());
        info!(identity = name, "login sent");
        Ok(())
    }

    /// Send `join_room` and record the topic as joined (optimistic).
    pub fn subscribe(&mut self, topic: &str) -> Result<()> {
        validate_topic(topic)?;
        self.ensure_open()?;

        self.enqueue(&Envelope::join_room(topic))?;
        self.state.subscribed.insert(topic.to_string());
        info!(topic, "subscribe sent");
        Ok(())
    }

    /// Send `leave_room` and forget the topic.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<()> {
        validate_topic(topic)?;
        self.ensure_open()?;

        self.enqueue(&Envelope::leave_room(topic))?;
        self.state.subscribed.remove(topic);
        info!(topic, "unsubscribe sent");
        Ok(())
    }

    /// Fire-and-forget publish. `text` is not validated and may be empty.
    pub fn publish(&mut self, topic: &str, text: &str) -> Result<()> {
        validate_topic(topic)?;
        self.ensure_open()?;

        self.enqueue(&Envelope::send_message(topic, text))?;
        debug!(topic, len = text.len(), "publish queued");
        Ok(())
    }

    // --------------------
    // Inbound / outbound plumbing
    // --------------------

    /// Decode one inbound frame and forward it. Malformed frames are reported
    /// to the observer and dropped; the connection is kept.
    pub fn handle_inbound(&mut self, data: &[u8]) {
        if self.state.connection != ConnectionState::Open {
            debug!(state = %self.state.connection, bytes = data.len(), "inbound frame dropped");
            return;
        }
        match InboundEnvelope::decode(data) {
            Ok(env) => {
                debug!(topic = %env.topic, sequence = env.sequence, "inbound message");
                self.observer.on_message(env);
            }
            Err(e) => self.observer.on_protocol_error(&e),
        }
    }

    /// Next encoded frame to write, FIFO.
    pub fn pop_outbound(&mut self) -> Option<String> {
        self.outbox.pop_front()
    }

    pub fn has_outbound(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state.connection != ConnectionState::Open {
            return Err(TopicLinkError::NotConnected);
        }
        Ok(())
    }

    fn enqueue(&mut self, env: &Envelope) -> Result<()> {
        let frame = env.encode()?;
        self.outbox.push_back(frame);
        Ok(())
    }

    fn enter_closed(&mut self, reason: Option<TopicLinkError>) {
        // in-flight frames are best-effort
        self.outbox.clear();
        self.state.forget_connection();
        self.transition(ConnectionState::Closed, reason);
    }

    fn transition(&mut self, next: ConnectionState, reason: Option<TopicLinkError>) {
        let prev = self.state.connection;
        self.state.connection = next;
        match &reason {
            Some(r) => info!(from = %prev, to = %next, reason = %r, "connection state"),
            None => info!(from = %prev, to = %next, "connection state"),
        }
        self.observer.on_state_change(next, reason.as_ref());
    }
}

fn validate_topic(topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        return Err(TopicLinkError::Validation("topic must not be empty".into()));
    }
    Ok(())
}
