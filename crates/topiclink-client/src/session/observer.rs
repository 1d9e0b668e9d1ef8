//! Observer interface: the single sink for everything the engine reports
//! asynchronously (state transitions, inbound messages, protocol errors).

use tokio::sync::mpsc;

use topiclink_core::error::TopicLinkError;
use topiclink_core::protocol::InboundEnvelope;

use super::state::ConnectionState;

/// Receives engine notifications. Exactly one observer per session.
pub trait SessionObserver {
    /// Called once per transition. `reason` is set when a transport failure
    /// caused it.
    fn on_state_change(&mut self, state: ConnectionState, reason: Option<&TopicLinkError>);

    /// Called for each decoded inbound envelope, in receipt order.
    fn on_message(&mut self, envelope: InboundEnvelope);

    /// Called when an inbound frame could not be decoded. The connection stays up.
    fn on_protocol_error(&mut self, error: &TopicLinkError) {
        tracing::warn!(error = %error, "dropping malformed inbound frame");
    }
}

/// Owned form of every observer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        state: ConnectionState,
        reason: Option<TopicLinkError>,
    },
    Message(InboundEnvelope),
    ProtocolError(TopicLinkError),
}

/// Forwards callbacks over an unbounded channel so async code can consume them.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: SessionEvent) {
        // Receiver dropped: nobody is listening anymore.
        if self.tx.send(event).is_err() {
            tracing::trace!("session event receiver dropped");
        }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_state_change(&mut self, state: ConnectionState, reason: Option<&TopicLinkError>) {
        self.emit(SessionEvent::StateChanged {
            state,
            reason: reason.cloned(),
        });
    }

    fn on_message(&mut self, envelope: InboundEnvelope) {
        self.emit(SessionEvent::Message(envelope));
    }

    fn on_protocol_error(&mut self, error: &TopicLinkError) {
        self.emit(SessionEvent::ProtocolError(error.clone()));
    }
}

/// Records callbacks in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<SessionEvent>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<ConnectionState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<&InboundEnvelope> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn protocol_errors(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SessionEvent::ProtocolError(_)))
            .count()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_state_change(&mut self, state: ConnectionState, reason: Option<&TopicLinkError>) {
        self.events.push(SessionEvent::StateChanged {
            state,
            reason: reason.cloned(),
        });
    }

    fn on_message(&mut self, envelope: InboundEnvelope) {
        self.events.push(SessionEvent::Message(envelope));
    }

    fn on_protocol_error(&mut self, error: &TopicLinkError) {
        self.events.push(SessionEvent::ProtocolError(error.clone()));
    }
}
