use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle of the single connection owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Never opened.
    #[default]
    Disconnected,
    /// `open()` called, transport not yet established.
    Connecting,
    /// Intents may be sent.
    Open,
    /// Closed by the peer, by a transport failure, or locally.
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }

    /// `open()` is allowed from here.
    pub fn can_open(self) -> bool {
        matches!(self, ConnectionState::Disconnected | ConnectionState::Closed)
    }

    /// A transport exists (or is being established) that `close()` must tear down.
    pub fn is_active(self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-held session state. Never persisted.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) connection: ConnectionState,
    /// Set optimistically by `login`; the server never acknowledges it.
    pub(crate) identity: Option<String>,
    /// Topics the client believes it has joined on the current connection.
    pub(crate) subscribed: BTreeSet<String>,
}

impl SessionState {
    /// Identity and subscriptions live and die with one connection.
    pub(crate) fn forget_connection(&mut self) {
        self.identity = None;
        self.subscribed.clear();
    }
}
