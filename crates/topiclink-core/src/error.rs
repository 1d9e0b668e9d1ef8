//! Shared error type across topiclink crates.

use thiserror::Error;

/// Stable error kinds (used in logs and by front-ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or blank required field; never reaches the wire.
    Validation,
    /// Operation attempted while the connection is not open.
    NotConnected,
    /// Malformed inbound data.
    Protocol,
    /// Connection failed to open or closed unexpectedly.
    Transport,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and terminal output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotConnected => "NOT_CONNECTED",
            ErrorKind::Protocol => "PROTOCOL",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TopicLinkError>;

/// Unified error type used by core and client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicLinkError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not connected")]
    NotConnected,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TopicLinkError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopicLinkError::Validation(_) => ErrorKind::Validation,
            TopicLinkError::NotConnected => ErrorKind::NotConnected,
            TopicLinkError::Protocol(_) => ErrorKind::Protocol,
            TopicLinkError::Transport(_) => ErrorKind::Transport,
            TopicLinkError::Config(_) => ErrorKind::Config,
            TopicLinkError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            TopicLinkError::Internal(_) => ErrorKind::Internal,
        }
    }
}
