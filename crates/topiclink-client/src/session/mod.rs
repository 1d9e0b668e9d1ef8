//! Session engine, its state, and the observer interface.
//!
//! The engine owns one connection's lifecycle, the optimistic identity and
//! subscription bookkeeping, and an outbox of encoded frames. It is driven by
//! `crate::client::Client` or by any caller that wires its own transport.

mod engine;
mod observer;
mod state;

pub use engine::{Session, PEER_CLOSED};
pub use observer::{ChannelObserver, RecordingObserver, SessionEvent, SessionObserver};
pub use state::ConnectionState;
