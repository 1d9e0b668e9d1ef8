//! Top-level facade crate for topiclink.
//!
//! Re-exports the wire types and the client runtime so users can depend on a single crate.

pub mod core {
    pub use topiclink_core::*;
}

pub mod client {
    pub use topiclink_client::*;
}
