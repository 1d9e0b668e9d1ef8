//! Client config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use topiclink_core::error::{Result, TopicLinkError};

pub use schema::{AutoJoinSection, ClientConfig, EndpointSection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        TopicLinkError::Config(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

/// Like `load_from_file`, but a missing file yields the built-in defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(ClientConfig::default())
        }
        Err(e) => Err(TopicLinkError::Config(format!(
            "read config {} failed: {e}",
            path.display()
        ))),
    }
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| TopicLinkError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
