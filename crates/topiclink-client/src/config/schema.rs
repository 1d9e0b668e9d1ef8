use serde::Deserialize;
use topiclink_core::error::{Result, TopicLinkError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub endpoint: EndpointSection,

    #[serde(default)]
    pub autojoin: AutoJoinSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            endpoint: EndpointSection::default(),
            autojoin: AutoJoinSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TopicLinkError::UnsupportedVersion);
        }

        self.endpoint.validate()?;
        self.autojoin.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSection {
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl EndpointSection {
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.url)
    }
}

/// Intents replayed right after the connection opens.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoJoinSection {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub topics: Vec<String>,
}

impl AutoJoinSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(TopicLinkError::Config("autojoin.name must not be blank".into()));
            }
        }
        if self.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(TopicLinkError::Config(
                "autojoin.topics must not contain blank entries".into(),
            ));
        }
        Ok(())
    }
}

pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| {
            TopicLinkError::Config(format!("endpoint.url must be ws:// or wss://: {url}"))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(TopicLinkError::Config(format!("endpoint.url has no host: {url}")));
    }
    Ok(())
}

fn default_url() -> String {
    "ws://127.0.0.1:8080/ws".into()
}
