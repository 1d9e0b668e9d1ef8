//! Terminal intents.
//!
//! One input line maps to one `Command`. Lines starting with `/` are
//! commands; anything else is published to the current topic.

use topiclink_core::error::{Result, TopicLinkError};

pub const HELP: &str = "\
/open                 connect to the endpoint
/close                close the connection
/login <name>         set display name
/topic <topic>        set current topic
/sub [<topic>]        subscribe (default: current topic)
/unsub [<topic>]      unsubscribe (default: current topic)
/pub <topic> <text>   publish to a topic
/quit                 exit
<text>                publish to the current topic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Login(String),
    SetTopic(String),
    /// `None` means the current topic.
    Subscribe(Option<String>),
    Unsubscribe(Option<String>),
    Publish { topic: Option<String>, text: String },
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Publish {
                topic: None,
                text: line.to_string(),
            });
        };

        let (cmd, arg) = match rest.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (rest, ""),
        };

        match cmd {
            "open" => Ok(Command::Open),
            "close" => Ok(Command::Close),
            "login" => Ok(Command::Login(arg.to_string())),
            "topic" => {
                if arg.is_empty() {
                    return Err(TopicLinkError::Validation("usage: /topic <topic>".into()));
                }
                Ok(Command::SetTopic(arg.to_string()))
            }
            "sub" => Ok(Command::Subscribe(optional(arg))),
            "unsub" => Ok(Command::Unsubscribe(optional(arg))),
            "pub" => {
                let (topic, text) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
                if topic.is_empty() {
                    return Err(TopicLinkError::Validation(
                        "usage: /pub <topic> <text>".into(),
                    ));
                }
                Ok(Command::Publish {
                    topic: Some(topic.to_string()),
                    text: text.trim_start().to_string(),
                })
            }
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(TopicLinkError::Validation(format!("unknown command: /{other}"))),
        }
    }
}

fn optional(arg: &str) -> Option<String> {
    (!arg.is_empty()).then(|| arg.to_string())
}
