//! WebSocket frame codec for the client transport.
//!
//! - Text / Binary frames => `LinkEvent::Data` (payload handed over as `Bytes`)
//! - Close frames => `LinkEvent::Closed` (abnormal codes keep their code and reason)
//! - Ping / Pong / raw frames => nothing (tungstenite answers pings itself)

use bytes::Bytes;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

use topiclink_core::error::TopicLinkError;

use super::LinkEvent;

pub fn decode(msg: Message) -> Option<LinkEvent> {
    match msg {
        Message::Text(s) => Some(LinkEvent::Data(Bytes::from(s))),
        Message::Binary(b) => Some(LinkEvent::Data(b)),
        Message::Close(frame) => {
            let reason = frame.and_then(|f| {
                if f.code == CloseCode::Normal {
                    None
                } else {
                    Some(format!("closed by peer ({}): {}", u16::from(f.code), f.reason))
                }
            });
            Some(LinkEvent::Closed(reason))
        }
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
    }
}

pub fn encode(text: String) -> Message {
    Message::Text(text.into())
}

pub fn transport_err(e: impl std::fmt::Display) -> TopicLinkError {
    TopicLinkError::Transport(e.to_string())
}
