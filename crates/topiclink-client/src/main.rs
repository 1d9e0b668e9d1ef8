//! topiclink terminal client.
//!
//! - Reads intents from stdin (`/login`, `/sub`, `/pub`, plain text, ...)
//! - Renders inbound messages as `[topic #sequence] message`
//! - Single-threaded: one select loop over stdin and the connection

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use topiclink_client::command::{Command, HELP};
use topiclink_client::transport::{LinkEvent, WsConnector};
use topiclink_client::{config, Client, ConnectionState, SessionObserver};
use topiclink_core::error::{Result, TopicLinkError};
use topiclink_core::protocol::InboundEnvelope;

#[derive(Debug, Parser)]
#[command(name = "topiclink", about = "Topic pub/sub client")]
struct Args {
    /// Config file (missing file => defaults).
    #[arg(long, default_value = "topiclink.yaml")]
    config: PathBuf,

    /// Endpoint URL, overrides `endpoint.url`.
    #[arg(long)]
    url: Option<String>,

    /// Display name to log in with after connecting.
    #[arg(long)]
    name: Option<String>,
}

/// Prints everything the session reports.
struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn on_state_change(&mut self, state: ConnectionState, reason: Option<&TopicLinkError>) {
        match reason {
            Some(r) => println!("* {state} ({r})"),
            None => println!("* {state}"),
        }
    }

    fn on_message(&mut self, envelope: InboundEnvelope) {
        println!("[{} #{}] {}", envelope.topic, envelope.sequence, envelope.render());
    }

    fn on_protocol_error(&mut self, error: &TopicLinkError) {
        tracing::warn!(error = %error, "malformed inbound frame dropped");
        println!("! {error}");
    }
}

enum Input {
    Line(Option<String>),
    Link(LinkEvent),
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = config::load_or_default(&args.config)?;
    if let Some(url) = args.url {
        config::schema::validate_url(&url)?;
        cfg.endpoint.url = url;
    }
    if let Some(name) = args.name {
        cfg.autojoin.name = Some(name);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| TopicLinkError::Internal(format!("runtime build failed: {e}")))?;

    rt.block_on(run(cfg))
}

async fn run(cfg: config::ClientConfig) -> Result<()> {
    tracing::info!(url = %cfg.endpoint.url, "topiclink starting");

    let mut client = Client::new(WsConnector::new(), cfg.endpoint.url.clone(), TerminalObserver);
    let mut current_topic: Option<String> = cfg.autojoin.topics.first().cloned();

    client.open().await;
    if client.state() == ConnectionState::Open {
        autojoin(&mut client, &cfg.autojoin).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(
                line.map_err(|e| TopicLinkError::Internal(format!("stdin read failed: {e}")))?,
            ),
            event = client.next_link_event() => Input::Link(event),
        };

        let line = match input {
            Input::Link(event) => {
                client.handle_link_event(event);
                continue;
            }
            Input::Line(None) => break,
            Input::Line(Some(line)) => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match Command::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("! {e}");
                continue;
            }
        };

        let res = match cmd {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Open => {
                client.open().await;
                Ok(())
            }
            Command::Close => {
                client.close().await;
                Ok(())
            }
            Command::Login(name) => client.login(&name).await,
            Command::SetTopic(topic) => {
                println!("* topic {topic}");
                current_topic = Some(topic);
                Ok(())
            }
            Command::Subscribe(topic) => match topic.or_else(|| current_topic.clone()) {
                Some(t) => client.subscribe(&t).await,
                None => Err(no_topic()),
            },
            Command::Unsubscribe(topic) => match topic.or_else(|| current_topic.clone()) {
                Some(t) => client.unsubscribe(&t).await,
                None => Err(no_topic()),
            },
            Command::Publish { topic, text } => match topic.or_else(|| current_topic.clone()) {
                Some(t) => client.publish(&t, &text).await,
                None => Err(no_topic()),
            },
        };

        if let Err(e) = res {
            println!("! {e}");
        }
    }

    client.close().await;
    tracing::info!("topiclink stopped");
    Ok(())
}

async fn autojoin(
    client: &mut Client<WsConnector, TerminalObserver>,
    auto: &config::AutoJoinSection,
) {
    if let Some(name) = &auto.name {
        if let Err(e) = client.login(name).await {
            println!("! {e}");
        }
    }
    for topic in &auto.topics {
        if let Err(e) = client.subscribe(topic).await {
            println!("! {e}");
        }
    }
}

fn no_topic() -> TopicLinkError {
    TopicLinkError::Validation("no topic selected (use /topic <topic>)".into())
}
