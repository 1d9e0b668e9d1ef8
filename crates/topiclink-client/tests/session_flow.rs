//! Driver + engine flows over the in-memory transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use topiclink_client::session::{ChannelObserver, ConnectionState, SessionEvent, PEER_CLOSED};
use topiclink_client::transport::{MemoryConnector, MemoryPeer};
use topiclink_client::Client;
use topiclink_core::ErrorKind;

const URL: &str = "ws://memory/ws";

type TestClient = Client<MemoryConnector, ChannelObserver>;

struct Harness {
    client: TestClient,
    events: UnboundedReceiver<SessionEvent>,
    accept: UnboundedReceiver<MemoryPeer>,
}

fn harness() -> Harness {
    let (connector, accept) = MemoryConnector::new();
    let (observer, events) = ChannelObserver::new();
    Harness {
        client: Client::new(connector, URL, observer),
        events,
        accept,
    }
}

async fn connected() -> (Harness, MemoryPeer) {
    let mut h = harness();
    h.client.open().await;
    let peer = h.accept.recv().await.expect("peer");
    assert_eq!(h.client.state(), ConnectionState::Open);
    (h, peer)
}

fn drain(events: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = events.try_recv() {
        out.push(ev);
    }
    out
}

fn states(events: &[SessionEvent]) -> Vec<ConnectionState> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::StateChanged { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn login_subscribe_publish_then_receive() {
    let (mut h, mut peer) = connected().await;
    assert_eq!(peer.url(), URL);

    h.client.login("Alice").await.unwrap();
    h.client.subscribe("room1").await.unwrap();
    h.client.publish("room1", "hello").await.unwrap();

    assert_eq!(
        peer.recv().await.unwrap(),
        r#"{"topic":"","message":{"login":{"name":"Alice"}}}"#
    );
    assert_eq!(
        peer.recv().await.unwrap(),
        r#"{"topic":"room1","message":{"join_room":{}}}"#
    );
    assert_eq!(
        peer.recv().await.unwrap(),
        r#"{"topic":"room1","message":{"send_message":"hello"}}"#
    );
    assert!(peer.try_recv().is_none());

    assert_eq!(h.client.session().identity(), Some("Alice"));
    assert!(h.client.session().is_subscribed("room1"));

    assert!(peer.deliver(r#"{"topic":"room1","sequence":1,"message":"hello"}"#));
    assert_eq!(h.client.pump().await, ConnectionState::Open);

    let events = drain(&mut h.events);
    assert_eq!(
        states(&events),
        vec![ConnectionState::Connecting, ConnectionState::Open]
    );
    match events.last() {
        Some(SessionEvent::Message(env)) => {
            assert_eq!(env.topic, "room1");
            assert_eq!(env.sequence, 1);
            assert_eq!(env.message, Some(json!("hello")));
        }
        other => panic!("expected message, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_inbound_does_not_stop_delivery() {
    let (mut h, peer) = connected().await;
    drain(&mut h.events);

    peer.deliver(r#"{"topic":"room1","sequence":5,"message":"a"}"#);
    peer.deliver("not json at all");
    peer.deliver(r#"{"topic":"room1","sequence":4,"message":"b"}"#);

    for _ in 0..3 {
        assert_eq!(h.client.pump().await, ConnectionState::Open);
    }

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], SessionEvent::Message(m) if m.sequence == 5));
    assert!(
        matches!(&events[1], SessionEvent::ProtocolError(e) if e.kind() == ErrorKind::Protocol)
    );
    // delivered as received, no reordering
    assert!(matches!(&events[2], SessionEvent::Message(m) if m.sequence == 4));
}

#[tokio::test]
async fn connect_refused_reports_closed_with_reason() {
    let mut h = harness();
    // no listener: connects are refused
    h.accept.close();

    h.client.open().await;
    assert_eq!(h.client.state(), ConnectionState::Closed);

    let events = drain(&mut h.events);
    assert_eq!(
        states(&events),
        vec![ConnectionState::Connecting, ConnectionState::Closed]
    );
    match events.last() {
        Some(SessionEvent::StateChanged {
            reason: Some(reason),
            ..
        }) => assert_eq!(reason.kind(), ErrorKind::Transport),
        other => panic!("expected transport reason, got {other:?}"),
    }
}

#[tokio::test]
async fn intents_before_open_send_nothing() {
    let mut h = harness();

    for err in [
        h.client.login("Alice").await.unwrap_err(),
        h.client.subscribe("room1").await.unwrap_err(),
        h.client.publish("room1", "hi").await.unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::NotConnected);
    }
    assert!(h.accept.try_recv().is_err());
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn blank_name_is_rejected_without_sending() {
    let (mut h, mut peer) = connected().await;

    let err = h.client.login("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(peer.try_recv().is_none());
}

#[tokio::test]
async fn peer_close_reports_reason_and_close_is_then_noop() {
    let (mut h, peer) = connected().await;
    h.client.subscribe("room1").await.unwrap();
    drain(&mut h.events);

    peer.close(Some("server shutting down".into()));
    assert_eq!(h.client.pump().await, ConnectionState::Closed);
    assert!(h.client.session().subscribed_topics().is_empty());

    h.client.close().await;

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::StateChanged {
            state: ConnectionState::Closed,
            reason: Some(reason),
        } => assert!(reason.to_string().contains("server shutting down")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn dropped_peer_reports_closed_by_peer() {
    let (mut h, peer) = connected().await;
    drain(&mut h.events);

    drop(peer);
    assert_eq!(h.client.pump().await, ConnectionState::Closed);

    match drain(&mut h.events).as_slice() {
        [SessionEvent::StateChanged {
            state: ConnectionState::Closed,
            reason: Some(reason),
        }] => {
            assert_eq!(reason.kind(), ErrorKind::Transport);
            assert!(reason.to_string().contains(PEER_CLOSED));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn close_twice_is_idempotent() {
    let (mut h, mut peer) = connected().await;
    drain(&mut h.events);

    h.client.close().await;
    h.client.close().await;

    assert_eq!(states(&drain(&mut h.events)), vec![ConnectionState::Closed]);
    // client side of the link is gone
    assert!(peer.recv().await.is_none());
}

#[tokio::test]
async fn reopen_after_close_uses_a_fresh_link() {
    let (mut h, _first) = connected().await;
    h.client.login("Alice").await.unwrap();
    h.client.close().await;
    assert!(h.client.session().identity().is_none());

    h.client.open().await;
    let mut second = h.accept.recv().await.expect("second peer");
    assert_eq!(h.client.state(), ConnectionState::Open);

    h.client.publish("room1", "again").await.unwrap();
    assert_eq!(
        second.recv().await.unwrap(),
        r#"{"topic":"room1","message":{"send_message":"again"}}"#
    );

    assert_eq!(
        states(&drain(&mut h.events)),
        vec![
            ConnectionState::Connecting,
            ConnectionState::Open,
            ConnectionState::Closed,
            ConnectionState::Connecting,
            ConnectionState::Open,
        ]
    );
}

#[tokio::test]
async fn send_failure_closes_the_session() {
    let (mut h, peer) = connected().await;
    drain(&mut h.events);
    drop(peer);

    // fire-and-forget: the call itself succeeds
    h.client.publish("room1", "lost").await.unwrap();
    assert_eq!(h.client.state(), ConnectionState::Closed);

    match drain(&mut h.events).as_slice() {
        [SessionEvent::StateChanged {
            state: ConnectionState::Closed,
            reason: Some(reason),
        }] => assert_eq!(reason.kind(), ErrorKind::Transport),
        other => panic!("unexpected {other:?}"),
    }
}
