use std::net::SocketAddr;

use chat_core::{ClientId, Identity, InputMessage, OutputMessage, SessionEngine};
use chat_protocol::text_codec::parse_text_frame;

fn identity(username: &str) -> Identity {
    let peer: SocketAddr = "127.0.0.1:54321".parse().expect("valid socket addr");
    Identity::new(username, peer)
}

fn joined_engine(client_id: ClientId, username: &str) -> SessionEngine {
    let mut engine = SessionEngine::new();
    let outputs = engine.process_message(client_id, InputMessage::Join(identity(username)));
    assert!(outputs.is_empty(), "Join should not produce replies");
    engine
}

#[test]
fn ping_yields_exactly_one_pong() {
    let client = ClientId(1);
    let mut engine = joined_engine(client, "alice");

    let outputs = engine.process_message(client, InputMessage::Ping);
    assert_eq!(outputs, vec![OutputMessage::Pong]);
}

#[test]
fn non_ping_text_yields_no_reply() {
    let client = ClientId(1);
    let mut engine = joined_engine(client, "alice");

    // Near-misses must not be treated as pings: the match is exact,
    // case-sensitive and untrimmed.
    for text in ["hello", " ping", "ping ", "PING", "ping\n", "pong", ""] {
        let outputs = engine.process_message(client, parse_text_frame(text));
        assert!(
            outputs.is_empty(),
            "{:?} should not produce a reply, got {:?}",
            text,
            outputs
        );
    }
}

#[test]
fn parsed_ping_flows_through_to_a_pong() {
    // Same path the server takes: raw text -> protocol -> engine.
    let client = ClientId(7);
    let mut engine = joined_engine(client, "bob");

    let outputs = engine.process_message(client, parse_text_frame("ping"));
    assert_eq!(outputs, vec![OutputMessage::Pong]);
}

#[test]
fn interleaved_pings_each_get_one_pong() {
    let client = ClientId(1);
    let mut engine = joined_engine(client, "alice");

    let mut pongs = 0;
    for text in ["ping", "how are you", "ping", "bye", "ping"] {
        pongs += engine.process_message(client, parse_text_frame(text)).len();
    }
    assert_eq!(pongs, 3);

    let session = engine.session(client).expect("session still live");
    assert_eq!(session.pings, 3);
    assert_eq!(session.chat_lines, 2);
}

#[test]
fn leave_removes_the_session() {
    let client = ClientId(1);
    let mut engine = joined_engine(client, "alice");
    assert_eq!(engine.session_count(), 1);

    let outputs = engine.process_message(client, InputMessage::Leave);
    assert!(outputs.is_empty());
    assert_eq!(engine.session_count(), 0);
    assert!(engine.session(client).is_none());
}

#[test]
fn unknown_client_is_ignored() {
    let mut engine = SessionEngine::new();
    let ghost = ClientId(99);

    // No session was ever joined for this id; nothing should reply
    // and nothing should panic.
    assert!(engine.process_message(ghost, InputMessage::Ping).is_empty());
    assert!(engine
        .process_message(ghost, InputMessage::Chat("hello".to_string()))
        .is_empty());
    assert!(engine.process_message(ghost, InputMessage::Leave).is_empty());
    assert_eq!(engine.session_count(), 0);
}

#[test]
fn sessions_are_independent() {
    let alice = ClientId(1);
    let bob = ClientId(2);

    let mut engine = SessionEngine::new();
    engine.process_message(alice, InputMessage::Join(identity("alice")));
    engine.process_message(bob, InputMessage::Join(identity("bob")));
    assert_eq!(engine.session_count(), 2);

    engine.process_message(alice, InputMessage::Ping);
    engine.process_message(bob, InputMessage::Chat("hi".to_string()));

    let alice_session = engine.session(alice).expect("alice live");
    let bob_session = engine.session(bob).expect("bob live");
    assert_eq!(alice_session.pings, 1);
    assert_eq!(alice_session.chat_lines, 0);
    assert_eq!(bob_session.pings, 0);
    assert_eq!(bob_session.chat_lines, 1);
}

#[test]
fn identity_renders_as_username_and_peer() {
    let id = identity("alice");
    assert_eq!(id.to_string(), "alice(127.0.0.1:54321)");
}
