//! End-to-end tests over a real socket: a tokio-tungstenite client
//! against the served WebSocket endpoint.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use chat_server::config::Config;
use chat_server::server;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bind port 0, spawn the accept loop, return the actual address.
async fn start_server(max_clients: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let config = Config {
        bind_addr: addr.ip().to_string(),
        port: addr.port(),
        max_clients,
    };
    tokio::spawn(async move {
        let _ = server::serve(listener, config).await;
    });
    addr.to_string()
}

async fn connect(addr: &str, query: &str) -> WsClient {
    let url = if query.is_empty() {
        format!("ws://{}/", addr)
    } else {
        format!("ws://{}/?{}", addr, query)
    };
    let (ws, _) = connect_async(url).await.expect("websocket handshake");
    ws
}

async fn next_text(ws: &mut WsClient) -> String {
    let frame = timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for a reply")
        .expect("stream ended")
        .expect("read error");
    frame.into_text().expect("text frame")
}

/// Assert that nothing arrives for a little while.
async fn assert_quiet(ws: &mut WsClient) {
    let frame = timeout(Duration::from_millis(300), ws.next()).await;
    assert!(frame.is_err(), "expected no reply, got {:?}", frame);
}

#[tokio::test]
async fn ping_yields_exactly_one_pong() {
    let addr = start_server(8).await;
    let mut ws = connect(&addr, "username=alice").await;

    ws.send(Message::Text("ping".to_string())).await.expect("send");
    assert_eq!(next_text(&mut ws).await, "pong");

    // Exactly one: no second frame follows.
    assert_quiet(&mut ws).await;
}

#[tokio::test]
async fn other_text_yields_no_reply() {
    let addr = start_server(8).await;
    let mut ws = connect(&addr, "username=alice").await;

    for text in ["hello", " ping", "PING", "pong"] {
        ws.send(Message::Text(text.to_string())).await.expect("send");
    }

    // The hub processes in order, so if any of the above had produced
    // a reply it would arrive before this pong.
    ws.send(Message::Text("ping".to_string())).await.expect("send");
    assert_eq!(next_text(&mut ws).await, "pong");
    assert_quiet(&mut ws).await;
}

#[tokio::test]
async fn missing_username_still_serves_pings() {
    let addr = start_server(8).await;

    // No query string at all: the server falls back to "Anonymous"
    // internally and the session works normally.
    let mut ws = connect(&addr, "").await;

    ws.send(Message::Text("ping".to_string())).await.expect("send");
    assert_eq!(next_text(&mut ws).await, "pong");
}

#[tokio::test]
async fn pong_goes_only_to_the_pinger() {
    let addr = start_server(8).await;
    let mut alice = connect(&addr, "username=alice").await;
    let mut bob = connect(&addr, "username=bob").await;

    alice.send(Message::Text("ping".to_string())).await.expect("send");
    assert_eq!(next_text(&mut alice).await, "pong");

    assert_quiet(&mut bob).await;
}

#[tokio::test]
async fn capacity_overflow_is_refused_with_http_503() {
    let addr = start_server(1).await;

    // First client occupies the only slot. Its handshake completing
    // guarantees the server registered it.
    let _first = connect(&addr, "username=alice").await;

    let url = format!("ws://{}/?username=bob", addr);
    let err = connect_async(url)
        .await
        .err()
        .expect("second connection should be refused");
    match err {
        Error::Http(resp) => assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn slot_is_released_after_disconnect() {
    let addr = start_server(1).await;

    let mut first = connect(&addr, "username=alice").await;
    first.close(None).await.expect("close");
    // Drain until the server's close reply ends the stream.
    while let Ok(Some(_)) = timeout(Duration::from_secs(2), first.next()).await {}

    // The slot frees once the server's client task deregisters; poll
    // briefly instead of assuming it is instant.
    let url = format!("ws://{}/?username=bob", addr);
    let mut attempt = 0;
    loop {
        match connect_async(url.as_str()).await {
            Ok(_) => break,
            Err(_) if attempt < 20 => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => panic!("slot never released: {}", e),
        }
    }
}
