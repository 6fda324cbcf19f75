//! Per-connection I/O: WebSocket upgrade, reader loop, writer task.

use std::net::SocketAddr;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use chat_core::{ClientId, Identity, InputMessage};
use chat_protocol::{query_codec, text_codec};

use crate::types::{ClientRegistry, HubRequest, HubTx, OutboundRx};

/// Run the I/O loop for a single connection.
///
/// The caller has already registered the client's outbound channel;
/// this function owns deregistration on every exit path.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    peer_addr: SocketAddr,
    hub_tx: HubTx,
    mut out_rx: OutboundRx,
    clients: ClientRegistry,
) -> Result<()> {
    // Capture the request query string during the handshake; the
    // upgrade URL (`ws://host/?username=...`) is the only place the
    // client states who it is.
    let mut query: Option<String> = None;
    let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        query = req.uri().query().map(str::to_string);
        Ok(resp)
    };

    let ws = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            // Handshake failed; the session never joined the hub.
            debug!("client {} handshake failed: {}", client_id, e);
            unregister(&clients, client_id).await;
            return Ok(());
        }
    };

    let username = query_codec::username_from_query(query.as_deref());
    let identity = Identity::new(username, peer_addr);

    let join = HubRequest {
        client_id,
        msg: InputMessage::Join(identity),
    };
    if hub_tx.send(join).is_err() {
        warn!("hub channel closed");
        unregister(&clients, client_id).await;
        return Ok(());
    }

    let (mut ws_sink, mut ws_stream) = ws.split();

    // Writer task: consume OutputMessages and write replies.
    let _writer_handle = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let payload = text_codec::format_output(&msg);
            if let Err(e) = ws_sink.send(Message::Text(payload)).await {
                debug!("client {} write error: {}", client_id, e);
                break;
            }
        }
    });

    // Reader loop: forward text payloads to the hub.
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let req = HubRequest {
                    client_id,
                    msg: text_codec::parse_text_frame(&text),
                };
                if hub_tx.send(req).is_err() {
                    warn!("hub channel closed");
                    break;
                }
            }
            Ok(Message::Binary(payload)) => {
                debug!("client {} sent {} binary bytes, ignoring", client_id, payload.len());
            }
            Ok(Message::Close(_)) => break,
            // Protocol-level Ping/Pong frames are answered by
            // tungstenite itself.
            Ok(_) => {}
            Err(e) => {
                debug!("client {} read error: {}", client_id, e);
                break;
            }
        }
    }

    // Deregistering drops the last outbound sender, which stops the
    // writer task; the hub logs the disconnect on Leave.
    unregister(&clients, client_id).await;
    let _ = hub_tx.send(HubRequest {
        client_id,
        msg: InputMessage::Leave,
    });

    Ok(())
}

/// Complete the handshake with an HTTP 503 instead of upgrading.
///
/// Used when the server is at `max_clients`; the client sees a clean
/// refusal rather than a dropped socket.
pub async fn reject_client(stream: TcpStream, peer_addr: SocketAddr) {
    let callback = |_req: &Request, _resp: Response| -> Result<Response, ErrorResponse> {
        let mut resp = ErrorResponse::new(Some("server at capacity".to_string()));
        *resp.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
        Err(resp)
    };

    if let Err(e) = accept_hdr_async(stream, callback).await {
        debug!("rejected {}: {}", peer_addr, e);
    }
}

async fn unregister(clients: &ClientRegistry, client_id: ClientId) {
    let mut guard = clients.write().await;
    guard.remove(&client_id);
}
