// crates/chat-client/src/health.rs

//! Service availability probe.
//!
//! A dedicated WebSocket connection sends the text `ping` every 15
//! seconds; if no `pong` comes back within 5 seconds the service is
//! marked down, the probe socket is dropped, and the next tick dials
//! again. The chat session is only offered while the probe reports
//! the service up.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use chat_protocol::{PING, PONG};

pub const PING_INTERVAL: Duration = Duration::from_secs(15);
pub const PONG_TIMEOUT: Duration = Duration::from_secs(5);

type ProbeSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawn the availability probe. The receiver always holds the
/// latest verdict; the first probe fires immediately.
pub fn spawn(server_addr: String) -> (watch::Receiver<bool>, JoinHandle<()>) {
    let (verdict_tx, verdict_rx) = watch::channel(false);
    let handle = tokio::spawn(probe_loop(server_addr, verdict_tx));
    (verdict_rx, handle)
}

async fn probe_loop(server_addr: String, verdict_tx: watch::Sender<bool>) {
    let mut probe: Option<ProbeSocket> = None;
    let mut tick = interval(PING_INTERVAL);

    loop {
        tick.tick().await;

        if probe.is_none() {
            // The probe is not a chat session, so it connects without
            // a username.
            match connect_async(format!("ws://{}/", server_addr)).await {
                Ok((ws, _)) => probe = Some(ws),
                Err(e) => {
                    debug!("probe dial failed: {}", e);
                    if verdict_tx.send(false).is_err() {
                        return;
                    }
                    continue;
                }
            }
        }

        let alive = match probe.as_mut() {
            Some(ws) => check_pong(ws).await,
            None => false,
        };

        if !alive {
            probe = None;
        }
        if verdict_tx.send(alive).is_err() {
            // Nobody is watching anymore.
            return;
        }
    }
}

/// Send one ping and wait for the matching pong.
async fn check_pong(ws: &mut ProbeSocket) -> bool {
    if ws.send(Message::Text(PING.to_string())).await.is_err() {
        return false;
    }

    let wait = async {
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Text(text)) if text == PONG => return true,
                Ok(Message::Close(_)) | Err(_) => return false,
                Ok(_) => {}
            }
        }
        false
    };

    timeout(PONG_TIMEOUT, wait).await.unwrap_or(false)
}
