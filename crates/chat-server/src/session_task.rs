//! Central hub loop.
//!
//! This task owns the `SessionEngine` instance and processes
//! all `HubRequest`s coming from clients.
//!
//! Routing policy:
//! - every reply (`Pong`) is sent **only** to the originating client.
//!
//! The server never relays chat text between clients; non-ping
//! messages are logged here and go nowhere else.

use tracing::info;

use chat_core::{ClientId, InputMessage, SessionEngine};

use crate::types::{ClientRegistry, HubRequest, HubRx};

/// Run the central hub processing loop.
///
/// - `hub_rx`: receives requests from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_hub_loop(mut hub_rx: HubRx, clients: ClientRegistry) {
    let mut engine = SessionEngine::new();

    while let Some(req) = hub_rx.recv().await {
        let HubRequest { client_id, msg } = req;

        // Log before processing so Leave still sees the identity.
        log_session_event(&engine, client_id, &msg);

        let outputs = engine.process_message(client_id, msg);
        if outputs.is_empty() {
            continue;
        }

        // Snapshot of current clients to minimize lock hold time.
        let current_clients = {
            let guard = clients.read().await;
            guard.clone()
        };

        for out in outputs {
            if let Some(tx) = current_clients.get(&client_id) {
                let _ = tx.send(out);
            }
        }
    }

    info!("hub loop shutting down (hub_rx closed)");
}

/// Every session event is logged with a `username(ip:port)` prefix,
/// matching what operators of the service grep for.
fn log_session_event(engine: &SessionEngine, client_id: ClientId, msg: &InputMessage) {
    match msg {
        InputMessage::Join(identity) => info!("{} connected", identity),
        InputMessage::Ping => {
            if let Some(session) = engine.session(client_id) {
                info!("{} ping", session.identity);
            }
        }
        InputMessage::Chat(text) => {
            if let Some(session) = engine.session(client_id) {
                info!("{}: {}", session.identity, text);
            }
        }
        InputMessage::Leave => {
            if let Some(session) = engine.session(client_id) {
                info!(
                    "{} disconnected ({} pings, {} chat lines)",
                    session.identity, session.pings, session.chat_lines
                );
            }
        }
    }
}
