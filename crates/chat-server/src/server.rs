//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task that upgrades to WebSocket and handles I/O,
//!   - a single central hub task that owns `SessionEngine`.
//!
//! The actual per-client logic and hub loop live in the `client`
//! and `session_task` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use chat_core::ClientId;

use crate::client;
use crate::config::Config;
use crate::session_task;
use crate::types::{ClientRegistry, HubRx, HubTx, OutboundRx, OutboundTx};

/// Global-ish counter for assigning unique `ClientId`s.
///
/// In a more elaborate setup you might encapsulate this in a struct,
/// but this is sufficient and threadsafe for our server.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Run the WebSocket server with the given configuration.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on ws://{}", addr);

    serve(listener, config).await
}

/// Accept loop over an already-bound listener.
///
/// Split out of [`run`] so tests can bind port 0 and learn the actual
/// address before the server starts accepting.
pub async fn serve(listener: TcpListener, config: Config) -> Result<()> {
    // Shared registry of clients -> outbound channels.
    let clients: ClientRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    // Channel from clients -> hub task.
    let (hub_tx, hub_rx): (HubTx, HubRx) = mpsc::unbounded_channel();

    // Spawn the central hub task.
    {
        let clients_clone = clients.clone();
        tokio::spawn(async move {
            session_task::run_hub_loop(hub_rx, clients_clone).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };

        if current_clients >= config.max_clients {
            warn!(
                "rejecting connection from {}: max_clients ({}) reached",
                peer_addr, config.max_clients
            );
            // Complete the handshake with an HTTP error so the client
            // sees a clean refusal instead of a dropped socket.
            tokio::spawn(async move {
                client::reject_client(stream, peer_addr).await;
            });
            continue;
        }

        let client_id = next_client_id();
        info!("accepted connection {} from {}", client_id, peer_addr);

        // Create outbound channel for this client.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Register client.
        {
            let mut guard = clients.write().await;
            guard.insert(client_id, out_tx.clone());
        }

        // Clone handles to move into the client task.
        let clients_clone = clients.clone();
        let hub_tx_clone = hub_tx.clone();

        tokio::spawn(async move {
            if let Err(e) =
                client::run_client(client_id, stream, peer_addr, hub_tx_clone, out_rx, clients_clone)
                    .await
            {
                warn!("client {} error: {:#}", client_id, e);
            }
        });
    }
}
