//! Shared types for the chat WebSocket server.
//!
//! This module defines:
//! - channel aliases between client tasks and the session hub
//! - `HubRequest`: messages flowing from clients to the hub

use std::collections::HashMap;
use std::sync::Arc;

use chat_core::{ClientId, InputMessage, OutputMessage};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Outbound messages from the hub to a given client.
pub type OutboundTx = mpsc::UnboundedSender<OutputMessage>;
pub type OutboundRx = mpsc::UnboundedReceiver<OutputMessage>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ClientId`
/// - Value: `OutboundTx` to send `OutputMessage`s to that client.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// Message flowing from a client task into the central hub task.
#[derive(Debug)]
pub struct HubRequest {
    pub client_id: ClientId,
    pub msg: InputMessage,
}

/// Channel from clients to the hub task.
pub type HubTx = mpsc::UnboundedSender<HubRequest>;
pub type HubRx = mpsc::UnboundedReceiver<HubRequest>;
