//! chat-server
//!
//! Multi-client async WebSocket server for the chat service.

pub mod config;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod session_task;
