//! WebSocket server binary for the chat service.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_server::config::Config;
use chat_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        "starting chat-server on {}:{} (max_clients = {})",
        config.bind_addr, config.port, config.max_clients
    );

    server::run(config).await
}
