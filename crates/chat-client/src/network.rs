// crates/chat-client/src/network.rs

use anyhow::Result;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info};

use chat_protocol::query_codec::format_username_query;

type ChatSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One live chat connection.
pub struct ChatConnection {
    ws: ChatSocket,
    tx_to_app: UnboundedSender<String>,
}

impl ChatConnection {
    /// Dial the server, announcing `username` in the query string.
    pub async fn connect(
        server_addr: &str,
        username: &str,
        tx_to_app: UnboundedSender<String>,
    ) -> Result<Self> {
        let url = format!("ws://{}/?{}", server_addr, format_username_query(username));
        info!("connecting to {}...", url);
        let (ws, _) = connect_async(url).await?;
        info!("connected");
        Ok(Self { ws, tx_to_app })
    }

    /// Pump messages until the app drops its sender or the server
    /// closes the connection.
    pub async fn run(mut self, mut rx_from_app: UnboundedReceiver<String>) {
        loop {
            tokio::select! {
                outgoing = rx_from_app.recv() => {
                    match outgoing {
                        Some(line) => {
                            if let Err(e) = self.ws.send(Message::Text(line)).await {
                                error!("send failed: {}", e);
                                break;
                            }
                        }
                        // App side hung up; close politely.
                        None => {
                            let _ = self.ws.close(None).await;
                            break;
                        }
                    }
                }

                incoming = self.ws.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if self.tx_to_app.send(text).is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("server closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!("read error: {}", e);
                            break;
                        }
                    }
                }
            }
        }

        debug!("connection task finished");
    }
}
