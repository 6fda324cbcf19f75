use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use chat_protocol::query_codec::format_username_query;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("CHAT_PROBE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let username = env::var("CHAT_PROBE_USERNAME").unwrap_or_else(|_| "probe".to_string());

    let url = format!("ws://{}/?{}", addr, format_username_query(&username));
    println!("Connecting to {}...", url);
    let (mut ws, _) = connect_async(url).await?;
    println!("Connected.");
    println!("Type 'ping' to get a 'pong'; anything else is only logged server-side.");
    println!("Type 'quit' or 'exit' to leave.\n");

    let stdin = io::stdin();

    loop {
        // Prompt
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            // EOF
            println!("\nEOF on stdin, exiting probe.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting probe.");
            break;
        }

        ws.send(Message::Text(trimmed.to_string())).await?;

        // Now read back any replies that arrive shortly after. Most
        // lines get none; `ping` gets exactly one.
        loop {
            match timeout(Duration::from_millis(100), ws.next()).await {
                Ok(Some(Ok(Message::Text(reply)))) => println!("<< {}", reply),
                Ok(Some(Ok(_))) => continue,
                Ok(Some(Err(e))) => {
                    eprintln!("Read error: {:?}", e);
                    return Ok(());
                }
                Ok(None) => {
                    println!("Server closed the connection.");
                    return Ok(());
                }
                Err(_) => {
                    // Timed out waiting for the next reply; assume
                    // we're done for this line.
                    break;
                }
            }
        }
    }

    ws.close(None).await.ok();
    Ok(())
}
