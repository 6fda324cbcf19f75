// crates/chat-client/src/main.rs

mod app;
mod components;
mod health;
mod network;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::app::{App, InputMode};
use crate::network::ChatConnection;

#[derive(Parser)]
#[clap(name = "chat-client")]
#[clap(about = "Terminal chat client for the chat service")]
struct Cli {
    /// Server address
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Display name sent in the connection query string
    #[clap(short, long, default_value = "Anonymous")]
    username: String,

    /// Enable debug logging to chat-client.log
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging. Stdout belongs to the TUI, so logs go to a file.
    if cli.debug {
        let log_file = std::fs::File::create("chat-client.log")?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(log_file)
            .with_ansi(false)
            .init();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let app = App::new(&cli.username, &cli.server);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    // Background availability probe; its verdict gates connecting.
    let (availability, probe_handle) = health::spawn(app.server_addr.clone());

    let mut rx_from_network: Option<UnboundedReceiver<String>> = None;
    let mut network_handle: Option<JoinHandle<()>> = None;

    loop {
        app.set_available(*availability.borrow());

        // If the service stops answering probes, the chat session is
        // torn down with it.
        if app.connected && !app.available {
            disconnect(&mut app, &mut rx_from_network, &mut network_handle);
        }

        // Draw UI
        terminal.draw(|f| ui::draw(f, &app))?;

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter => {
                            if app.available && !app.connected {
                                match try_connect(&mut app).await {
                                    Ok((rx, handle)) => {
                                        rx_from_network = Some(rx);
                                        network_handle = Some(handle);
                                    }
                                    Err(e) => error!("connect failed: {:#}", e),
                                }
                            }
                        }
                        _ => {}
                    },

                    InputMode::Editing => match key.code {
                        KeyCode::Enter => {
                            app.submit_input();
                        }
                        KeyCode::Esc => {
                            disconnect(&mut app, &mut rx_from_network, &mut network_handle);
                        }
                        KeyCode::Backspace => {
                            app.delete_char();
                        }
                        KeyCode::Char(c) => {
                            app.enter_char(c);
                        }
                        _ => {}
                    },
                }
            }
        }

        // Deliver network messages to the app.
        let mut connection_lost = false;
        if let Some(rx) = rx_from_network.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(text) => app.push_incoming(text),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        connection_lost = true;
                        break;
                    }
                }
            }
        }
        if connection_lost {
            disconnect(&mut app, &mut rx_from_network, &mut network_handle);
        }

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    // Cleanup
    disconnect(&mut app, &mut rx_from_network, &mut network_handle);
    probe_handle.abort();
    Ok(())
}

async fn try_connect(app: &mut App) -> Result<(UnboundedReceiver<String>, JoinHandle<()>)> {
    let (tx_to_app, rx_from_network) = mpsc::unbounded_channel();
    let (tx_to_network, rx_from_app) = mpsc::unbounded_channel();

    let connection = ChatConnection::connect(&app.server_addr, &app.username, tx_to_app).await?;
    let network_handle = tokio::spawn(connection.run(rx_from_app));

    app.on_connected(tx_to_network);
    Ok((rx_from_network, network_handle))
}

fn disconnect(
    app: &mut App,
    rx_from_network: &mut Option<UnboundedReceiver<String>>,
    network_handle: &mut Option<JoinHandle<()>>,
) {
    if app.connected {
        app.on_disconnected();
    }
    // Dropping the app-side channels lets the connection task close
    // the socket and finish on its own; the detached handle is not
    // awaited.
    *rx_from_network = None;
    drop(network_handle.take());
}
