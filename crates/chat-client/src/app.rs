// crates/chat-client/src/app.rs

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tokio::sync::mpsc::UnboundedSender;

/// Cap on the local scrollback.
const MAX_SCROLLBACK: usize = 200;

pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Clone)]
pub struct ChatMessage {
    pub text: String,
    /// True for lines this client sent (local echo).
    pub mine: bool,
    pub timestamp: DateTime<Local>,
}

pub struct App {
    // Connection state
    pub available: bool,
    pub connected: bool,
    pub username: String,
    pub server_addr: String,

    // UI state
    pub input_mode: InputMode,
    pub should_quit: bool,

    // Chat state
    pub messages: VecDeque<ChatMessage>,

    // Input buffer
    pub input_buffer: String,

    pub network_tx: Option<UnboundedSender<String>>,
}

impl App {
    pub fn new(username: &str, server_addr: &str) -> Self {
        Self {
            available: false,
            connected: false,
            username: username.to_string(),
            server_addr: server_addr.to_string(),
            input_mode: InputMode::Normal,
            should_quit: false,
            messages: VecDeque::with_capacity(MAX_SCROLLBACK),
            input_buffer: String::new(),
            network_tx: None,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn on_connected(&mut self, network_tx: UnboundedSender<String>) {
        self.connected = true;
        self.input_mode = InputMode::Editing;
        self.network_tx = Some(network_tx);
    }

    /// Tear down the session state. The message log is local to a
    /// session and is wiped with it.
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.input_mode = InputMode::Normal;
        self.network_tx = None;
        self.messages.clear();
        self.input_buffer.clear();
    }

    pub fn push_incoming(&mut self, text: String) {
        self.push_message(ChatMessage {
            text,
            mine: false,
            timestamp: Local::now(),
        });
    }

    /// Send the current input line. Blank-only lines are refused and
    /// stay in the buffer; anything else is sent as typed and echoed
    /// locally.
    pub fn submit_input(&mut self) {
        if self.input_buffer.trim().is_empty() {
            return;
        }

        let line = std::mem::take(&mut self.input_buffer);
        if let Some(tx) = &self.network_tx {
            if tx.send(line.clone()).is_ok() {
                self.push_message(ChatMessage {
                    text: line,
                    mine: true,
                    timestamp: Local::now(),
                });
            }
        }
    }

    pub fn enter_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn delete_char(&mut self) {
        self.input_buffer.pop();
    }

    fn push_message(&mut self, msg: ChatMessage) {
        if self.messages.len() == MAX_SCROLLBACK {
            self.messages.pop_front();
        }
        self.messages.push_back(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn connected_app() -> (App, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new("alice", "127.0.0.1:8080");
        app.on_connected(tx);
        (app, rx)
    }

    #[test]
    fn blank_input_is_not_sent() {
        let (mut app, mut rx) = connected_app();

        for buffer in ["", "   ", "\t"] {
            app.input_buffer = buffer.to_string();
            app.submit_input();
            assert!(rx.try_recv().is_err(), "{:?} should not be sent", buffer);
            // A refused line stays in the buffer.
            assert_eq!(app.input_buffer, buffer);
        }
        assert!(app.messages.is_empty());
    }

    #[test]
    fn submit_sends_the_line_as_typed_and_echoes_it() {
        let (mut app, mut rx) = connected_app();

        app.input_buffer = " hello there ".to_string();
        app.submit_input();

        assert_eq!(rx.try_recv().unwrap(), " hello there ");
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.messages.len(), 1);
        assert!(app.messages[0].mine);
        assert_eq!(app.messages[0].text, " hello there ");
    }

    #[test]
    fn disconnect_wipes_the_session() {
        let (mut app, _rx) = connected_app();
        app.push_incoming("pong".to_string());
        app.input_buffer = "half-typed".to_string();

        app.on_disconnected();

        assert!(!app.connected);
        assert!(app.network_tx.is_none());
        assert!(app.messages.is_empty());
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn scrollback_is_bounded() {
        let (mut app, _rx) = connected_app();

        for i in 0..MAX_SCROLLBACK + 50 {
            app.push_incoming(format!("msg {}", i));
        }

        assert_eq!(app.messages.len(), MAX_SCROLLBACK);
        // The oldest lines were dropped.
        assert_eq!(app.messages[0].text, "msg 50");
    }
}
