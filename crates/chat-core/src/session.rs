//! Session registry and reply engine.
//!
//! This is the heart of the service, kept free of any I/O:
//! - Maintains one [`Session`] per connected client.
//! - Routes input messages to the owning session.
//! - Produces the replies the networking layer should send back.
//!
//! Contract:
//! - `Ping` yields exactly one `Pong`, unicast to the origin.
//! - `Chat` yields nothing; the text is only counted here and logged
//!   by the caller.
//! - `Ping` / `Chat` / `Leave` for an unknown client are ignored
//!   (frames can race the hub's own cleanup).

use std::collections::HashMap;

use crate::client_id::ClientId;
use crate::identity::Identity;
use crate::messages::{InputMessage, OutputMessage};

/// State tracked for one connected client.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,

    /// Number of `ping` probes answered so far.
    pub pings: u64,

    /// Number of non-ping text messages seen so far.
    pub chat_lines: u64,
}

impl Session {
    fn new(identity: Identity) -> Self {
        Session {
            identity,
            pings: 0,
            chat_lines: 0,
        }
    }
}

/// Multi-session engine.
///
/// Owns the set of live sessions, keyed by [`ClientId`]. The
/// networking layer feeds it logical messages and routes whatever
/// it returns back to the originating client.
#[derive(Debug, Default)]
pub struct SessionEngine {
    sessions: HashMap<ClientId, Session>,
}

impl SessionEngine {
    /// Create a new, empty engine.
    pub fn new() -> Self {
        SessionEngine::default()
    }

    /// Process a single input message and return any replies.
    pub fn process_message(&mut self, client_id: ClientId, msg: InputMessage) -> Vec<OutputMessage> {
        match msg {
            InputMessage::Join(identity) => self.process_join(client_id, identity),
            InputMessage::Ping => self.process_ping(client_id),
            InputMessage::Chat(text) => self.process_chat(client_id, &text),
            InputMessage::Leave => self.process_leave(client_id),
        }
    }

    /// Look up a live session.
    pub fn session(&self, client_id: ClientId) -> Option<&Session> {
        self.sessions.get(&client_id)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // -------------------------------------------------------------------------
    // Internal handlers
    // -------------------------------------------------------------------------

    fn process_join(&mut self, client_id: ClientId, identity: Identity) -> Vec<OutputMessage> {
        // A repeated Join for the same id replaces the old session;
        // client ids are never reused, so this only happens if the
        // networking layer misbehaves.
        self.sessions.insert(client_id, Session::new(identity));
        Vec::new()
    }

    fn process_ping(&mut self, client_id: ClientId) -> Vec<OutputMessage> {
        match self.sessions.get_mut(&client_id) {
            Some(session) => {
                session.pings += 1;
                vec![OutputMessage::Pong]
            }
            None => Vec::new(),
        }
    }

    fn process_chat(&mut self, client_id: ClientId, _text: &str) -> Vec<OutputMessage> {
        if let Some(session) = self.sessions.get_mut(&client_id) {
            session.chat_lines += 1;
        }
        Vec::new()
    }

    fn process_leave(&mut self, client_id: ClientId) -> Vec<OutputMessage> {
        self.sessions.remove(&client_id);
        Vec::new()
    }
}
