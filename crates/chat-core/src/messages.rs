//! Message types used by the session engine.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InputMessage`]: what the engine consumes.
//! - [`OutputMessage`]: what the engine produces.
//!
//! Note: the text / query-string codecs live in the `chat-protocol`
//! crate; this module is purely logical. In particular the engine
//! never sees the literal `"ping"` string: classifying raw text into
//! `Ping` vs `Chat` is a protocol concern.

use crate::identity::Identity;

/// A high-level event into the session engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    /// A connection completed its handshake and is now a session.
    Join(Identity),

    /// The client sent the keepalive probe text.
    Ping,

    /// The client sent any other text payload.
    Chat(String),

    /// The connection ended (close frame, error, or EOF).
    Leave,
}

/// A high-level event emitted by the session engine.
///
/// Replies are always unicast to the originating client; the engine
/// never broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMessage {
    /// Reply to a [`InputMessage::Ping`].
    Pong,
}
