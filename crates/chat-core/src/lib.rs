//! chat-core
//!
//! Pure session logic for the chat service:
//! - client ids and identities
//! - messages (input/output types)
//! - session registry and reply engine

pub mod client_id;
pub mod identity;
pub mod messages;
pub mod session;

pub use client_id::ClientId;
pub use identity::Identity;
pub use messages::{InputMessage, OutputMessage};
pub use session::{Session, SessionEngine};
