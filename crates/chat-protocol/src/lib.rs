//! chat-protocol
//!
//! Wire-facing rules for the chat service.
//!
//! This crate is responsible for turning raw connection data into
//! logical engine messages (`chat_core::InputMessage` /
//! `OutputMessage`) and back again.
//!
//! - [`text_codec`]  : text payload classification (ping vs chat)
//! - [`query_codec`] : username extraction from the upgrade URL

pub mod query_codec;
pub mod text_codec;

pub use query_codec::{format_username_query, username_from_query, DEFAULT_USERNAME};
pub use text_codec::{format_output, parse_text_frame, PING, PONG};
