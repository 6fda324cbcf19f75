//! Text payload classification.
//!
//! The wire protocol is deliberately plain: every frame is a UTF-8
//! text payload, and the only payload with special meaning is the
//! literal `ping`, which the server answers with the literal `pong`.
//!
//! Input (payload -> `InputMessage`):
//!
//! - `ping`            -> `Ping`
//! - anything else     -> `Chat(payload)`
//!
//! Output (`OutputMessage` -> payload):
//!
//! - `Pong`            -> `pong`
//!
//! The ping match is exact: no trimming, no case folding. `" ping"`,
//! `"PING"` and `"ping\n"` are all ordinary chat text.

use chat_core::{InputMessage, OutputMessage};

/// Keepalive probe payload.
pub const PING: &str = "ping";

/// Reply to [`PING`].
pub const PONG: &str = "pong";

/// Classify a text payload into a logical engine message.
pub fn parse_text_frame(text: &str) -> InputMessage {
    if text == PING {
        InputMessage::Ping
    } else {
        InputMessage::Chat(text.to_string())
    }
}

/// Format an `OutputMessage` as a text payload.
pub fn format_output(msg: &OutputMessage) -> String {
    match msg {
        OutputMessage::Pong => PONG.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ping_is_a_ping() {
        assert_eq!(parse_text_frame("ping"), InputMessage::Ping);
    }

    #[test]
    fn near_misses_are_chat() {
        for text in [" ping", "ping ", "PING", "Ping", "ping\n", "pingping", "pong", ""] {
            assert_eq!(
                parse_text_frame(text),
                InputMessage::Chat(text.to_string()),
                "{:?} must not classify as a ping",
                text
            );
        }
    }

    #[test]
    fn pong_formats_as_the_literal() {
        assert_eq!(format_output(&OutputMessage::Pong), "pong");
    }
}
