//! Per-connection identity used in log output.

use std::fmt;
use std::net::SocketAddr;

/// Who a session belongs to, from the server's point of view.
///
/// The username comes from the connection URL's query string and is
/// not authenticated in any way; two sessions may share a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name supplied by the client (or the default).
    pub username: String,

    /// Remote socket address of the connection.
    pub peer_addr: SocketAddr,
}

impl Identity {
    pub fn new(username: impl Into<String>, peer_addr: SocketAddr) -> Self {
        Identity {
            username: username.into(),
            peer_addr,
        }
    }
}

/// Renders as `username(ip:port)`, the prefix of every log line
/// that concerns this session.
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.username, self.peer_addr)
    }
}
