//! Error types for the session layer.

use tileforge_protocol::SessionId;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given id.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The reconnection token doesn't match anything the server issued.
    #[error("invalid reconnection token")]
    InvalidToken,

    /// The reconnection grace period has elapsed.
    #[error("session {0} expired")]
    SessionExpired(SessionId),

    /// The session is disconnected and may not act until it reconnects.
    #[error("session {0} is not connected")]
    NotConnected(SessionId),

    /// The session is already connected; there is nothing to reconnect.
    #[error("session {0} is already connected")]
    AlreadyConnected(SessionId),
}
