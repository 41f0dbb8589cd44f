//! Error types for the room layer.

use tileforge_protocol::{RoomId, SessionId};
use tileforge_session::SessionError;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Every seat is taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The room is locked (a match is starting or running).
    #[error("room {0} is locked")]
    Locked(RoomId),

    #[error("session {0} already in room {1}")]
    AlreadyInRoom(SessionId, RoomId),

    #[error("session {0} not in room {1}")]
    NotInRoom(SessionId, RoomId),

    /// The session is not seated anywhere.
    #[error("session {0} is not in any room")]
    NoRoom(SessionId),

    /// The room is not holding a seat for this session, or the grace
    /// period has run out.
    #[error("reconnection unavailable for session {0}")]
    ReconnectionUnavailable(SessionId),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    #[error(transparent)]
    Session(#[from] SessionError),
}
