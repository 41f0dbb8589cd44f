//! Unified error type for Tileforge.

use tileforge_game::GameError;
use tileforge_protocol::ProtocolError;
use tileforge_room::RoomError;
use tileforge_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// Each variant converts from its sub-crate error, so `?` works across
/// layers when you only depend on the `tileforge` crate.
#[derive(Debug, thiserror::Error)]
pub enum TileforgeError {
    /// A payload that failed to decode or validate.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Unknown session, bad reconnection token, expired session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Room not found, full, locked, or its actor is gone.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A rejected game action.
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
