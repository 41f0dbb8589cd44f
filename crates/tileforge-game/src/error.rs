//! Error types for the game engine.

use tileforge_protocol::{ErrorCode, SessionId};

use crate::GameStatus;

/// A rejected client action. The state is left untouched and the code from
/// [`GameError::code`] goes back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game is {0}, the lobby is frozen")]
    AlreadyStarted(GameStatus),

    #[error("game is {0}, not ongoing")]
    NotStarted(GameStatus),

    #[error("not all players are ready")]
    UnreadyPlayers,

    #[error("need at least {required} players, have {present}")]
    NotEnoughPlayers { required: usize, present: usize },

    #[error("session {0} has no seat in this room")]
    NotAParticipant(SessionId),

    #[error("it is {0}'s turn")]
    NotYourTurn(SessionId),

    #[error("illegal hand: {0}")]
    IllegalHand(&'static str),

    #[error("unknown action {0:?}")]
    UnknownAction(String),
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyStarted(_) => ErrorCode::GameAlreadyStarted,
            Self::NotStarted(_) => ErrorCode::GameNotStarted,
            Self::UnreadyPlayers => ErrorCode::UnreadyPlayersPresent,
            Self::NotEnoughPlayers { .. } => ErrorCode::NotEnoughPlayers,
            Self::NotAParticipant(_) => ErrorCode::NotAParticipant,
            Self::NotYourTurn(_) => ErrorCode::NotYourTurn,
            Self::IllegalHand(_) | Self::UnknownAction(_) => ErrorCode::InvalidAction,
        }
    }
}

impl From<GameError> for ErrorCode {
    fn from(err: GameError) -> Self {
        err.code()
    }
}
