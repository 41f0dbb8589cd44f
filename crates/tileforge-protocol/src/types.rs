//! Identity, delivery, action, and error-code types.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identifier of one connected participant within a room.
///
/// Session ids are short random strings handed out when a client joins. They
/// stay stable for the room's lifetime, including across a reconnection, so
/// the engine can use them as player ids.
///
/// `#[serde(transparent)]` keeps the wire form a plain string: a
/// `SessionId("aB3xY9kLm")` is serialized as `"aB3xY9kLm"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A unique identifier for a room (one isolated game instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies who should receive an outbound room message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected client in the room.
    All,

    /// One specific client.
    Client(SessionId),
}

// ---------------------------------------------------------------------------
// Client actions
// ---------------------------------------------------------------------------

/// The message type registered for the catch-all handler.
pub const WILDCARD_MESSAGE: &str = "*";

/// Message types a client may send to a game room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientAction {
    /// Toggle readiness. Payload: `bool`.
    Ready,
    /// Ask the room to start the match. No payload.
    Start,
    /// Play tiles from the hand. Payload: [`PlayHandPayload`](crate::PlayHandPayload).
    PlayHand,
    /// Skip the turn. No payload.
    Pass,
}

impl ClientAction {
    /// Every client action, in registration order.
    pub const ALL: [ClientAction; 4] = [Self::Ready, Self::Start, Self::PlayHand, Self::Pass];

    /// The message type string clients put on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Start => "START",
            Self::PlayHand => "PLAY_HAND",
            Self::Pass => "PASS",
        }
    }
}

impl fmt::Display for ClientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Typed error codes delivered to a single client without disconnecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The match has already started (or is starting).
    GameAlreadyStarted,
    /// The action needs an ongoing match.
    GameNotStarted,
    /// At least one player is not ready.
    UnreadyPlayersPresent,
    /// Fewer players than the minimum.
    NotEnoughPlayers,
    /// The sender has no seat in this room.
    NotAParticipant,
    /// The sender is not the current player.
    NotYourTurn,
    /// Unknown message type, malformed payload, or an illegal hand.
    InvalidAction,
}

impl ErrorCode {
    /// The wire representation of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::UnreadyPlayersPresent => "UNREADY_PLAYERS_PRESENT",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InvalidAction => "INVALID_ACTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
