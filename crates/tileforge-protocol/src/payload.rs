//! Payloads carried by client actions and server events.

use serde::{Deserialize, Serialize};

use crate::{SessionId, Tile};

/// Payload of `READY`: the new readiness value.
pub type ReadyPayload = bool;

/// Payload of `PLAY_HAND`: the tiles the player lays down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayHandPayload {
    pub tiles: Vec<Tile>,
}

/// Options a client may pass when joining a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    /// Display name. A positional placeholder is used when absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl JoinOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// One player's line in the round-end summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEndEntry {
    pub player_id: SessionId,
    /// The tiles the player was still holding when the round ended.
    pub tiles: Vec<Tile>,
    pub penalty: i64,
    pub prev_budget: i64,
    pub new_budget: i64,
}

/// One player's line in the game-end summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndEntry {
    pub player_id: SessionId,
    pub budget: i64,
}

/// Events a game room broadcasts to every client.
///
/// Adjacently tagged, so a round end looks like
/// `{ "type": "ROUND_END", "payload": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    RoundEnd(Vec<RoundEndEntry>),
    GameEnd(Vec<GameEndEntry>),
}
