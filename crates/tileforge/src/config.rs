//! Server-wide configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tileforge_game::{GameConfig, GameOptions};
use tileforge_room::RoomConfig;
use tileforge_session::SessionConfig;

use crate::TileforgeError;

/// Settings for every room the server creates.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config:
///
/// ```json
/// {
///   "room": { "max_clients": 4, "reconnect_grace": { "secs": 30, "nanos": 0 } },
///   "game": { "default_budget": 100, "min_players": 2 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileforgeConfig {
    pub room: RoomConfig,
    pub game: GameConfig,
}

impl TileforgeConfig {
    pub fn from_json(json: &str) -> Result<Self, TileforgeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Session settings matching the room's grace period, rounded up to a
    /// whole second. Seats held by a room carry their own deadline, which
    /// takes precedence for the session left behind.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            reconnect_grace_secs: whole_secs(self.room.reconnect_grace),
        }
    }

    pub fn game_options(&self) -> GameOptions {
        GameOptions {
            game: self.game.clone(),
            room: self.room.clone(),
        }
    }
}

fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
