//! Game configuration.

use serde::{Deserialize, Serialize};
use tileforge_room::RoomConfig;

/// Economy and dealing settings for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Budget every player receives when a match starts.
    pub default_budget: i64,

    /// Fewest seated players a match can start with.
    pub min_players: usize,

    /// Seed for the dealing RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_budget: 100,
            min_players: 2,
            seed: None,
        }
    }
}

/// Everything a game room is created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub game: GameConfig,
    pub room: RoomConfig,
}
