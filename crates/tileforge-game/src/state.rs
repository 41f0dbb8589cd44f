//! The state model: players, the table, and what each viewer may see.
//!
//! `GameState` is owned by the room actor and mutated only by the engine.
//! Clients never receive it directly. They get a [`GameStateView`] built for
//! them, in which every hand except their own is reduced to a tile count.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use tileforge_protocol::{SessionId, Tile};

use crate::Hand;

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// ```text
/// Waiting ──START──→ Starting ──(lock acquired, checks pass)──→ Ongoing
///    ↑                   │                                          │
///    └──(checks fail)────┘                                          │
///    └──────────────────────(bankruptcy / forced end)───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    /// Transient: the room lock has been requested but not yet acquired.
    Starting,
    Ongoing,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => f.write_str("waiting"),
            Self::Starting => f.write_str("starting"),
            Self::Ongoing => f.write_str("ongoing"),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Connected,
    /// The seat is held until `deadline`.
    PendingReconnection { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: SessionId,
    pub name: String,
    pub is_ready: bool,
    pub budget: i64,
    pub connection: Connection,
    tiles: Vec<Tile>,
    tile_count: usize,
}

impl PlayerState {
    pub fn new(id: SessionId, name: String) -> Self {
        Self {
            id,
            name,
            is_ready: false,
            budget: 0,
            connection: Connection::Connected,
            tiles: Vec::new(),
            tile_count: 0,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Always equal to `tiles().len()`.
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self.connection, Connection::PendingReconnection { .. })
    }

    pub fn set_tiles(&mut self, mut tiles: Vec<Tile>) {
        tiles.sort_unstable();
        self.tile_count = tiles.len();
        self.tiles = tiles;
    }

    pub fn clear_tiles(&mut self) {
        self.set_tiles(Vec::new());
    }

    pub fn holds_all(&self, tiles: &[Tile]) -> bool {
        tiles.iter().all(|tile| self.tiles.contains(tile))
    }

    /// Removes `tiles` from the hand. Tiles not held are ignored.
    pub fn remove_tiles(&mut self, tiles: &[Tile]) {
        self.tiles.retain(|tile| !tiles.contains(tile));
        self.tile_count = self.tiles.len();
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The last accepted hand and who played it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHand {
    pub owner: SessionId,
    pub hand: Hand,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Seats in join order.
    pub players: Vec<PlayerState>,
    pub current_player_index: usize,
    pub status: GameStatus,
    pub table: Option<TableHand>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            current_player_index: 0,
            status: GameStatus::Waiting,
            table: None,
        }
    }
}

impl GameState {
    pub fn position(&self, id: &SessionId) -> Option<usize> {
        self.players.iter().position(|player| player.id == *id)
    }

    pub fn player(&self, id: &SessionId) -> Option<&PlayerState> {
        self.players.iter().find(|player| player.id == *id)
    }

    pub fn player_mut(&mut self, id: &SessionId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|player| player.id == *id)
    }

    pub fn total_budget(&self) -> i64 {
        self.players.iter().map(|player| player.budget).sum()
    }

    /// The state as `viewer` may see it.
    pub fn view_for(&self, viewer: Option<&SessionId>) -> GameStateView {
        GameStateView {
            players: self
                .players
                .iter()
                .map(|player| PlayerView {
                    id: player.id.clone(),
                    name: player.name.clone(),
                    is_ready: player.is_ready,
                    budget: player.budget,
                    tile_count: player.tile_count,
                    tiles: (viewer == Some(&player.id)).then(|| player.tiles.clone()),
                    disconnected: player.is_disconnected(),
                })
                .collect(),
            current_player_index: self.current_player_index,
            status: self.status,
            table: self.table.as_ref().map(|table| TableView {
                owner: table.owner.clone(),
                tiles: table.hand.tiles.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: SessionId,
    pub name: String,
    pub is_ready: bool,
    pub budget: i64,
    pub tile_count: usize,
    /// Present only in the owner's view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<Tile>>,
    pub disconnected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub owner: SessionId,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub players: Vec<PlayerView>,
    pub current_player_index: usize,
    pub status: GameStatus,
    pub table: Option<TableView>,
}

impl GameStateView {
    pub fn player(&self, id: &SessionId) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.id == *id)
    }
}
