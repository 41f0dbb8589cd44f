//! The Tileforge game engine.
//!
//! [`GameRoom`] plugs into the room runtime as a
//! [`RoomBehavior`](tileforge_room::RoomBehavior). It owns the seats, deals
//! tiles, enforces turn order and settles each round as a zero-sum transfer
//! of budget between players. A match ends when any budget reaches zero.
//!
//! # Modules
//!
//! - [`GameRoom`]: READY / START / PLAY_HAND / PASS and the round loop
//! - [`GameState`]: seats, table and per-viewer projections
//! - [`TileRules`]: deck size, deal size, legal hands ([`ClassicRules`])
//! - [`budget_deltas`]: the settlement formula

mod config;
mod engine;
mod error;
mod rules;
mod settlement;
mod state;

pub use config::{GameConfig, GameOptions};
pub use engine::GameRoom;
pub use error::GameError;
pub use rules::{ClassicRules, Hand, HandKind, TileRules};
pub use settlement::budget_deltas;
pub use state::{
    Connection, GameState, GameStateView, GameStatus, PlayerState, PlayerView, TableHand,
    TableView,
};
