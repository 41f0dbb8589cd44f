//! `Tileforge` builder and housekeeping loop.
//!
//! This is the entry point for hosting tile-game rooms. It ties the layers
//! together: session registry → room manager → game engine.

use std::sync::Arc;
use std::time::Duration;

use tileforge_game::{GameOptions, GameRoom};
use tileforge_protocol::{RoomId, SessionId};
use tileforge_room::RoomManager;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::{TileforgeConfig, TileforgeError};

/// Builder for configuring a [`Tileforge`] host.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tileforge::Tileforge;
///
/// let host = Tileforge::builder()
///     .max_clients(3)
///     .reconnect_grace(Duration::from_secs(15))
///     .default_budget(50)
///     .build();
/// assert_eq!(host.config().room.max_clients, 3);
/// ```
#[derive(Debug, Default)]
pub struct TileforgeBuilder {
    config: TileforgeConfig,
}

impl TileforgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a full configuration, e.g. one read with
    /// [`TileforgeConfig::from_json`].
    pub fn config(mut self, config: TileforgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads the starting configuration from JSON.
    pub fn config_json(self, json: &str) -> Result<Self, TileforgeError> {
        Ok(self.config(TileforgeConfig::from_json(json)?))
    }

    pub fn max_clients(mut self, max_clients: usize) -> Self {
        self.config.room.max_clients = max_clients;
        self
    }

    /// Sets how long a seat (and its session token) is held after an abrupt
    /// disconnect.
    pub fn reconnect_grace(mut self, grace: Duration) -> Self {
        self.config.room.reconnect_grace = grace;
        self
    }

    pub fn auto_dispose(mut self, auto_dispose: bool) -> Self {
        self.config.room.auto_dispose = auto_dispose;
        self
    }

    pub fn default_budget(mut self, budget: i64) -> Self {
        self.config.game.default_budget = budget;
        self
    }

    pub fn min_players(mut self, min_players: usize) -> Self {
        self.config.game.min_players = min_players;
        self
    }

    /// Makes dealing reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.game.seed = Some(seed);
        self
    }

    pub fn build(self) -> Tileforge {
        tracing::info!(config = ?self.config, "tileforge host configured");
        Tileforge {
            rooms: RoomManager::new(self.config.session()),
            config: self.config,
        }
    }
}

/// Hosts game rooms.
///
/// Owns the [`RoomManager`]; everything a connection layer needs (join,
/// leave, reconnect, route) goes through [`rooms_mut`](Self::rooms_mut).
pub struct Tileforge {
    rooms: RoomManager<GameRoom>,
    config: TileforgeConfig,
}

impl Tileforge {
    pub fn builder() -> TileforgeBuilder {
        TileforgeBuilder::new()
    }

    pub fn config(&self) -> &TileforgeConfig {
        &self.config
    }

    /// Creates a room with the host's configuration.
    pub fn create_room(&mut self) -> RoomId {
        let options = self.config.game_options();
        self.rooms.create_room(options)
    }

    /// Creates a room with its own options.
    pub fn create_room_with(&mut self, options: GameOptions) -> RoomId {
        self.rooms.create_room(options)
    }

    pub fn rooms(&self) -> &RoomManager<GameRoom> {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomManager<GameRoom> {
        &mut self.rooms
    }

    /// Drops rooms that disposed themselves and sessions whose grace period
    /// is over.
    pub fn sweep(&mut self) -> Sweep {
        let rooms = self.rooms.prune_disposed();
        let sessions = self.rooms.expire_sessions();
        if !rooms.is_empty() || !sessions.is_empty() {
            tracing::info!(rooms = rooms.len(), sessions = sessions.len(), "swept");
        }
        Sweep { rooms, sessions }
    }

    /// Shares the host and sweeps it every `interval` until the returned
    /// task is aborted.
    pub fn spawn_sweeper(self, interval: Duration) -> (Arc<Mutex<Self>>, JoinHandle<()>) {
        let shared = Arc::new(Mutex::new(self));
        let host = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                host.lock().await.sweep();
            }
        });
        (shared, task)
    }
}

/// What one [`Tileforge::sweep`] removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sweep {
    pub rooms: Vec<RoomId>,
    pub sessions: Vec<SessionId>,
}
