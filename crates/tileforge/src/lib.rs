//! # Tileforge
//!
//! Authoritative room engine for a budget-economy tile game.
//!
//! Players join a room, mark themselves ready and start a match. Each round
//! deals the whole deck, players take turns laying hands on the table, and
//! the first to empty their hand ends the round. Leftover tiles become
//! penalties that settle as a zero-sum budget transfer. The match ends when
//! someone goes bankrupt.
//!
//! Connection handling is left to the embedding server: it hands each
//! client an unbounded channel and forwards the client's messages through
//! the [`RoomManager`](tileforge_room::RoomManager).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tileforge::prelude::*;
//!
//! # async fn demo() -> Result<(), TileforgeError> {
//! tileforge::telemetry::init();
//! let mut host = Tileforge::builder().default_budget(50).build();
//! let room = host.create_room();
//!
//! let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//! let ticket = host
//!     .rooms_mut()
//!     .join_room(room, JoinOptions::named("Ann"), tx)
//!     .await?;
//! host.rooms_mut()
//!     .route_message(&ticket.session_id, "READY", serde_json::json!(true))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod server;
pub mod telemetry;

pub use config::TileforgeConfig;
pub use error::TileforgeError;
pub use server::{Sweep, Tileforge, TileforgeBuilder};

/// Re-exports of the types most embedders need.
pub mod prelude {
    pub use crate::{Tileforge, TileforgeConfig, TileforgeError};
    pub use tileforge_game::{
        ClassicRules, GameConfig, GameError, GameOptions, GameRoom, GameStateView, GameStatus,
        TileRules,
    };
    pub use tileforge_protocol::{
        ClientAction, ErrorCode, JoinOptions, PlayHandPayload, Recipient, RoomId, ServerEvent,
        SessionId, Tile, TileColor,
    };
    pub use tileforge_room::{ClientSender, JoinTicket, RoomConfig, RoomManager, RoomOutbound};
    pub use tileforge_session::SessionConfig;
}
