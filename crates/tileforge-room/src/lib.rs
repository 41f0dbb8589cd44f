//! Room lifecycle management for Tileforge.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns one
//! [`RoomBehavior`] instance and processes one event at a time.
//!
//! # Key types
//!
//! - [`RoomBehavior`]: the trait a game implements (lifecycle hooks, views)
//! - [`MessageRouter`]: per-message-type handlers with payload guards
//! - [`RoomContext`]: what a hook can do (broadcast, errors, lock, hold seats)
//! - [`RoomManager`]: creates/destroys rooms, seats sessions, routes traffic
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomConfig`]: seat limit, reconnection grace, auto-dispose

mod behavior;
mod config;
mod context;
mod error;
pub mod lifecycle;
mod manager;
mod room;
mod router;

pub use behavior::RoomBehavior;
pub use config::RoomConfig;
pub use context::{Deferred, RoomContext};
pub use error::RoomError;
pub use manager::{JoinTicket, RoomManager};
pub use room::{ClientSender, RoomHandle, RoomInfo, RoomOutbound};
pub use router::MessageRouter;
