//! Shared protocol types for Tileforge.
//!
//! This crate defines the vocabulary that the room engine and its clients
//! agree on:
//!
//! - **Identity** ([`SessionId`], [`RoomId`]) and delivery targets
//!   ([`Recipient`]).
//! - **Tiles** ([`Tile`], [`TileColor`]): the values that get dealt.
//! - **Actions** ([`ClientAction`], [`ServerEvent`]) and their payloads.
//! - **Error codes** ([`ErrorCode`]) surfaced to a single client.
//! - **Payload guard** ([`check_payload`]): the only place where an untyped
//!   message body becomes a typed payload.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about rooms, timers, or sockets. It only
//! describes what travels between a client and a room.
//!
//! ```text
//! Client body (JSON) → Payload guard → typed payload → Room engine
//! ```

mod error;
mod guard;
mod payload;
mod tile;
mod types;

pub use error::ProtocolError;
pub use guard::{PayloadGuard, check_payload, is_play_hand_payload, is_ready_payload};
pub use payload::{
    GameEndEntry, JoinOptions, PlayHandPayload, ReadyPayload, RoundEndEntry, ServerEvent,
};
pub use tile::{Tile, TileColor};
pub use types::{ClientAction, ErrorCode, Recipient, RoomId, SessionId, WILDCARD_MESSAGE};
