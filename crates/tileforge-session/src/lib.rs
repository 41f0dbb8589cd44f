//! Session management for Tileforge.
//!
//! This crate handles participant identity inside the server:
//!
//! 1. **Session ids**: short random ids handed out on join
//!    ([`SessionManager::create`]).
//! 2. **Reconnection**: token-based resumption after an abrupt drop, with a
//!    configurable grace period.
//! 3. **Random utilities**: [`create_random_id`] and [`shuffle_in_place`],
//!    shared by the room layer (log correlation) and the game (dealing).
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)    ← asks for session ids, validates reconnect tokens
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below) ← provides SessionId
//! ```

mod error;
mod manager;
mod random;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use random::{create_random_id, create_random_id_with, shuffle_in_place};
pub use session::{Session, SessionConfig, SessionState};
