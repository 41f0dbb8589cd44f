//! Session types: the server's record of one participant's connection.
//!
//! A session tracks:
//! - WHO the participant is (`SessionId`)
//! - WHAT state the connection is in (connected, disconnected, expired)
//! - HOW the client can prove it is the same participant after a drop
//!   (a secret reconnection token)

use tokio::time::Instant;

use tileforge_protocol::SessionId;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long (in seconds) a disconnected participant has to present
    /// their reconnection token before it stops being accepted.
    ///
    /// Default: 30 seconds. Set to 0 to disable reconnection entirely.
    pub reconnect_grace_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current state of a session.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(timeout)──→ Expired
///       ↑                            │
///       └────────(reconnect)─────────┘
/// ```
///
/// `deadline` is on Tokio's monotonic clock, the same clock the room uses
/// for the seat held for this session.
#[derive(Debug, Clone)]
pub enum SessionState {
    Connected,
    /// The token is accepted until `deadline`.
    Disconnected { deadline: Instant },
    Expired,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single participant's session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The id the room engine uses as the player id.
    pub session_id: SessionId,

    pub state: SessionState,

    /// Secret the client presents to reconnect after an abrupt drop.
    /// A 32-character hex string (128 bits of randomness).
    pub reconnect_token: String,
}
