//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a room instance.
///
/// Behaviors can override these defaults through
/// [`RoomBehavior::room_config`](crate::RoomBehavior::room_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Maximum number of seats, counting seats held for reconnection.
    pub max_clients: usize,

    /// How long a seat is held after an abrupt disconnect.
    pub reconnect_grace: Duration,

    /// Dispose the room once its last seat is gone.
    pub auto_dispose: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_clients: 4,
            reconnect_grace: Duration::from_secs(30),
            auto_dispose: true,
        }
    }
}
