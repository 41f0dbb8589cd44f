//! `RoomContext`: the behavior's side of the room.
//!
//! Hooks and handlers never touch channels or timers. They queue outbound
//! messages and requests here, and the actor carries them out once the hook
//! returns. This keeps every behavior method synchronous and lets tests
//! drive a behavior with a bare context.

use tokio::time::Instant;

use tileforge_protocol::{ErrorCode, Recipient, RoomId, SessionId};

use crate::{RoomBehavior, RoomConfig, RoomOutbound};

/// Work a hook asked the actor to do after it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Deliver `on_lock_acquired` as a queued event.
    LockAcquired { requester: SessionId },
    /// Hold `client`'s seat until `deadline`.
    AwaitReconnection { client: SessionId, deadline: Instant },
}

pub struct RoomContext<B: RoomBehavior> {
    room_id: RoomId,
    config: RoomConfig,
    locked: bool,
    outbox: Vec<(Recipient, RoomOutbound<B>)>,
    deferred: Vec<Deferred>,
}

impl<B: RoomBehavior> RoomContext<B> {
    pub fn new(room_id: RoomId, config: RoomConfig) -> Self {
        Self {
            room_id,
            config,
            locked: false,
            outbox: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Sends `message` to every seated client.
    pub fn broadcast(&mut self, message: B::ServerMessage) {
        self.outbox
            .push((Recipient::All, RoomOutbound::Message(message)));
    }

    /// Signals `code` to one client without disconnecting it.
    pub fn send_error(&mut self, client: &SessionId, code: ErrorCode) {
        self.outbox
            .push((Recipient::Client(client.clone()), RoomOutbound::Error(code)));
    }

    /// Closes the room to new joins and schedules `on_lock_acquired` behind
    /// the events already queued.
    pub fn lock(&mut self, requester: &SessionId) {
        self.locked = true;
        self.deferred.push(Deferred::LockAcquired {
            requester: requester.clone(),
        });
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Holds `client`'s seat for the configured grace period and returns
    /// the deadline.
    pub fn allow_reconnection(&mut self, client: &SessionId) -> Instant {
        let deadline = Instant::now() + self.config.reconnect_grace;
        self.deferred.push(Deferred::AwaitReconnection {
            client: client.clone(),
            deadline,
        });
        deadline
    }

    pub fn drain_outbox(&mut self) -> Vec<(Recipient, RoomOutbound<B>)> {
        std::mem::take(&mut self.outbox)
    }

    pub fn take_deferred(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.deferred)
    }
}
