//! Room manager: creates rooms, seats sessions and routes their traffic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tileforge_protocol::{JoinOptions, RoomId, SessionId};
use tileforge_session::{SessionConfig, SessionError, SessionManager};

use crate::room::spawn_room;
use crate::{ClientSender, RoomBehavior, RoomError, RoomHandle, RoomInfo};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// What a client gets back when it takes a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTicket {
    pub session_id: SessionId,
    /// Secret to present to [`RoomManager::reconnect`] after a drop.
    pub reconnect_token: String,
}

/// Manages all active rooms and tracks which session sits in which room.
///
/// A session lives in exactly one room; it is created on join and
/// forgotten when it leaves for good.
pub struct RoomManager<B: RoomBehavior> {
    rooms: HashMap<RoomId, RoomHandle<B>>,
    session_rooms: HashMap<SessionId, RoomId>,
    sessions: SessionManager,
}

impl<B: RoomBehavior> RoomManager<B> {
    pub fn new(session_config: SessionConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            session_rooms: HashMap::new(),
            sessions: SessionManager::new(session_config),
        }
    }

    /// Spawns a room actor and returns its ID.
    pub fn create_room(&mut self, options: B::Options) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let config = B::room_config(&options);
        let handle = spawn_room::<B>(room_id, &options, config, DEFAULT_CHANNEL_SIZE);
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, name = B::name(), "room created");
        room_id
    }

    /// Opens a session and seats it in `room_id`.
    ///
    /// The session is discarded again if the room turns the join down.
    pub async fn join_room(
        &mut self,
        room_id: RoomId,
        options: JoinOptions,
        sender: ClientSender<B>,
    ) -> Result<JoinTicket, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let session = self.sessions.create();
        let ticket = JoinTicket {
            session_id: session.session_id.clone(),
            reconnect_token: session.reconnect_token.clone(),
        };

        match handle.join(ticket.session_id.clone(), options, sender).await {
            Ok(()) => {
                self.session_rooms.insert(ticket.session_id.clone(), room_id);
                Ok(ticket)
            }
            Err(err) => {
                self.sessions.remove(&ticket.session_id);
                Err(err)
            }
        }
    }

    /// Takes a session out of its room.
    ///
    /// If the room holds the seat for a reconnection, the session is marked
    /// disconnected until the seat's deadline and its token stays usable
    /// until then. Otherwise (consented leave, or a room that lets the seat
    /// go) the session ends.
    pub async fn leave_room(
        &mut self,
        session_id: &SessionId,
        consented: bool,
    ) -> Result<(), RoomError> {
        let room_id = self.room_of(session_id)?;
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        match handle.leave(session_id.clone(), consented).await? {
            Some(deadline) if !consented => {
                self.sessions.disconnect_until(session_id, deadline)?;
            }
            _ => self.forget(session_id),
        }
        Ok(())
    }

    /// Resumes a dropped session with its reconnection token and returns
    /// its (unchanged) id.
    pub async fn reconnect(
        &mut self,
        token: &str,
        sender: ClientSender<B>,
    ) -> Result<SessionId, RoomError> {
        let session_id = match self.sessions.reconnect(token) {
            Ok(session) => session.session_id.clone(),
            Err(SessionError::SessionExpired(session_id)) => {
                self.forget(&session_id);
                return Err(SessionError::SessionExpired(session_id).into());
            }
            Err(err) => return Err(err.into()),
        };
        let room_id = match self.room_of(&session_id) {
            Ok(room_id) => room_id,
            Err(err) => {
                self.forget(&session_id);
                return Err(err);
            }
        };
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        match handle.reconnect(session_id.clone(), sender).await {
            Ok(()) => Ok(session_id),
            Err(err) => {
                tracing::info!(%session_id, %room_id, error = %err, "reconnection refused");
                self.forget(&session_id);
                Err(err)
            }
        }
    }

    /// Routes a client message to the sender's room. Only connected
    /// sessions may send.
    pub async fn route_message(
        &self,
        session_id: &SessionId,
        message_type: &str,
        body: Value,
    ) -> Result<(), RoomError> {
        let room_id = self.room_of(session_id)?;
        self.sessions.ensure_connected(session_id)?;
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        handle
            .send_message(session_id.clone(), message_type, body)
            .await
    }

    pub async fn get_room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.get_info().await
    }

    /// The room state as seen by `viewer` (`None` for an outside observer).
    pub async fn get_view(
        &self,
        room_id: RoomId,
        viewer: Option<&SessionId>,
    ) -> Result<B::View, RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.get_view(viewer.cloned()).await
    }

    /// Shuts down a room and forgets every session seated in it.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        let _ = handle.shutdown().await;
        self.forget_room(room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Drops rooms whose actor has stopped on its own and returns their ids.
    pub fn prune_disposed(&mut self) -> Vec<RoomId> {
        let closed: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, handle)| handle.is_closed())
            .map(|(room_id, _)| *room_id)
            .collect();

        for room_id in &closed {
            self.rooms.remove(room_id);
            self.forget_room(*room_id);
            tracing::info!(%room_id, "disposed room pruned");
        }
        closed
    }

    /// Ends sessions whose grace period ran out and returns their ids.
    pub fn expire_sessions(&mut self) -> Vec<SessionId> {
        let expired = self.sessions.expire_stale();
        self.sessions.cleanup_expired();
        for session_id in &expired {
            self.session_rooms.remove(session_id);
        }
        expired
    }

    /// Returns the room a session is seated in, if any.
    pub fn session_room(&self, session_id: &SessionId) -> Option<RoomId> {
        self.session_rooms.get(session_id).copied()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }

    fn room_of(&self, session_id: &SessionId) -> Result<RoomId, RoomError> {
        self.session_room(session_id)
            .ok_or_else(|| RoomError::NoRoom(session_id.clone()))
    }

    fn forget(&mut self, session_id: &SessionId) {
        self.session_rooms.remove(session_id);
        self.sessions.remove(session_id);
    }

    fn forget_room(&mut self, room_id: RoomId) {
        let seated: Vec<SessionId> = self
            .session_rooms
            .iter()
            .filter(|(_, rid)| **rid == room_id)
            .map(|(session_id, _)| session_id.clone())
            .collect();
        for session_id in &seated {
            self.forget(session_id);
        }
    }
}

impl<B: RoomBehavior> Default for RoomManager<B> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
