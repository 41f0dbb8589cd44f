//! The session manager: tracks every participant the server has admitted.
//!
//! Responsibilities:
//! - Handing out fresh session ids (these double as player ids in a room)
//! - Tracking which participants are connected or disconnected
//! - Validating reconnection tokens
//! - Expiring sessions after the grace period
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself. It is owned by the room
//! manager and reached through `&mut self`, so a plain `HashMap` is enough.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use tileforge_protocol::SessionId;
use tokio::time::Instant;

use crate::{Session, SessionConfig, SessionError, SessionState, create_random_id};

/// Length of generated session ids.
const SESSION_ID_LEN: usize = 9;

/// Registry of active and recently disconnected sessions.
///
/// ```text
/// create() ──→ disconnect() ──→ reconnect()
///    │              │                │
///    ▼              ▼                ▼
/// [Connected]  [Disconnected]   [Connected]
///                   │
///                   ▼ (after grace period)
///               [Expired] ──→ cleanup_expired()
/// ```
pub struct SessionManager {
    sessions: HashMap<SessionId, Session>,

    /// Reconnection token → session id. Kept in sync with `sessions`.
    tokens: HashMap<String, SessionId>,

    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            tokens: HashMap::new(),
            config,
        }
    }

    /// Creates a connected session under a freshly generated, unused id.
    pub fn create(&mut self) -> &Session {
        let session_id = loop {
            let candidate = SessionId(create_random_id(SESSION_ID_LEN));
            if !self.sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let token = generate_token();

        self.tokens.insert(token.clone(), session_id.clone());
        self.sessions.insert(
            session_id.clone(),
            Session {
                session_id: session_id.clone(),
                state: SessionState::Connected,
                reconnect_token: token,
            },
        );

        tracing::info!(%session_id, "session created");
        self.sessions.get(&session_id).expect("just inserted")
    }

    /// Marks a session as disconnected for the configured grace period.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(&mut self, session_id: &SessionId) -> Result<(), SessionError> {
        let grace = Duration::from_secs(self.config.reconnect_grace_secs);
        self.disconnect_until(session_id, Instant::now() + grace)
    }

    /// Marks a session as disconnected; its token is accepted until
    /// `deadline`. Rooms pass the deadline of the seat they hold.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn disconnect_until(
        &mut self,
        session_id: &SessionId,
        deadline: Instant,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.clone()))?;

        session.state = SessionState::Disconnected { deadline };

        tracing::info!(
            %session_id,
            grace_ms = deadline.saturating_duration_since(Instant::now()).as_millis() as u64,
            "session disconnected, grace period started"
        );
        Ok(())
    }

    /// Fails unless the session exists and is connected.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: unknown id
    /// - [`SessionError::NotConnected`]: disconnected or expired
    pub fn ensure_connected(&self, session_id: &SessionId) -> Result<(), SessionError> {
        match self.sessions.get(session_id).map(|session| &session.state) {
            Some(SessionState::Connected) => Ok(()),
            Some(_) => Err(SessionError::NotConnected(session_id.clone())),
            None => Err(SessionError::NotFound(session_id.clone())),
        }
    }

    /// Moves a disconnected session back to connected using its token.
    ///
    /// # Errors
    /// - [`SessionError::InvalidToken`]: token not recognized
    /// - [`SessionError::SessionExpired`]: grace period elapsed
    /// - [`SessionError::AlreadyConnected`]: nothing to resume
    pub fn reconnect(&mut self, token: &str) -> Result<&Session, SessionError> {
        let session_id = self
            .tokens
            .get(token)
            .cloned()
            .ok_or(SessionError::InvalidToken)?;

        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::InvalidToken)?;

        match &session.state {
            SessionState::Disconnected { deadline } => {
                if Instant::now() >= *deadline {
                    session.state = SessionState::Expired;
                    return Err(SessionError::SessionExpired(session_id));
                }
                session.state = SessionState::Connected;
                tracing::info!(%session_id, "session reconnected");
                Ok(self.sessions.get(&session_id).expect("just modified"))
            }
            SessionState::Connected => Err(SessionError::AlreadyConnected(session_id)),
            SessionState::Expired => Err(SessionError::SessionExpired(session_id)),
        }
    }

    /// Expires every disconnected session whose grace period has elapsed
    /// and returns their ids.
    pub fn expire_stale(&mut self) -> Vec<SessionId> {
        let now = Instant::now();
        let mut expired = Vec::new();

        for session in self.sessions.values_mut() {
            if let SessionState::Disconnected { deadline } = &session.state {
                if now >= *deadline {
                    session.state = SessionState::Expired;
                    expired.push(session.session_id.clone());
                    tracing::info!(
                        session_id = %session.session_id,
                        "session expired (grace period elapsed)"
                    );
                }
            }
        }

        expired
    }

    /// Drops expired sessions and their tokens.
    ///
    /// Kept separate from `expire_stale()` so callers can react to the
    /// expirations before the records disappear.
    pub fn cleanup_expired(&mut self) {
        self.sessions.retain(|_, session| {
            if matches!(session.state, SessionState::Expired) {
                self.tokens.remove(&session.reconnect_token);
                false
            } else {
                true
            }
        });
    }

    /// Removes a session outright (consented leave, room rejected a resume).
    pub fn remove(&mut self, session_id: &SessionId) -> Option<Session> {
        let session = self.sessions.remove(session_id)?;
        self.tokens.remove(&session.reconnect_token);
        tracing::debug!(%session_id, "session removed");
        Some(session)
    }

    pub fn get(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Number of sessions in any state.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// A random 32-character hex string (128 bits).
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
