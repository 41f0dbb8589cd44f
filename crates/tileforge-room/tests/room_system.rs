//! Integration tests for the room system using a mock behavior.

use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tileforge_protocol::{ErrorCode, JoinOptions, RoomId, SessionId, check_payload};
use tileforge_room::{
    ClientSender, MessageRouter, RoomBehavior, RoomConfig, RoomContext, RoomError, RoomManager,
    RoomOutbound,
};
use tileforge_session::{SessionConfig, SessionError};
use tokio::sync::mpsc;

// =========================================================================
// Mock behavior: a shared tally that players add to.
// =========================================================================

#[derive(Debug, Default)]
struct Tally {
    total: u32,
    seats: Vec<SessionId>,
    held: Vec<SessionId>,
    expired: Vec<SessionId>,
    release_dropped: bool,
}

#[derive(Clone, Debug, Default)]
struct TallyOptions {
    max_clients: Option<usize>,
    grace: Option<Duration>,
    /// Free the seat on an abrupt leave instead of holding it.
    release_dropped: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
struct TallyView {
    total: u32,
    seats: usize,
    viewer: Option<SessionId>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
enum TallyEvent {
    Added(u32),
    Sealed,
}

#[derive(Debug)]
enum TallyError {
    TooFew,
    Sealed,
}

impl std::fmt::Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFew => f.write_str("too few seats"),
            Self::Sealed => f.write_str("tally is sealed"),
        }
    }
}

impl From<TallyError> for ErrorCode {
    fn from(err: TallyError) -> Self {
        match err {
            TallyError::TooFew => ErrorCode::NotEnoughPlayers,
            TallyError::Sealed => ErrorCode::GameAlreadyStarted,
        }
    }
}

impl RoomBehavior for Tally {
    type Options = TallyOptions;
    type Error = TallyError;
    type View = TallyView;
    type ServerMessage = TallyEvent;

    fn create(options: &TallyOptions) -> Self {
        Tally {
            release_dropped: options.release_dropped,
            ..Tally::default()
        }
    }

    fn name() -> &'static str {
        "tally"
    }

    fn room_config(options: &TallyOptions) -> RoomConfig {
        let defaults = RoomConfig::default();
        RoomConfig {
            max_clients: options.max_clients.unwrap_or(defaults.max_clients),
            reconnect_grace: options.grace.unwrap_or(defaults.reconnect_grace),
            ..defaults
        }
    }

    fn routes() -> MessageRouter<Self> {
        MessageRouter::new()
            .on(
                "ADD",
                check_payload(|n: &u32| *n > 0),
                |tally: &mut Tally, ctx: &mut RoomContext<Tally>, _client: &SessionId, n: u32| {
                    if ctx.is_locked() {
                        return Err(TallyError::Sealed);
                    }
                    tally.total += n;
                    ctx.broadcast(TallyEvent::Added(tally.total));
                    Ok(())
                },
            )
            .on_unit(
                "SEAL",
                |_tally: &mut Tally, ctx: &mut RoomContext<Tally>, client: &SessionId| {
                    ctx.lock(client);
                    Ok(())
                },
            )
            .on_any(
                |_tally: &mut Tally, ctx: &mut RoomContext<Tally>, client: &SessionId, _ty: &str| {
                    ctx.send_error(client, ErrorCode::InvalidAction);
                    Ok(())
                },
            )
    }

    fn on_join(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId, _options: &JoinOptions) {
        self.seats.push(client.clone());
    }

    fn on_leave(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId, consented: bool) {
        if consented || self.release_dropped {
            self.seats.retain(|s| s != client);
        } else {
            ctx.allow_reconnection(client);
            self.held.push(client.clone());
        }
    }

    fn on_reconnect(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId) {
        self.held.retain(|s| s != client);
    }

    fn on_reconnection_expired(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId) {
        self.seats.retain(|s| s != client);
        self.held.retain(|s| s != client);
        self.expired.push(client.clone());
    }

    fn on_lock_acquired(
        &mut self,
        ctx: &mut RoomContext<Self>,
        _requester: &SessionId,
    ) -> Result<(), TallyError> {
        if self.seats.len() < 2 {
            ctx.unlock();
            return Err(TallyError::TooFew);
        }
        ctx.broadcast(TallyEvent::Sealed);
        Ok(())
    }

    fn view_for(&self, viewer: Option<&SessionId>) -> TallyView {
        TallyView {
            total: self.total,
            seats: self.seats.len(),
            viewer: viewer.cloned(),
        }
    }
}

// =========================================================================
// Helpers
// =========================================================================

/// Creates a dummy client sender (receiver is dropped immediately).
fn dummy_sender() -> ClientSender<Tally> {
    mpsc::unbounded_channel().0
}

fn opts() -> JoinOptions {
    JoinOptions::default()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Drains everything queued for a client.
fn drain(rx: &mut mpsc::UnboundedReceiver<RoomOutbound<Tally>>) -> Vec<RoomOutbound<Tally>> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn errors(msgs: &[RoomOutbound<Tally>]) -> Vec<ErrorCode> {
    msgs.iter()
        .filter_map(|m| match m {
            RoomOutbound::Error(code) => Some(*code),
            _ => None,
        })
        .collect()
}

fn events(msgs: &[RoomOutbound<Tally>]) -> Vec<TallyEvent> {
    msgs.iter()
        .filter_map(|m| match m {
            RoomOutbound::Message(event) => Some(event.clone()),
            _ => None,
        })
        .collect()
}

// =========================================================================
// RoomManager: rooms
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_unique_ids() {
    let mut mgr = RoomManager::<Tally>::default();
    let r1 = mgr.create_room(TallyOptions::default());
    let r2 = mgr.create_room(TallyOptions::default());
    assert_ne!(r1, r2);
    assert_eq!(mgr.room_count(), 2);
}

#[tokio::test]
async fn test_get_room_info_reports_seats() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    let info = mgr.get_room_info(room).await.unwrap();

    assert_eq!(info.room_id, room);
    assert_eq!(info.room_name, "tally");
    assert_eq!(info.client_count, 1);
    assert_eq!(info.max_clients, 4);
    assert!(!info.locked);
}

#[tokio::test]
async fn test_destroy_room_forgets_sessions() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let ticket = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.destroy_room(room).await.unwrap();

    assert_eq!(mgr.room_count(), 0);
    assert_eq!(mgr.session_room(&ticket.session_id), None);
    assert!(mgr.sessions().is_empty());
}

#[tokio::test]
async fn test_destroy_room_not_found() {
    let mut mgr = RoomManager::<Tally>::default();
    let result = mgr.destroy_room(RoomId(999_999)).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
}

// =========================================================================
// RoomManager: joining and leaving
// =========================================================================

#[tokio::test]
async fn test_join_room_issues_session_and_token() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());

    let ticket = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    assert_eq!(ticket.session_id.as_str().len(), 9);
    assert_eq!(ticket.reconnect_token.len(), 32);
    assert_eq!(mgr.session_room(&ticket.session_id), Some(room));
}

#[tokio::test]
async fn test_join_room_not_found() {
    let mut mgr = RoomManager::<Tally>::default();
    let result = mgr.join_room(RoomId(999_999), opts(), dummy_sender()).await;
    assert!(matches!(result, Err(RoomError::NotFound(_))));
    assert!(mgr.sessions().is_empty());
}

#[tokio::test]
async fn test_join_room_at_max_capacity_rejected() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions {
        max_clients: Some(2),
        ..TallyOptions::default()
    });
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    let result = mgr.join_room(room, opts(), dummy_sender()).await;

    assert!(matches!(result, Err(RoomError::RoomFull(_))));
    assert_eq!(mgr.sessions().len(), 2, "rejected session is discarded");
}

#[tokio::test]
async fn test_join_locked_room_rejected() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.route_message(&a.session_id, "SEAL", json!(null)).await.unwrap();
    settle().await;

    let result = mgr.join_room(room, opts(), dummy_sender()).await;

    assert!(matches!(result, Err(RoomError::Locked(_))));
}

#[tokio::test]
async fn test_leave_room_consented_ends_session() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, true).await.unwrap();

    assert_eq!(mgr.session_room(&a.session_id), None);
    assert!(mgr.sessions().get(&a.session_id).is_none());
    let info = mgr.get_room_info(room).await.unwrap();
    assert_eq!(info.client_count, 1);
}

#[tokio::test]
async fn test_leave_room_abrupt_without_held_seat_ends_session() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions {
        release_dropped: true,
        ..TallyOptions::default()
    });
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();

    assert_eq!(mgr.session_room(&a.session_id), None);
    assert!(mgr.sessions().get(&a.session_id).is_none());
    assert_eq!(mgr.get_room_info(room).await.unwrap().client_count, 1);
    let routed = mgr.route_message(&a.session_id, "ADD", json!(1)).await;
    assert!(matches!(routed, Err(RoomError::NoRoom(_))));
    let resumed = mgr.reconnect(&a.reconnect_token, dummy_sender()).await;
    assert!(matches!(resumed, Err(RoomError::Session(SessionError::InvalidToken))));
}

#[tokio::test]
async fn test_leave_room_not_in_any_room() {
    let mut mgr = RoomManager::<Tally>::default();
    let result = mgr.leave_room(&SessionId::from("nobody"), true).await;
    assert!(matches!(result, Err(RoomError::NoRoom(_))));
}

#[tokio::test]
async fn test_last_leave_auto_disposes_room() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, true).await.unwrap();
    settle().await;

    assert_eq!(mgr.prune_disposed(), vec![room]);
    assert_eq!(mgr.room_count(), 0);
}

// =========================================================================
// Message routing
// =========================================================================

#[tokio::test]
async fn test_route_message_broadcasts_to_all() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx1).await.unwrap();
    mgr.join_room(room, opts(), tx2).await.unwrap();
    settle().await;
    drain(&mut rx1);
    drain(&mut rx2);

    mgr.route_message(&a.session_id, "ADD", json!(3)).await.unwrap();
    settle().await;

    assert_eq!(events(&drain(&mut rx1)), vec![TallyEvent::Added(3)]);
    assert_eq!(events(&drain(&mut rx2)), vec![TallyEvent::Added(3)]);
}

#[tokio::test]
async fn test_route_message_pushes_own_view() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    settle().await;
    drain(&mut rx);

    mgr.route_message(&a.session_id, "ADD", json!(2)).await.unwrap();
    settle().await;

    let views: Vec<TallyView> = drain(&mut rx)
        .into_iter()
        .filter_map(|m| match m {
            RoomOutbound::State(view) => Some(view),
            _ => None,
        })
        .collect();
    assert_eq!(views.last().map(|v| v.total), Some(2));
    assert_eq!(views.last().and_then(|v| v.viewer.clone()), Some(a.session_id));
}

#[tokio::test]
async fn test_route_message_guard_rejection_errors_sender_only() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx1).await.unwrap();
    mgr.join_room(room, opts(), tx2).await.unwrap();
    settle().await;
    drain(&mut rx1);
    drain(&mut rx2);

    mgr.route_message(&a.session_id, "ADD", json!(0)).await.unwrap();
    mgr.route_message(&a.session_id, "ADD", json!("three")).await.unwrap();
    settle().await;

    let msgs1 = drain(&mut rx1);
    assert_eq!(errors(&msgs1), vec![ErrorCode::InvalidAction, ErrorCode::InvalidAction]);
    assert!(events(&msgs1).is_empty());
    assert!(errors(&drain(&mut rx2)).is_empty());

    let view = mgr.get_view(room, None).await.unwrap();
    assert_eq!(view.total, 0, "handler never ran");
}

#[tokio::test]
async fn test_route_message_unknown_type_hits_wildcard() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    settle().await;
    drain(&mut rx);

    mgr.route_message(&a.session_id, "DANCE", json!({})).await.unwrap();
    settle().await;

    assert_eq!(errors(&drain(&mut rx)), vec![ErrorCode::InvalidAction]);
}

#[tokio::test]
async fn test_route_message_handler_error_maps_to_code() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.route_message(&a.session_id, "SEAL", json!(null)).await.unwrap();
    settle().await;
    drain(&mut rx);

    mgr.route_message(&a.session_id, "ADD", json!(1)).await.unwrap();
    settle().await;

    assert_eq!(errors(&drain(&mut rx)), vec![ErrorCode::GameAlreadyStarted]);
}

#[tokio::test]
async fn test_route_message_from_disconnected_session_rejected() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.leave_room(&a.session_id, false).await.unwrap();

    let routed = mgr.route_message(&a.session_id, "ADD", json!(5)).await;

    assert!(matches!(
        routed,
        Err(RoomError::Session(SessionError::NotConnected(s))) if s == a.session_id
    ));
    assert_eq!(mgr.get_view(room, None).await.unwrap().total, 0);

    mgr.reconnect(&a.reconnect_token, dummy_sender()).await.unwrap();
    mgr.route_message(&a.session_id, "ADD", json!(5)).await.unwrap();
    assert_eq!(mgr.get_view(room, None).await.unwrap().total, 5);
}

#[tokio::test]
async fn test_route_message_not_in_room() {
    let mgr = RoomManager::<Tally>::default();
    let result = mgr
        .route_message(&SessionId::from("nobody"), "ADD", json!(1))
        .await;
    assert!(matches!(result, Err(RoomError::NoRoom(_))));
}

// =========================================================================
// Lock acquisition
// =========================================================================

#[tokio::test]
async fn test_lock_acquired_runs_after_handler() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    settle().await;
    drain(&mut rx);

    mgr.route_message(&a.session_id, "SEAL", json!(null)).await.unwrap();
    settle().await;

    assert_eq!(events(&drain(&mut rx)), vec![TallyEvent::Sealed]);
    assert!(mgr.get_room_info(room).await.unwrap().locked);
}

#[tokio::test]
async fn test_lock_acquired_error_goes_to_requester_and_unlocks() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    settle().await;
    drain(&mut rx);

    mgr.route_message(&a.session_id, "SEAL", json!(null)).await.unwrap();
    settle().await;

    assert_eq!(errors(&drain(&mut rx)), vec![ErrorCode::NotEnoughPlayers]);
    assert!(!mgr.get_room_info(room).await.unwrap().locked);
}

#[tokio::test]
async fn test_lock_acquired_not_starved_by_command_burst() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    settle().await;
    drain(&mut rx);

    // More than the command queue holds, sent without yielding in between.
    mgr.route_message(&a.session_id, "SEAL", json!(null)).await.unwrap();
    for _ in 0..100 {
        mgr.route_message(&a.session_id, "ADD", json!(1)).await.unwrap();
    }
    settle().await;

    let msgs = drain(&mut rx);
    let sealed_at = msgs
        .iter()
        .position(|m| matches!(m, RoomOutbound::Message(TallyEvent::Sealed)))
        .expect("lock hook ran");
    let before = errors(&msgs[..sealed_at]).len();
    assert!(before < 16, "{before} commands ran ahead of the lock hook");
    assert_eq!(errors(&msgs).len(), 100);
}

// =========================================================================
// Reconnection (paused clock)
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_reconnect_within_grace_keeps_seat() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();
    assert_eq!(mgr.get_room_info(room).await.unwrap().client_count, 2);

    tokio::time::sleep(Duration::from_secs(20)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let resumed = mgr.reconnect(&a.reconnect_token, tx).await.unwrap();
    settle().await;

    assert_eq!(resumed, a.session_id);
    assert!(
        drain(&mut rx).iter().any(|m| matches!(m, RoomOutbound::State(_))),
        "reconnected client gets its view"
    );

    // The old timer must not fire after the reconnection.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(mgr.get_view(room, None).await.unwrap().seats, 2);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_after_grace_is_refused() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(31)).await;

    let result = mgr.reconnect(&a.reconnect_token, dummy_sender()).await;

    assert!(matches!(
        result,
        Err(RoomError::Session(SessionError::SessionExpired(_)))
    ));
    assert_eq!(mgr.get_room_info(room).await.unwrap().client_count, 1);
    assert_eq!(mgr.get_view(room, None).await.unwrap().seats, 1);
    assert_eq!(mgr.session_room(&a.session_id), None);
    assert!(mgr.sessions().get(&a.session_id).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_session_lives_as_long_as_held_seat() {
    let mut mgr = RoomManager::<Tally>::new(SessionConfig {
        reconnect_grace_secs: 1,
    });
    let room = mgr.create_room(TallyOptions {
        grace: Some(Duration::from_secs(10)),
        ..TallyOptions::default()
    });
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(mgr.expire_sessions().is_empty());
    let resumed = mgr.reconnect(&a.reconnect_token, dummy_sender()).await.unwrap();
    assert_eq!(resumed, a.session_id);
    assert_eq!(mgr.get_view(room, None).await.unwrap().seats, 2);
}

#[tokio::test(start_paused = true)]
async fn test_session_expires_with_held_seat() {
    let mut mgr = RoomManager::<Tally>::new(SessionConfig {
        reconnect_grace_secs: 3600,
    });
    let room = mgr.create_room(TallyOptions {
        grace: Some(Duration::from_secs(5)),
        ..TallyOptions::default()
    });
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(mgr.expire_sessions(), vec![a.session_id.clone()]);
    assert_eq!(mgr.session_room(&a.session_id), None);
    let resumed = mgr.reconnect(&a.reconnect_token, dummy_sender()).await;
    assert!(matches!(resumed, Err(RoomError::Session(SessionError::InvalidToken))));
}

#[tokio::test(start_paused = true)]
async fn test_custom_grace_period_is_honored() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions {
        grace: Some(Duration::from_secs(5)),
        ..TallyOptions::default()
    });
    let a = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    mgr.join_room(room, opts(), dummy_sender()).await.unwrap();

    mgr.leave_room(&a.session_id, false).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(mgr.get_room_info(room).await.unwrap().client_count, 1);
}

#[tokio::test]
async fn test_reconnect_invalid_token() {
    let mut mgr = RoomManager::<Tally>::default();
    let result = mgr.reconnect("bogus", dummy_sender()).await;
    assert!(matches!(result, Err(RoomError::Session(_))));
}

#[tokio::test]
async fn test_leave_stops_receiving() {
    let mut mgr = RoomManager::<Tally>::default();
    let room = mgr.create_room(TallyOptions::default());
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let a = mgr.join_room(room, opts(), tx1).await.unwrap();
    let b = mgr.join_room(room, opts(), dummy_sender()).await.unwrap();
    settle().await;
    drain(&mut rx1);

    mgr.leave_room(&a.session_id, false).await.unwrap();
    mgr.route_message(&b.session_id, "ADD", json!(1)).await.unwrap();
    settle().await;

    assert!(rx1.try_recv().is_err(), "held seat has no live sender");
}
