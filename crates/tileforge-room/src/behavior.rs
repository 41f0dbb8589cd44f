//! The `RoomBehavior` trait: what a game plugs into a room.
//!
//! The room actor owns the plumbing (membership, delivery, timers, the
//! lock). A behavior owns the game. The actor calls the hooks below, one at
//! a time and each inside a log boundary; the behavior answers by mutating
//! itself and writing to the [`RoomContext`].

use std::fmt;

use serde::Serialize;
use tileforge_protocol::{ErrorCode, JoinOptions, SessionId};

use crate::{MessageRouter, RoomConfig, RoomContext};

/// Game logic hosted by a room.
///
/// # Example
///
/// ```rust,ignore
/// impl RoomBehavior for MyGame {
///     type Options = ();
///     type Error = MyError;
///     type View = MyView;
///     type ServerMessage = MyEvent;
///
///     fn create(_: &()) -> Self { MyGame::default() }
///     fn name() -> &'static str { "my-game" }
///     fn routes() -> MessageRouter<Self> {
///         MessageRouter::new().on_unit("PING", |game, ctx, client| { ... })
///     }
///     // ...
/// }
/// ```
pub trait RoomBehavior: Sized + Send + 'static {
    /// Options given to `RoomManager::create_room`.
    type Options: Clone + Default + Send + 'static;

    /// Handler failures. Each one becomes an [`ErrorCode`] sent to the
    /// client that caused it.
    type Error: Into<ErrorCode> + fmt::Display + Send;

    /// The per-client state view pushed after every event.
    type View: Serialize + Clone + fmt::Debug + Send + 'static;

    /// Events the behavior broadcasts or sends to single clients.
    type ServerMessage: Serialize + Clone + fmt::Debug + Send + 'static;

    fn create(options: &Self::Options) -> Self;

    /// Room name used in log labels and room info.
    fn name() -> &'static str;

    /// Message handlers, built once per room.
    fn routes() -> MessageRouter<Self>;

    fn room_config(_options: &Self::Options) -> RoomConfig {
        RoomConfig::default()
    }

    fn on_create(&mut self, _ctx: &mut RoomContext<Self>) {}

    /// A client took a seat.
    fn on_join(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId, options: &JoinOptions);

    /// A client left. `consented` is false for an abrupt drop; the behavior
    /// may then call [`RoomContext::allow_reconnection`] to hold the seat.
    fn on_leave(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId, consented: bool);

    /// A held seat was reclaimed in time.
    fn on_reconnect(&mut self, _ctx: &mut RoomContext<Self>, _client: &SessionId) {}

    /// A held seat's grace period ran out. The seat is already gone from
    /// the room when this runs.
    fn on_reconnection_expired(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId);

    /// The lock requested through [`RoomContext::lock`] has been acquired.
    /// An error is sent to `requester`.
    fn on_lock_acquired(
        &mut self,
        _ctx: &mut RoomContext<Self>,
        _requester: &SessionId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_dispose(&mut self, _ctx: &mut RoomContext<Self>) {}

    /// The state as seen by `viewer` (`None` for an outside observer).
    fn view_for(&self, viewer: Option<&SessionId>) -> Self::View;
}
