//! Room actor: an isolated Tokio task that owns one behavior instance.
//!
//! Each room runs in its own task and talks to the outside world through an
//! mpsc channel. Timers and lock acquisition come back in on a second,
//! internal channel, so the actor handles exactly one event at a time and
//! nothing else ever touches the behavior.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use tileforge_protocol::{ErrorCode, JoinOptions, Recipient, RoomId, SessionId};

use crate::context::Deferred;
use crate::lifecycle::{room_label, with_boundary};
use crate::{MessageRouter, RoomBehavior, RoomConfig, RoomContext, RoomError};

/// An outbound message from the room actor to one client.
pub enum RoomOutbound<B: RoomBehavior> {
    /// The client's own view of the room state.
    State(B::View),
    /// An event produced by the behavior.
    Message(B::ServerMessage),
    /// A rejected action.
    Error(ErrorCode),
}

impl<B: RoomBehavior> Clone for RoomOutbound<B> {
    fn clone(&self) -> Self {
        match self {
            Self::State(view) => Self::State(view.clone()),
            Self::Message(message) => Self::Message(message.clone()),
            Self::Error(code) => Self::Error(*code),
        }
    }
}

impl<B: RoomBehavior> fmt::Debug for RoomOutbound<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(view) => f.debug_tuple("State").field(view).finish(),
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Error(code) => f.debug_tuple("Error").field(code).finish(),
        }
    }
}

/// Channel sender for delivering outbound messages to a client.
pub type ClientSender<B> = mpsc::UnboundedSender<RoomOutbound<B>>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand<B: RoomBehavior> {
    Join {
        client: SessionId,
        options: JoinOptions,
        sender: ClientSender<B>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        client: SessionId,
        consented: bool,
        reply: oneshot::Sender<Result<Option<Instant>, RoomError>>,
    },
    Reconnect {
        client: SessionId,
        sender: ClientSender<B>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Message {
        client: SessionId,
        message_type: String,
        body: Value,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    GetView {
        viewer: Option<SessionId>,
        reply: oneshot::Sender<B::View>,
    },
    Shutdown,
}

/// Events the actor posts to itself.
enum Internal {
    LockAcquired { requester: SessionId },
    ReconnectionExpired { client: SessionId, deadline: Instant },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub room_name: String,
    /// Seats in use, including seats held for reconnection.
    pub client_count: usize,
    pub max_clients: usize,
    pub locked: bool,
}

/// Handle to a running room actor. Cheap to clone.
pub struct RoomHandle<B: RoomBehavior> {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand<B>>,
}

impl<B: RoomBehavior> Clone for RoomHandle<B> {
    fn clone(&self) -> Self {
        Self {
            room_id: self.room_id,
            sender: self.sender.clone(),
        }
    }
}

impl<B: RoomBehavior> RoomHandle<B> {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// `true` once the actor has stopped (disposed or shut down).
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand<B>,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn join(
        &self,
        client: SessionId,
        options: JoinOptions,
        sender: ClientSender<B>,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Join {
            client,
            options,
            sender,
            reply,
        })
        .await?
    }

    /// Takes `client` out of the room. Returns the deadline of the seat if
    /// the room holds it for a reconnection, `None` if the seat is gone.
    pub async fn leave(
        &self,
        client: SessionId,
        consented: bool,
    ) -> Result<Option<Instant>, RoomError> {
        self.request(|reply| RoomCommand::Leave {
            client,
            consented,
            reply,
        })
        .await?
    }

    /// Reclaims a held seat with a fresh outbound channel.
    pub async fn reconnect(
        &self,
        client: SessionId,
        sender: ClientSender<B>,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Reconnect {
            client,
            sender,
            reply,
        })
        .await?
    }

    /// Sends a client message to the room (fire-and-forget).
    pub async fn send_message(
        &self,
        client: SessionId,
        message_type: impl Into<String>,
        body: Value,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Message {
                client,
                message_type: message_type.into(),
                body,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// The room state as `viewer` sees it.
    pub async fn get_view(&self, viewer: Option<SessionId>) -> Result<B::View, RoomError> {
        self.request(|reply| RoomCommand::GetView { viewer, reply })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// A seat in the room.
struct Member<B: RoomBehavior> {
    /// `None` while the client is disconnected.
    sender: Option<ClientSender<B>>,
    reconnection: Option<PendingReconnection>,
}

struct PendingReconnection {
    deadline: Instant,
    timer: JoinHandle<()>,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<B: RoomBehavior> {
    room_id: RoomId,
    label: String,
    behavior: B,
    router: MessageRouter<B>,
    ctx: RoomContext<B>,
    members: HashMap<SessionId, Member<B>>,
    receiver: mpsc::Receiver<RoomCommand<B>>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    /// Commands handled since the last internal event.
    command_streak: usize,
}

/// At most this many commands run back to back while an internal event
/// is waiting.
const COMMAND_BATCH: usize = 16;

impl<B: RoomBehavior> RoomActor<B> {
    /// Runs the actor loop until the room is disposed or every handle is
    /// dropped.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        let label = format!("CREATE {}", self.label);
        with_boundary(self.room_id, &label, || self.behavior.on_create(&mut self.ctx));
        self.flush();

        loop {
            // External commands first, but a queued lock or timer event
            // never waits behind more than COMMAND_BATCH of them.
            if self.command_streak >= COMMAND_BATCH {
                self.command_streak = 0;
                if let Ok(event) = self.internal_rx.try_recv() {
                    if !self.handle_internal(event) {
                        break;
                    }
                    continue;
                }
            }
            let keep_running = tokio::select! {
                biased;
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        self.command_streak += 1;
                        self.handle_command(cmd)
                    }
                    None => false,
                },
                Some(event) = self.internal_rx.recv() => {
                    self.command_streak = 0;
                    self.handle_internal(event)
                }
            };
            if !keep_running {
                break;
            }
        }

        self.dispose();
        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    /// Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand<B>) -> bool {
        match cmd {
            RoomCommand::Join {
                client,
                options,
                sender,
                reply,
            } => {
                let result = self.handle_join(client, options, sender);
                let _ = reply.send(result);
                true
            }
            RoomCommand::Leave {
                client,
                consented,
                reply,
            } => {
                let result = self.handle_leave(client, consented);
                let _ = reply.send(result);
                !self.should_dispose()
            }
            RoomCommand::Reconnect {
                client,
                sender,
                reply,
            } => {
                let result = self.handle_reconnect(client, sender);
                let _ = reply.send(result);
                true
            }
            RoomCommand::Message {
                client,
                message_type,
                body,
            } => {
                self.handle_message(client, &message_type, body);
                true
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
                true
            }
            RoomCommand::GetView { viewer, reply } => {
                let _ = reply.send(self.behavior.view_for(viewer.as_ref()));
                true
            }
            RoomCommand::Shutdown => {
                tracing::info!(room_id = %self.room_id, "room shutting down");
                false
            }
        }
    }

    fn handle_internal(&mut self, event: Internal) -> bool {
        match event {
            Internal::LockAcquired { requester } => {
                let label = format!("LOCK {}", self.label);
                with_boundary(self.room_id, &label, || {
                    if let Err(err) = self.behavior.on_lock_acquired(&mut self.ctx, &requester) {
                        tracing::warn!(%requester, error = %err, "start aborted after lock");
                        self.ctx.send_error(&requester, err.into());
                    }
                });
                self.flush();
                true
            }
            Internal::ReconnectionExpired { client, deadline } => {
                self.handle_reconnection_expired(client, deadline);
                !self.should_dispose()
            }
        }
    }

    fn handle_join(
        &mut self,
        client: SessionId,
        options: JoinOptions,
        sender: ClientSender<B>,
    ) -> Result<(), RoomError> {
        if self.ctx.is_locked() {
            return Err(RoomError::Locked(self.room_id));
        }
        if self.members.contains_key(&client) {
            return Err(RoomError::AlreadyInRoom(client, self.room_id));
        }
        if self.members.len() >= self.ctx.config().max_clients {
            return Err(RoomError::RoomFull(self.room_id));
        }

        self.members.insert(
            client.clone(),
            Member {
                sender: Some(sender),
                reconnection: None,
            },
        );
        tracing::info!(
            room_id = %self.room_id,
            %client,
            clients = self.members.len(),
            "client joined"
        );

        let label = format!("{client} JOIN {}", self.label);
        with_boundary(self.room_id, &label, || {
            self.behavior.on_join(&mut self.ctx, &client, &options)
        });
        self.flush();
        Ok(())
    }

    fn handle_leave(
        &mut self,
        client: SessionId,
        consented: bool,
    ) -> Result<Option<Instant>, RoomError> {
        let Some(member) = self.members.get_mut(&client) else {
            return Err(RoomError::NotInRoom(client, self.room_id));
        };
        member.sender = None;
        if let Some(pending) = member.reconnection.take() {
            // Leaving again while already held: the earlier hold is void.
            pending.timer.abort();
        }

        let label = format!("{client} LEAVE {}", self.label);
        with_boundary(self.room_id, &label, || {
            self.behavior.on_leave(&mut self.ctx, &client, consented)
        });

        self.schedule_deferred();
        let held = self
            .members
            .get(&client)
            .and_then(|member| member.reconnection.as_ref())
            .map(|pending| pending.deadline);
        if held.is_some() {
            tracing::info!(room_id = %self.room_id, %client, "seat held for reconnection");
        } else {
            self.members.remove(&client);
            tracing::info!(
                room_id = %self.room_id,
                %client,
                clients = self.members.len(),
                "client left"
            );
        }

        self.deliver_outbox();
        self.push_views();
        Ok(held)
    }

    fn handle_reconnect(
        &mut self,
        client: SessionId,
        sender: ClientSender<B>,
    ) -> Result<(), RoomError> {
        let member = self
            .members
            .get_mut(&client)
            .ok_or_else(|| RoomError::ReconnectionUnavailable(client.clone()))?;
        let in_time = member
            .reconnection
            .as_ref()
            .is_some_and(|pending| Instant::now() < pending.deadline);
        if !in_time {
            return Err(RoomError::ReconnectionUnavailable(client));
        }

        if let Some(pending) = member.reconnection.take() {
            pending.timer.abort();
        }
        member.sender = Some(sender);

        let label = format!("{client} RECONNECT {}", self.label);
        with_boundary(self.room_id, &label, || {
            self.behavior.on_reconnect(&mut self.ctx, &client)
        });
        self.flush();
        Ok(())
    }

    fn handle_reconnection_expired(&mut self, client: SessionId, deadline: Instant) {
        let current = self
            .members
            .get(&client)
            .and_then(|member| member.reconnection.as_ref())
            .is_some_and(|pending| pending.deadline == deadline);
        if !current {
            tracing::debug!(room_id = %self.room_id, %client, "stale reconnection timer ignored");
            return;
        }

        self.members.remove(&client);
        tracing::info!(room_id = %self.room_id, %client, "reconnection window expired");

        let label = format!("{client} EXPIRE {}", self.label);
        with_boundary(self.room_id, &label, || {
            self.behavior.on_reconnection_expired(&mut self.ctx, &client)
        });
        self.flush();
    }

    fn handle_message(&mut self, client: SessionId, message_type: &str, body: Value) {
        if !self.members.contains_key(&client) {
            tracing::warn!(
                room_id = %self.room_id,
                %client,
                message_type,
                "message from non-member, ignoring"
            );
            return;
        }

        self.router
            .dispatch(&mut self.behavior, &mut self.ctx, &client, message_type, body);
        self.flush();
    }

    /// Carries out everything the last hook queued, then pushes views.
    fn flush(&mut self) {
        self.schedule_deferred();
        self.deliver_outbox();
        self.push_views();
    }

    fn schedule_deferred(&mut self) {
        for deferred in self.ctx.take_deferred() {
            match deferred {
                Deferred::LockAcquired { requester } => {
                    let _ = self.internal_tx.send(Internal::LockAcquired { requester });
                }
                Deferred::AwaitReconnection { client, deadline } => {
                    self.arm_reconnection(client, deadline);
                }
            }
        }
    }

    fn arm_reconnection(&mut self, client: SessionId, deadline: Instant) {
        let Some(member) = self.members.get_mut(&client) else {
            tracing::debug!(room_id = %self.room_id, %client, "reconnection requested for unknown seat");
            return;
        };

        let internal_tx = self.internal_tx.clone();
        let timer_client = client.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = internal_tx.send(Internal::ReconnectionExpired {
                client: timer_client,
                deadline,
            });
        });

        if let Some(previous) = member.reconnection.replace(PendingReconnection { deadline, timer }) {
            previous.timer.abort();
        }
    }

    fn deliver_outbox(&mut self) {
        for (recipient, outbound) in self.ctx.drain_outbox() {
            match recipient {
                Recipient::All => {
                    for client in self.members.keys() {
                        self.send_to(client, outbound.clone());
                    }
                }
                Recipient::Client(client) => self.send_to(&client, outbound),
            }
        }
    }

    /// Sends every connected client its own view.
    fn push_views(&self) {
        for client in self.members.keys() {
            self.send_to(client, RoomOutbound::State(self.behavior.view_for(Some(client))));
        }
    }

    /// Drops the message if the client is disconnected or its receiver is
    /// gone.
    fn send_to(&self, client: &SessionId, outbound: RoomOutbound<B>) {
        if let Some(sender) = self.members.get(client).and_then(|m| m.sender.as_ref()) {
            if sender.send(outbound).is_err() {
                tracing::debug!(room_id = %self.room_id, %client, "client receiver dropped");
            }
        }
    }

    fn should_dispose(&self) -> bool {
        self.ctx.config().auto_dispose && self.members.is_empty()
    }

    fn dispose(&mut self) {
        for member in self.members.values_mut() {
            if let Some(pending) = member.reconnection.take() {
                pending.timer.abort();
            }
        }

        let label = format!("DISPOSE {}", self.label);
        with_boundary(self.room_id, &label, || self.behavior.on_dispose(&mut self.ctx));
        self.deliver_outbox();
        self.ctx.take_deferred();
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            room_name: B::name().to_string(),
            client_count: self.members.len(),
            max_clients: self.ctx.config().max_clients,
            locked: self.ctx.is_locked(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room<B: RoomBehavior>(
    room_id: RoomId,
    options: &B::Options,
    config: RoomConfig,
    channel_size: usize,
) -> RoomHandle<B> {
    let (tx, rx) = mpsc::channel(channel_size);
    let (internal_tx, internal_rx) = mpsc::unbounded_channel();

    let actor = RoomActor::<B> {
        room_id,
        label: room_label(room_id, B::name()),
        behavior: B::create(options),
        router: B::routes(),
        ctx: RoomContext::new(room_id, config),
        members: HashMap::new(),
        receiver: rx,
        internal_tx,
        internal_rx,
        command_streak: 0,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
