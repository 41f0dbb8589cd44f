//! Per-room message routing.
//!
//! A [`MessageRouter`] maps a message type to a handler. Typed handlers are
//! registered together with a [`PayloadGuard`]; the guard runs first and a
//! body it rejects never reaches the handler. A catch-all handler covers
//! every unregistered type. Each dispatch runs inside a log boundary.

use std::collections::HashMap;

use serde_json::Value;
use tileforge_protocol::{ErrorCode, PayloadGuard, ProtocolError, SessionId};

use crate::lifecycle::{room_label, with_boundary};
use crate::{RoomBehavior, RoomContext};

enum Rejection<E> {
    Payload(ProtocolError),
    Handler(E),
}

type Handler<B> = Box<
    dyn Fn(
            &mut B,
            &mut RoomContext<B>,
            &SessionId,
            Value,
        ) -> Result<(), Rejection<<B as RoomBehavior>::Error>>
        + Send
        + Sync,
>;

type Fallback<B> = Box<
    dyn Fn(&mut B, &mut RoomContext<B>, &SessionId, &str) -> Result<(), <B as RoomBehavior>::Error>
        + Send
        + Sync,
>;

pub struct MessageRouter<B: RoomBehavior> {
    handlers: HashMap<&'static str, Handler<B>>,
    fallback: Option<Fallback<B>>,
}

impl<B: RoomBehavior> MessageRouter<B> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers a handler whose payload is narrowed by `guard`.
    pub fn on<T, F>(mut self, message_type: &'static str, guard: PayloadGuard<T>, handler: F) -> Self
    where
        T: 'static,
        F: Fn(&mut B, &mut RoomContext<B>, &SessionId, T) -> Result<(), B::Error>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.insert(
            message_type,
            Box::new(
                move |behavior: &mut B, ctx: &mut RoomContext<B>, client: &SessionId, body: Value| {
                    let payload = guard(body).map_err(Rejection::Payload)?;
                    handler(behavior, ctx, client, payload).map_err(Rejection::Handler)
                },
            ),
        );
        self
    }

    /// Registers a handler for a message that carries no payload. Any body
    /// sent along is ignored.
    pub fn on_unit<F>(mut self, message_type: &'static str, handler: F) -> Self
    where
        F: Fn(&mut B, &mut RoomContext<B>, &SessionId) -> Result<(), B::Error>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.insert(
            message_type,
            Box::new(
                move |behavior: &mut B, ctx: &mut RoomContext<B>, client: &SessionId, _body: Value| {
                    handler(behavior, ctx, client).map_err(Rejection::Handler)
                },
            ),
        );
        self
    }

    /// Registers the catch-all handler. It receives the unknown type.
    pub fn on_any<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut B, &mut RoomContext<B>, &SessionId, &str) -> Result<(), B::Error>
            + Send
            + Sync
            + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Routes one message. Failures are reported to `client` through the
    /// context; nothing here can take the room down.
    pub fn dispatch(
        &self,
        behavior: &mut B,
        ctx: &mut RoomContext<B>,
        client: &SessionId,
        message_type: &str,
        body: Value,
    ) {
        let room_id = ctx.room_id();
        let label = format!("{client} -({message_type})-> {}", room_label(room_id, B::name()));

        with_boundary(room_id, &label, || {
            let result = match self.handlers.get(message_type) {
                Some(handler) => handler(behavior, ctx, client, body),
                None => match &self.fallback {
                    Some(fallback) => {
                        fallback(behavior, ctx, client, message_type).map_err(Rejection::Handler)
                    }
                    None => {
                        tracing::warn!(%client, message_type, "no handler for message type");
                        ctx.send_error(client, ErrorCode::InvalidAction);
                        Ok(())
                    }
                },
            };

            match result {
                Ok(()) => {}
                Err(Rejection::Payload(err)) => {
                    tracing::warn!(%client, message_type, error = %err, "payload rejected");
                    ctx.send_error(client, ErrorCode::InvalidAction);
                }
                Err(Rejection::Handler(err)) => {
                    tracing::error!(%client, message_type, error = %err, "message rejected");
                    ctx.send_error(client, err.into());
                }
            }
        });
    }
}

impl<B: RoomBehavior> Default for MessageRouter<B> {
    fn default() -> Self {
        Self::new()
    }
}
