//! The payload guard: the single boundary between untyped client input and
//! typed game logic.
//!
//! A guard is built from a predicate over the expected payload type. Running
//! it on a message body first checks the *shape* (serde decoding into `T`)
//! and then the *content* (the predicate). Either failure is a
//! [`ProtocolError`] and the handler never sees the message.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{PlayHandPayload, ProtocolError, ReadyPayload};

/// A boxed payload parser, as stored by message routers.
pub type PayloadGuard<T> = Box<dyn Fn(Value) -> Result<T, ProtocolError> + Send + Sync>;

/// Wraps `predicate` into a parser that narrows a message body to `T`.
///
/// # Example
///
/// ```rust
/// use tileforge_protocol::{check_payload, is_ready_payload};
///
/// let guard = check_payload(is_ready_payload);
/// assert_eq!(guard(serde_json::json!(true)).unwrap(), true);
/// assert!(guard(serde_json::json!("yes")).is_err());
/// ```
pub fn check_payload<T, P>(predicate: P) -> PayloadGuard<T>
where
    T: DeserializeOwned + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    Box::new(move |body| {
        let payload: T = serde_json::from_value(body).map_err(ProtocolError::Decode)?;
        if !predicate(&payload) {
            return Err(ProtocolError::InvalidPayload(std::any::type_name::<T>()));
        }
        Ok(payload)
    })
}

/// Any boolean is a valid readiness value; the shape check does the work.
pub fn is_ready_payload(_payload: &ReadyPayload) -> bool {
    true
}

/// A hand must contain at least one tile, no tile twice, and no zero tile.
pub fn is_play_hand_payload(payload: &PlayHandPayload) -> bool {
    if payload.tiles.is_empty() {
        return false;
    }
    let mut seen = HashSet::with_capacity(payload.tiles.len());
    payload
        .tiles
        .iter()
        .all(|tile| tile.number > 0 && seen.insert(*tile))
}
