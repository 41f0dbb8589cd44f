//! Log boundaries around lifecycle events and messages.
//!
//! Every hook invocation and every routed message runs inside a
//! `boundary` span carrying a fresh short correlation id, bracketed by a
//! `"<label> ::: begin"` / `"<label> ::: end"` pair. Anything the behavior
//! logs in between inherits the span, so one grep for the id pulls out the
//! whole event.

use tileforge_protocol::RoomId;
use tileforge_session::create_random_id;

/// Length of the per-event correlation id.
const LOG_ID_LEN: usize = 6;

/// Runs `f` inside a correlated log boundary and returns its result.
pub fn with_boundary<R>(room_id: RoomId, label: &str, f: impl FnOnce() -> R) -> R {
    let log_id = create_random_id(LOG_ID_LEN);
    let span = tracing::info_span!("boundary", %log_id, %room_id);
    span.in_scope(|| {
        tracing::info!("{label} ::: begin");
        let output = f();
        tracing::info!("{label} ::: end");
        output
    })
}

/// `R-3(tileforge)`: the room part of every boundary label.
pub fn room_label(room_id: RoomId, name: &str) -> String {
    format!("{room_id}({name})")
}
