//! Error types for the protocol layer.
//!
//! Each crate in Tileforge defines its own error enum. A `ProtocolError`
//! always means "the client sent something we could not accept as-is",
//! never a networking or room-management problem.

/// Errors that can occur while turning a message body into a typed payload.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The body did not have the expected shape (missing fields, wrong
    /// JSON types, unknown fields on a strict payload).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The body decoded, but the payload predicate rejected it.
    ///
    /// The string is the Rust type name of the expected payload, which is
    /// enough to tell which guard fired when reading logs.
    #[error("invalid payload: expected a valid {0}")]
    InvalidPayload(&'static str),
}
