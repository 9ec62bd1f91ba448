//! Error types for the protocol layer.
//!
//! Each crate in Nocturne defines its own error enum. A `ProtocolError`
//! always means the problem is in serialization or message shape, never
//! in game rules or networking.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    /// Common causes: malformed JSON, missing fields, wrong types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message passed deserialization but is invalid at the protocol
    /// level — e.g. an empty display name on `create_room`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
