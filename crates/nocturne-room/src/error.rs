//! Error types for the room layer.

use nocturne_engine::RuleError;
use nocturne_protocol::{ErrorKind, PlayerHandle, RoomCode};

/// Errors that can occur during registry and actor operations.
///
/// Game-rule rejections pass through as [`RuleError`]; the remaining
/// variants are registry bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A rule rejection produced by the engine.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A handle can hold a seat in at most one room at a time.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerHandle, RoomCode),

    /// The room's command channel is closed or full — the actor is
    /// gone or wedged.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl RoomError {
    /// The wire-level tag reported to the sender.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rule(err) => err.kind(),
            Self::AlreadyInRoom(..) => ErrorKind::AlreadyInRoom,
            Self::Unavailable(_) => ErrorKind::Internal,
        }
    }
}
