//! The rule-rejection taxonomy.

use nocturne_protocol::{ErrorKind, Phase, RoomCode};

/// Why an inbound message was rejected.
///
/// Every variant is recoverable: the error is reported to the sender
/// only, and the room's state is left exactly as it was. The one
/// exception is [`RuleError::Internal`], which signals a programming
/// defect — the room freezes rather than risk emitting a wrong result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// No room is registered under this code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// The room exists but is no longer accepting joins.
    #[error("the game has already started")]
    GameAlreadyStarted,

    /// Another seat in the room already uses this display name
    /// (case-sensitive).
    #[error("the name {0:?} is already taken in this room")]
    DuplicateName(String),

    /// The sender does not hold a seat in any room.
    #[error("you are not in a room")]
    NotInRoom,

    /// A lobby-management request from someone other than the host.
    #[error("only the host can do that")]
    NotHost,

    /// Too few players for the configured quota (at least one villager
    /// must remain).
    #[error("not enough players: need at least {required}, have {actual}")]
    InsufficientPlayers { required: usize, actual: usize },

    /// The message is not valid in the room's current phase.
    #[error("not available in the {0} phase")]
    WrongPhase(Phase),

    /// The sender's role cannot perform this action.
    #[error("your role cannot perform that action")]
    WrongRole,

    /// Dead players do not act.
    #[error("you are no longer among the living")]
    NotAlive,

    /// One night action per round.
    #[error("you have already acted tonight")]
    AlreadyActed,

    /// One vote per round.
    #[error("you have already voted")]
    AlreadyVoted,

    /// The named target is unknown, dead, or the sender themselves.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The action needs a target and none was given.
    #[error("a target is required")]
    TargetRequired,

    /// An internal invariant was violated. Not the sender's fault; the
    /// room is frozen and the defect is logged.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RuleError {
    /// The wire-level tag for this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound(_) => ErrorKind::RoomNotFound,
            Self::GameAlreadyStarted => ErrorKind::GameAlreadyStarted,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::NotInRoom => ErrorKind::NotInRoom,
            Self::NotHost => ErrorKind::NotHost,
            Self::InsufficientPlayers { .. } => ErrorKind::InsufficientPlayers,
            Self::WrongPhase(_) => ErrorKind::WrongPhase,
            Self::WrongRole => ErrorKind::WrongRole,
            Self::NotAlive => ErrorKind::NotAlive,
            Self::AlreadyActed => ErrorKind::AlreadyActed,
            Self::AlreadyVoted => ErrorKind::AlreadyVoted,
            Self::InvalidTarget(_) => ErrorKind::InvalidTarget,
            Self::TargetRequired => ErrorKind::TargetRequired,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
