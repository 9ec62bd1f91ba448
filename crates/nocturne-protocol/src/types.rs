//! Shared vocabulary: identities, roles, phases, and room snapshots.
//!
//! Everything here either travels on the wire or is referenced by types
//! that do. Game behavior (who may act when, how votes resolve) lives in
//! `nocturne-engine`; this module only defines the shapes.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// Newtype over `u64` so a handle can't be confused with any other number
/// in a signature. Handles are minted by the front-end, one per
/// connection, and are never reused — a player who drops and reconnects
/// is a new handle. Handles never appear on the wire; clients refer to
/// each other by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerHandle(pub u64);

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A join code identifying one room.
///
/// Six uppercase alphanumeric characters. Codes are case-normalized on
/// construction so `abc123` and `ABC123` address the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a code from raw input, normalizing to uppercase.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The four role variants.
///
/// A closed enum rather than strings: every decision point in the engine
/// matches exhaustively, so adding a role is a compile-time-checked
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Eliminates one player per night.
    Killer,
    /// Learns privately whether one player is a Killer.
    Seer,
    /// Shields one player from the Killer for the night.
    Guardian,
    /// No night action; wins with the town.
    Villager,
}

impl Role {
    /// Returns `true` for roles that act during the night.
    pub fn has_night_action(self) -> bool {
        !matches!(self, Self::Villager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Killer => write!(f, "Killer"),
            Self::Seer => write!(f, "Seer"),
            Self::Guardian => write!(f, "Guardian"),
            Self::Villager => write!(f, "Villager"),
        }
    }
}

/// Special-role counts configured by the host while the room is in the
/// lobby. Villagers are whatever remains after the quota is dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    pub killer: usize,
    pub seer: usize,
    pub guardian: usize,
}

impl RoleQuota {
    /// Total number of special-role seats this quota claims.
    pub fn sum(&self) -> usize {
        self.killer + self.seer + self.guardian
    }
}

impl Default for RoleQuota {
    fn default() -> Self {
        Self {
            killer: 1,
            seer: 1,
            guardian: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// The room's phase state machine.
///
/// ```text
/// Lobby → Night → Day → Voting → Night → … → Ended
/// ```
///
/// - **Lobby**: accepting joins, host may edit the quota.
/// - **Night**: special roles submit private actions.
/// - **Day**: open discussion; host advances to Voting.
/// - **Voting**: every living player casts one vote.
/// - **Ended**: terminal; the final roster has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Night,
    Day,
    Voting,
    Ended,
}

impl Phase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` while a game is being played.
    pub fn in_game(self) -> bool {
        matches!(self, Self::Night | Self::Day | Self::Voting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Night => write!(f, "Night"),
            Self::Day => write!(f, "Day"),
            Self::Voting => write!(f, "Voting"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome of a finished game
// ---------------------------------------------------------------------------

/// Which side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// No living Killer remains.
    Town,
    /// Living Killers equal or outnumber everyone else.
    Killers,
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who receives a server event.
///
/// The engine returns `(Recipient, ServerEvent)` pairs; the room actor
/// delivers each event to the right per-player channel. Role assignments
/// and investigation results go to a single player, everything else is
/// broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player seated in the room.
    All,
    /// One specific player.
    Player(PlayerHandle),
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One roster entry as shown to clients. Roles are deliberately absent —
/// the server never reveals a role except through a private
/// `role_assigned` or the final `game_over` roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub name: String,
    pub is_host: bool,
    pub alive: bool,
    pub connected: bool,
}

/// The public view of a room, sent on every lobby change and on join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub phase: Phase,
    pub round: u32,
    pub quota: RoleQuota,
    pub players: Vec<SeatSummary>,
}

/// One roster entry in the end-of-game reveal, role included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSeat {
    pub name: String,
    pub role: Role,
    pub alive: bool,
}

// =========================================================================
// Tests
// =========================================================================
