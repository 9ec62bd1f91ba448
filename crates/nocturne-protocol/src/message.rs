//! The two message enums that travel on the wire, plus the rule-rejection
//! taxonomy reported to clients.
//!
//! Both enums are internally tagged (`{"type": "...", ...}`) with
//! snake_case tags, so a `cast_vote` message looks like:
//!
//! ```json
//! { "type": "cast_vote", "target": "alice" }
//! ```
//!
//! Targets are display names, not handles: a client only ever sees the
//! names in its room snapshot, and names are unique within a room.

use serde::{Deserialize, Serialize};

use crate::types::{
    FinalSeat, Phase, Role, RoleQuota, RoomCode, RoomSnapshot, Winner,
};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// The kind of night action a client is submitting. Must match the
/// sender's role (`kill` ↔ Killer, `investigate` ↔ Seer, `protect` ↔
/// Guardian) or the submission is rejected with `wrong_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightActionKind {
    Kill,
    Investigate,
    Protect,
}

/// Everything a client can send.
///
/// `create_room`, `join_room`, and `leave_room` are handled by the
/// session registry; the rest are routed to the sender's room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a fresh room with the sender as host.
    CreateRoom { host_name: String },
    /// Take a seat in an existing room.
    JoinRoom { code: RoomCode, name: String },
    /// Host only, lobby only: change the special-role counts.
    UpdateQuota { quota: RoleQuota },
    /// Host only: deal roles and enter the first night.
    StartGame,
    /// Submit this round's night action.
    NightAction {
        action: NightActionKind,
        target: String,
    },
    /// Host only, day only: open the vote.
    StartVoting,
    /// Cast this round's vote.
    CastVote { target: String },
    /// Say something to the room.
    Chat { text: String },
    /// Give up the seat (lobby) or disconnect from the game.
    LeaveRoom,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// One row of a published vote tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub name: String,
    pub votes: u32,
}

/// Everything the server can emit.
///
/// Which players receive an event is decided by the engine via
/// [`Recipient`](crate::Recipient); the event itself never carries
/// addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// To the host, after `create_room` succeeds.
    RoomCreated {
        code: RoomCode,
        snapshot: RoomSnapshot,
    },
    /// Broadcast whenever the lobby roster or quota changes.
    RoomUpdated { snapshot: RoomSnapshot },
    /// Broadcast when the host abandons the lobby; the room is gone.
    RoomClosed,
    /// Private: the recipient's own role, and nobody else's.
    RoleAssigned { role: Role },
    /// Broadcast on every phase transition. `narrative` carries the
    /// night outcome when entering Day.
    PhaseChange {
        phase: Phase,
        round: u32,
        narrative: Option<String>,
    },
    /// To the sender: night action accepted.
    ActionConfirmed,
    /// Private to the Seer: the true answer, delivered every round the
    /// Seer investigates, regardless of deaths or protection.
    InvestigationResult { target: String, is_killer: bool },
    /// To the sender: vote accepted.
    VoteConfirmed,
    /// Broadcast after each accepted vote while the round is incomplete.
    VoteProgress { cast: usize, expected: usize },
    /// Broadcast when the vote resolves: full tally plus narrative.
    /// Unlike night deaths, a vote elimination reveals the role.
    VotingResult {
        tally: Vec<VoteCount>,
        narrative: String,
    },
    /// Private to a player who just died: their own role, for the
    /// spectator view.
    PlayerDied { role: Role },
    /// Broadcast once, when a win condition is met. The roster reveals
    /// every role.
    GameOver {
        winner: Winner,
        roster: Vec<FinalSeat>,
    },
    /// Broadcast when a seat is given up in the lobby.
    PlayerLeft { name: String, count: usize },
    /// Broadcast when a connection drops mid-game; the seat stays.
    PlayerDisconnected { name: String },
    /// A relayed chat line.
    Chat {
        from: String,
        text: String,
        alive: bool,
    },
    /// To the sender only: the message was rejected. Room state is
    /// unchanged.
    Error { kind: ErrorKind, message: String },
}

// ---------------------------------------------------------------------------
// Rule-rejection taxonomy
// ---------------------------------------------------------------------------

/// Machine-readable rejection kinds, mirrored from the engine's
/// `RuleError`. Every kind is recoverable and reported only to the
/// sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RoomNotFound,
    GameAlreadyStarted,
    DuplicateName,
    NotInRoom,
    AlreadyInRoom,
    NotHost,
    InsufficientPlayers,
    WrongPhase,
    WrongRole,
    NotAlive,
    AlreadyActed,
    AlreadyVoted,
    InvalidTarget,
    TargetRequired,
    Internal,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is load-bearing: a client SDK parses these exact
    //! JSON shapes. These tests pin the serde attributes down.

    use super::*;
    use crate::types::{RoleQuota, SeatSummary};

    #[test]
    fn test_client_message_is_internally_tagged() {
        let msg = ClientMessage::JoinRoom {
            code: RoomCode::new("AB12CD"),
            name: "alice".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "join_room");
        assert_eq!(json["code"], "AB12CD");
        assert_eq!(json["name"], "alice");
    }

    #[test]
    fn test_unit_variant_has_only_a_tag() {
        let json = serde_json::to_string(&ClientMessage::StartGame).unwrap();
        assert_eq!(json, r#"{"type":"start_game"}"#);
    }

    #[test]
    fn test_night_action_wire_shape() {
        let msg = ClientMessage::NightAction {
            action: NightActionKind::Investigate,
            target: "bob".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "night_action");
        assert_eq!(json["action"], "investigate");
        assert_eq!(json["target"], "bob");
    }

    #[test]
    fn test_update_quota_round_trip() {
        let msg = ClientMessage::UpdateQuota {
            quota: RoleQuota { killer: 2, seer: 1, guardian: 0 },
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ClientMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_phase_change_wire_shape() {
        let event = ServerEvent::PhaseChange {
            phase: Phase::Day,
            round: 2,
            narrative: Some("No one died.".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_change");
        assert_eq!(json["phase"], "day");
        assert_eq!(json["round"], 2);
        assert_eq!(json["narrative"], "No one died.");
    }

    #[test]
    fn test_role_assigned_is_private_shaped() {
        let event = ServerEvent::RoleAssigned { role: Role::Seer };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "role_assigned");
        assert_eq!(json["role"], "seer");
    }

    #[test]
    fn test_game_over_reveals_roster() {
        let event = ServerEvent::GameOver {
            winner: Winner::Town,
            roster: vec![FinalSeat {
                name: "alice".into(),
                role: Role::Killer,
                alive: false,
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game_over");
        assert_eq!(json["winner"], "town");
        assert_eq!(json["roster"][0]["role"], "killer");
    }

    #[test]
    fn test_error_event_wire_shape() {
        let event = ServerEvent::Error {
            kind: ErrorKind::WrongPhase,
            message: "not available in the Day phase".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["kind"], "wrong_phase");
    }

    #[test]
    fn test_voting_result_round_trip() {
        let event = ServerEvent::VotingResult {
            tally: vec![
                VoteCount { name: "bob".into(), votes: 2 },
                VoteCount { name: "carol".into(), votes: 1 },
            ],
            narrative: "bob was eliminated.".into(),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_room_updated_round_trip() {
        let event = ServerEvent::RoomUpdated {
            snapshot: RoomSnapshot {
                code: RoomCode::new("ZZ00ZZ"),
                phase: Phase::Lobby,
                round: 0,
                quota: RoleQuota::default(),
                players: vec![SeatSummary {
                    name: "host".into(),
                    is_host: true,
                    alive: true,
                    connected: true,
                }],
            },
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_unknown_type_tag_fails() {
        let unknown = r#"{"type": "fly_to_moon", "speed": 9000}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<ClientMessage, _> =
            serde_json::from_slice(b"not json at all");
        assert!(result.is_err());
    }
}
