//! The room aggregate: roster, phase machine, and action buffers.
//!
//! A `GameRoom` is pure state. It consumes one inbound message at a
//! time and returns the events to deliver; the actor shell in
//! `nocturne-room` guarantees serial application, so nothing here needs
//! a lock. A rejected message returns `Err` and leaves the room exactly
//! as it was.

use nocturne_protocol::{
    ClientMessage, NightActionKind, Phase, PlayerHandle, Recipient, Role,
    RoleQuota, RoomCode, RoomSnapshot, ServerEvent, VoteCount, Winner,
};

use crate::night::{self, NightBuffer, NightRecord};
use crate::vote::{self, VoteBuffer};
use crate::{Roster, RuleError, assign, win};

/// Minimum seats to start a game, independent of the quota.
const MIN_PLAYERS: usize = 3;

/// One event and who should receive it.
pub type Outgoing = (Recipient, ServerEvent);

/// What a departure did to the room.
#[derive(Debug)]
pub struct LeaveOutcome {
    /// Events to deliver to the remaining players.
    pub events: Vec<Outgoing>,
    /// `true` when the room should be removed from the registry.
    pub retire: bool,
}

/// One independent game instance.
pub struct GameRoom {
    code: RoomCode,
    /// The first player to join. Sole authority for quota edits,
    /// starting the game, and opening the vote.
    host: Option<PlayerHandle>,
    phase: Phase,
    /// 0 in the lobby, 1 from game start, +1 on each re-entry to Night.
    round: u32,
    quota: RoleQuota,
    roster: Roster,
    /// Acting role → submission; cleared on every Night entry.
    night: NightBuffer,
    /// Voter → target; cleared on every Voting entry.
    votes: VoteBuffer,
    /// Set after an invariant violation; every later message is
    /// rejected rather than risking a wrong result.
    frozen: bool,
}

impl GameRoom {
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            host: None,
            phase: Phase::Lobby,
            round: 0,
            quota: RoleQuota::default(),
            roster: Roster::new(),
            night: NightBuffer::new(),
            votes: VoteBuffer::new(),
            frozen: false,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn seat_count(&self) -> usize {
        self.roster.len()
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            phase: self.phase,
            round: self.round,
            quota: self.quota,
            players: self.roster.summaries(self.host),
        }
    }

    // -----------------------------------------------------------------
    // Seating
    // -----------------------------------------------------------------

    /// Seats a player. The first player becomes host. Re-joining with a
    /// handle that already holds a seat is idempotent: the existing
    /// seat is kept and only the sender gets a fresh snapshot.
    pub fn join(
        &mut self,
        handle: PlayerHandle,
        name: String,
    ) -> Result<Vec<Outgoing>, RuleError> {
        if self.roster.get(handle).is_some() {
            return Ok(vec![(
                Recipient::Player(handle),
                ServerEvent::RoomUpdated { snapshot: self.snapshot() },
            )]);
        }
        if !self.phase.is_joinable() {
            return Err(RuleError::GameAlreadyStarted);
        }
        if self.roster.by_name(&name).is_some() {
            return Err(RuleError::DuplicateName(name));
        }

        let first = self.roster.is_empty();
        self.roster.push(handle, name);

        if first {
            self.host = Some(handle);
            Ok(vec![(
                Recipient::Player(handle),
                ServerEvent::RoomCreated {
                    code: self.code.clone(),
                    snapshot: self.snapshot(),
                },
            )])
        } else {
            Ok(vec![(
                Recipient::All,
                ServerEvent::RoomUpdated { snapshot: self.snapshot() },
            )])
        }
    }

    /// Handles a seat's departure. In the lobby the seat is removed and
    /// the room may retire; once the game has started the seat stays,
    /// only its connection flag drops — and since completion checks
    /// wait on *connected* players only, a departure can complete the
    /// round it left behind.
    pub fn leave(&mut self, handle: PlayerHandle) -> LeaveOutcome {
        let Some(seat) = self.roster.get(handle) else {
            return LeaveOutcome { events: Vec::new(), retire: false };
        };
        let name = seat.name.clone();

        match self.phase {
            Phase::Lobby => {
                self.roster.remove(handle);
                if self.host == Some(handle) {
                    // The host abandoned the lobby; the room goes with them.
                    LeaveOutcome {
                        events: vec![(Recipient::All, ServerEvent::RoomClosed)],
                        retire: true,
                    }
                } else if self.roster.is_empty() {
                    LeaveOutcome { events: Vec::new(), retire: true }
                } else {
                    LeaveOutcome {
                        events: vec![
                            (
                                Recipient::All,
                                ServerEvent::PlayerLeft {
                                    name,
                                    count: self.roster.len(),
                                },
                            ),
                            (
                                Recipient::All,
                                ServerEvent::RoomUpdated {
                                    snapshot: self.snapshot(),
                                },
                            ),
                        ],
                        retire: false,
                    }
                }
            }
            Phase::Ended => {
                if let Some(seat) = self.roster.get_mut(handle) {
                    seat.connected = false;
                }
                // The final results have been delivered; once the last
                // connection detaches the room has no audience left.
                let retire = self.roster.iter().all(|s| !s.connected);
                LeaveOutcome { events: Vec::new(), retire }
            }
            Phase::Night | Phase::Day | Phase::Voting => {
                if let Some(seat) = self.roster.get_mut(handle) {
                    seat.connected = false;
                }
                let mut events = vec![(
                    Recipient::All,
                    ServerEvent::PlayerDisconnected { name },
                )];
                if !self.frozen {
                    self.maybe_resolve_night(&mut events);
                    self.maybe_resolve_voting(&mut events);
                }
                let retire = self.roster.iter().all(|s| !s.connected);
                LeaveOutcome { events, retire }
            }
        }
    }

    // -----------------------------------------------------------------
    // Message dispatch
    // -----------------------------------------------------------------

    /// Applies one inbound message. On `Err` the room is untouched and
    /// the caller reports the rejection to the sender only.
    pub fn handle_message(
        &mut self,
        sender: PlayerHandle,
        msg: ClientMessage,
    ) -> Result<Vec<Outgoing>, RuleError> {
        if self.frozen {
            return Err(RuleError::Internal(
                "room is frozen after an invariant violation".into(),
            ));
        }
        if self.roster.get(sender).is_none() {
            return Err(RuleError::NotInRoom);
        }

        match msg {
            ClientMessage::UpdateQuota { quota } => {
                self.update_quota(sender, quota)
            }
            ClientMessage::StartGame => self.start_game(sender),
            ClientMessage::NightAction { action, target } => {
                self.night_action(sender, action, &target)
            }
            ClientMessage::StartVoting => self.start_voting(sender),
            ClientMessage::CastVote { target } => {
                self.cast_vote(sender, &target)
            }
            ClientMessage::Chat { text } => self.chat(sender, text),
            ClientMessage::CreateRoom { .. }
            | ClientMessage::JoinRoom { .. }
            | ClientMessage::LeaveRoom => Err(RuleError::Internal(
                "registry-level message routed to a room".into(),
            )),
        }
    }

    fn update_quota(
        &mut self,
        sender: PlayerHandle,
        quota: RoleQuota,
    ) -> Result<Vec<Outgoing>, RuleError> {
        self.require_host(sender)?;
        if self.phase != Phase::Lobby {
            return Err(RuleError::WrongPhase(self.phase));
        }
        // The players-vs-quota invariant is checked at start, not here:
        // the lobby may still be filling up.
        self.quota = quota;
        Ok(vec![(
            Recipient::All,
            ServerEvent::RoomUpdated { snapshot: self.snapshot() },
        )])
    }

    fn start_game(
        &mut self,
        sender: PlayerHandle,
    ) -> Result<Vec<Outgoing>, RuleError> {
        self.require_host(sender)?;
        if self.phase != Phase::Lobby {
            return Err(RuleError::WrongPhase(self.phase));
        }
        let required = MIN_PLAYERS.max(self.quota.sum() + 1);
        if self.roster.len() < required {
            return Err(RuleError::InsufficientPlayers {
                required,
                actual: self.roster.len(),
            });
        }

        let roles = assign::assign(self.roster.len(), &self.quota)?;
        self.roster.deal_roles(&roles);
        self.round = 1;
        self.night.clear();
        self.votes.clear();
        self.phase = Phase::Night;

        tracing::info!(
            room = %self.code,
            players = self.roster.len(),
            "game started"
        );

        let mut out: Vec<Outgoing> = Vec::with_capacity(self.roster.len() + 1);
        for seat in self.roster.iter() {
            if let Some(role) = seat.role {
                out.push((
                    Recipient::Player(seat.handle),
                    ServerEvent::RoleAssigned { role },
                ));
            }
        }
        out.push(self.phase_event(None));
        // Degenerate quotas (no night roles at all) resolve on entry.
        self.maybe_resolve_night(&mut out);
        Ok(out)
    }

    fn night_action(
        &mut self,
        sender: PlayerHandle,
        action: NightActionKind,
        target: &str,
    ) -> Result<Vec<Outgoing>, RuleError> {
        if self.phase != Phase::Night {
            return Err(RuleError::WrongPhase(self.phase));
        }
        let seat = self.roster.get(sender).ok_or(RuleError::NotInRoom)?;
        if !seat.alive {
            return Err(RuleError::NotAlive);
        }
        // The (role, action-kind) dispatch table. Every other pairing —
        // villagers included — is a role mismatch.
        let acting_role = match (seat.role, action) {
            (Some(Role::Killer), NightActionKind::Kill) => Role::Killer,
            (Some(Role::Seer), NightActionKind::Investigate) => Role::Seer,
            (Some(Role::Guardian), NightActionKind::Protect) => Role::Guardian,
            _ => return Err(RuleError::WrongRole),
        };
        if seat.has_acted {
            return Err(RuleError::AlreadyActed);
        }
        // Night targets may be dead (the resolver no-ops) but never
        // the actor themselves.
        let target = self.resolve_target(sender, target, false)?;

        self.night
            .insert(acting_role, NightRecord { actor: sender, target });
        if let Some(seat) = self.roster.get_mut(sender) {
            seat.has_acted = true;
        }

        let mut out =
            vec![(Recipient::Player(sender), ServerEvent::ActionConfirmed)];
        self.maybe_resolve_night(&mut out);
        Ok(out)
    }

    fn start_voting(
        &mut self,
        sender: PlayerHandle,
    ) -> Result<Vec<Outgoing>, RuleError> {
        self.require_host(sender)?;
        if self.phase != Phase::Day {
            return Err(RuleError::WrongPhase(self.phase));
        }
        self.votes.clear();
        self.roster.reset_vote_flags();
        self.phase = Phase::Voting;

        let mut out = vec![self.phase_event(None)];
        // Nothing to wait for if no living player is still connected.
        self.maybe_resolve_voting(&mut out);
        Ok(out)
    }

    fn cast_vote(
        &mut self,
        sender: PlayerHandle,
        target: &str,
    ) -> Result<Vec<Outgoing>, RuleError> {
        if self.phase != Phase::Voting {
            return Err(RuleError::WrongPhase(self.phase));
        }
        let seat = self.roster.get(sender).ok_or(RuleError::NotInRoom)?;
        if !seat.alive {
            return Err(RuleError::NotAlive);
        }
        if seat.has_voted {
            return Err(RuleError::AlreadyVoted);
        }
        // Vote targets must be living; dead and self are rejected here,
        // never inside the resolver.
        let target = self.resolve_target(sender, target, true)?;

        self.votes.insert(sender, target);
        if let Some(seat) = self.roster.get_mut(sender) {
            seat.has_voted = true;
        }

        let mut out =
            vec![(Recipient::Player(sender), ServerEvent::VoteConfirmed)];
        if self.voting_complete() {
            self.resolve_voting(&mut out);
        } else {
            out.push((
                Recipient::All,
                ServerEvent::VoteProgress {
                    cast: self.votes_cast(),
                    expected: self.voters_expected(),
                },
            ));
        }
        Ok(out)
    }

    fn chat(
        &mut self,
        sender: PlayerHandle,
        text: String,
    ) -> Result<Vec<Outgoing>, RuleError> {
        if self.phase == Phase::Ended {
            return Err(RuleError::WrongPhase(self.phase));
        }
        let seat = self.roster.get(sender).ok_or(RuleError::NotInRoom)?;
        // The dead keep quiet while the living deliberate.
        if self.phase == Phase::Day && !seat.alive {
            return Err(RuleError::NotAlive);
        }
        Ok(vec![(
            Recipient::All,
            ServerEvent::Chat {
                from: seat.name.clone(),
                text,
                alive: seat.alive,
            },
        )])
    }

    // -----------------------------------------------------------------
    // Round completion and resolution
    // -----------------------------------------------------------------

    fn night_complete(&self) -> bool {
        self.roster
            .iter()
            .filter(|s| {
                s.is_active() && s.role.is_some_and(Role::has_night_action)
            })
            .all(|s| s.has_acted)
    }

    fn voters_expected(&self) -> usize {
        self.roster.iter().filter(|s| s.is_active()).count()
    }

    fn votes_cast(&self) -> usize {
        self.roster
            .iter()
            .filter(|s| s.is_active() && s.has_voted)
            .count()
    }

    fn voting_complete(&self) -> bool {
        self.roster
            .iter()
            .filter(|s| s.is_active())
            .all(|s| s.has_voted)
    }

    fn maybe_resolve_night(&mut self, out: &mut Vec<Outgoing>) {
        if self.phase != Phase::Night || !self.night_complete() {
            return;
        }
        let outcome = match night::resolve(&self.night, &mut self.roster) {
            Ok(outcome) => outcome,
            Err(err) => return self.freeze(err),
        };

        if let Some(inv) = outcome.investigation {
            out.push((
                Recipient::Player(inv.seer),
                ServerEvent::InvestigationResult {
                    target: self.name_of(inv.target),
                    is_killer: inv.is_killer,
                },
            ));
        }

        let narrative = if outcome.protected {
            "The guardian kept watch. No one died tonight.".to_string()
        } else if let Some(victim) = outcome.death {
            if let Some(role) = self.roster.get(victim).and_then(|s| s.role) {
                out.push((
                    Recipient::Player(victim),
                    ServerEvent::PlayerDied { role },
                ));
            }
            format!("{} was eliminated during the night.", self.name_of(victim))
        } else {
            "The night passed quietly. No one died.".to_string()
        };

        match win::evaluate(&self.roster).winner() {
            Some(winner) => self.finish(winner, out),
            None => {
                self.phase = Phase::Day;
                out.push(self.phase_event(Some(narrative)));
            }
        }
    }

    fn maybe_resolve_voting(&mut self, out: &mut Vec<Outgoing>) {
        if self.phase == Phase::Voting && self.voting_complete() {
            self.resolve_voting(out);
        }
    }

    fn resolve_voting(&mut self, out: &mut Vec<Outgoing>) {
        let outcome = match vote::resolve(&self.votes, &mut self.roster) {
            Ok(outcome) => outcome,
            Err(err) => return self.freeze(err),
        };

        let tally = outcome
            .tally
            .iter()
            .map(|(handle, votes)| VoteCount {
                name: self.name_of(*handle),
                votes: *votes,
            })
            .collect();
        let narrative = match outcome.eliminated {
            Some((handle, role)) => {
                out.push((
                    Recipient::Player(handle),
                    ServerEvent::PlayerDied { role },
                ));
                format!(
                    "{} was eliminated by the town. They were a {}.",
                    self.name_of(handle),
                    role
                )
            }
            None => {
                "The town could not agree. No one was eliminated.".to_string()
            }
        };
        out.push((
            Recipient::All,
            ServerEvent::VotingResult { tally, narrative },
        ));

        match win::evaluate(&self.roster).winner() {
            Some(winner) => self.finish(winner, out),
            None => {
                self.round += 1;
                self.night.clear();
                self.roster.reset_night_flags();
                self.phase = Phase::Night;
                out.push(self.phase_event(None));
                self.maybe_resolve_night(out);
            }
        }
    }

    fn finish(&mut self, winner: Winner, out: &mut Vec<Outgoing>) {
        self.phase = Phase::Ended;
        tracing::info!(room = %self.code, ?winner, "game over");
        out.push((
            Recipient::All,
            ServerEvent::GameOver {
                winner,
                roster: self.roster.final_seats(),
            },
        ));
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn require_host(&self, sender: PlayerHandle) -> Result<(), RuleError> {
        if self.host == Some(sender) {
            Ok(())
        } else {
            Err(RuleError::NotHost)
        }
    }

    fn resolve_target(
        &self,
        sender: PlayerHandle,
        name: &str,
        require_alive: bool,
    ) -> Result<PlayerHandle, RuleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuleError::TargetRequired);
        }
        let seat = self.roster.by_name(name).ok_or_else(|| {
            RuleError::InvalidTarget(format!("no player named {name:?}"))
        })?;
        if seat.handle == sender {
            return Err(RuleError::InvalidTarget(
                "you cannot target yourself".into(),
            ));
        }
        if require_alive && !seat.alive {
            return Err(RuleError::InvalidTarget(format!(
                "{name} is already dead"
            )));
        }
        Ok(seat.handle)
    }

    fn name_of(&self, handle: PlayerHandle) -> String {
        self.roster
            .get(handle)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| handle.to_string())
    }

    fn phase_event(&self, narrative: Option<String>) -> Outgoing {
        (
            Recipient::All,
            ServerEvent::PhaseChange {
                phase: self.phase,
                round: self.round,
                narrative,
            },
        )
    }

    fn freeze(&mut self, err: RuleError) {
        self.frozen = true;
        tracing::error!(
            room = %self.code,
            error = %err,
            "invariant violation; room frozen"
        );
    }
}

// =========================================================================
// Tests
// =========================================================================
