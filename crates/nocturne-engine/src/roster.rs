//! The player roster: seats, aliveness, and per-round flags.

use nocturne_protocol::{FinalSeat, PlayerHandle, Role, SeatSummary};

/// One player's seat in a room.
///
/// A seat is created on join and owned by its room for the rest of the
/// game. Once the game has started a seat is never removed — a dropped
/// connection only flips `connected`, so role-count invariants survive
/// the departure.
#[derive(Debug, Clone)]
pub struct Seat {
    pub handle: PlayerHandle,
    pub name: String,
    /// `None` until roles are dealt, then immutable.
    pub role: Option<Role>,
    /// Flips to `false` at most once. No revival.
    pub alive: bool,
    pub connected: bool,
    /// Reset on every Night entry.
    pub has_acted: bool,
    /// Reset on every Voting entry.
    pub has_voted: bool,
}

impl Seat {
    fn new(handle: PlayerHandle, name: String) -> Self {
        Self {
            handle,
            name,
            role: None,
            alive: true,
            connected: true,
            has_acted: false,
            has_voted: false,
        }
    }

    /// A living, connected seat — the only kind that round-completion
    /// checks wait on.
    pub fn is_active(&self) -> bool {
        self.alive && self.connected
    }
}

/// An ordered collection of seats. Insertion order is join order; it is
/// kept stable for client display but carries no game meaning.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    /// Adds a seat at the end of the roster.
    pub fn push(&mut self, handle: PlayerHandle, name: String) {
        self.seats.push(Seat::new(handle, name));
    }

    /// Removes a seat entirely. Lobby only — the caller enforces that.
    pub fn remove(&mut self, handle: PlayerHandle) -> Option<Seat> {
        let idx = self.seats.iter().position(|s| s.handle == handle)?;
        Some(self.seats.remove(idx))
    }

    pub fn get(&self, handle: PlayerHandle) -> Option<&Seat> {
        self.seats.iter().find(|s| s.handle == handle)
    }

    pub fn get_mut(&mut self, handle: PlayerHandle) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.handle == handle)
    }

    /// Case-sensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.name == name)
    }

    /// Deals roles positionally: `roles[i]` goes to the i-th seat in
    /// join order. All seats come back alive with flags cleared.
    pub fn deal_roles(&mut self, roles: &[Role]) {
        debug_assert_eq!(roles.len(), self.seats.len());
        for (seat, role) in self.seats.iter_mut().zip(roles) {
            seat.role = Some(*role);
            seat.alive = true;
            seat.has_acted = false;
            seat.has_voted = false;
        }
    }

    /// Marks a seat dead and returns its role. `None` if the handle is
    /// unknown or the seat has no role yet — callers treat that as an
    /// invariant violation.
    pub fn kill(&mut self, handle: PlayerHandle) -> Option<Role> {
        let seat = self.get_mut(handle)?;
        seat.alive = false;
        seat.role
    }

    pub fn living(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.alive)
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn reset_night_flags(&mut self) {
        for seat in &mut self.seats {
            seat.has_acted = false;
        }
    }

    pub fn reset_vote_flags(&mut self) {
        for seat in &mut self.seats {
            seat.has_voted = false;
        }
    }

    /// Client-facing summaries, roles withheld.
    pub fn summaries(&self, host: Option<PlayerHandle>) -> Vec<SeatSummary> {
        self.seats
            .iter()
            .map(|s| SeatSummary {
                name: s.name.clone(),
                is_host: Some(s.handle) == host,
                alive: s.alive,
                connected: s.connected,
            })
            .collect()
    }

    /// The end-of-game reveal. Seats that somehow lack a role are
    /// skipped; that cannot happen after a normal start.
    pub fn final_seats(&self) -> Vec<FinalSeat> {
        self.seats
            .iter()
            .filter_map(|s| {
                s.role.map(|role| FinalSeat {
                    name: s.name.clone(),
                    role,
                    alive: s.alive,
                })
            })
            .collect()
    }
}
