//! Win-condition evaluation.

use nocturne_protocol::{Role, Winner};

use crate::Roster;

/// The evaluator's answer after a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep playing.
    Undecided,
    /// No living Killer remains.
    TownWins,
    /// Living Killers equal or outnumber all other living players.
    KillersWin,
}

impl Verdict {
    /// The winner, if the game is decided.
    pub fn winner(self) -> Option<Winner> {
        match self {
            Self::Undecided => None,
            Self::TownWins => Some(Winner::Town),
            Self::KillersWin => Some(Winner::Killers),
        }
    }
}

/// Evaluates the roster. Called after every night or vote resolution
/// and at no other time; once decided, the room ends and never asks
/// again.
pub fn evaluate(roster: &Roster) -> Verdict {
    let killers = roster
        .living()
        .filter(|s| s.role == Some(Role::Killer))
        .count();
    let others = roster.living_count() - killers;

    if killers == 0 {
        Verdict::TownWins
    } else if killers >= others {
        Verdict::KillersWin
    } else {
        Verdict::Undecided
    }
}
