//! Vote resolution.
//!
//! Targets are validated at submission time (living, existing,
//! non-self), so this module only tallies and applies the outcome. A
//! strict maximum eliminates; any tie for the maximum eliminates no one
//! — ties never resolve by chance or by join order.

use std::collections::HashMap;

use nocturne_protocol::{PlayerHandle, Role};

use crate::{Roster, RuleError};

/// The round's collected votes: voter → target.
pub type VoteBuffer = HashMap<PlayerHandle, PlayerHandle>;

/// What the vote produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The eliminated player and their role, or `None` on a tie (or an
    /// empty ballot). Vote eliminations reveal the role to everyone.
    pub eliminated: Option<(PlayerHandle, Role)>,
    /// Every target that received votes, most votes first. Published
    /// for transparency. Targets with equal counts keep join order.
    pub tally: Vec<(PlayerHandle, u32)>,
}

/// Tallies the round's votes and applies an elimination to the roster.
///
/// # Errors
/// `Internal` when a buffered target is missing from the roster or has
/// no role — submissions are validated, so that indicates a defect.
pub fn resolve(votes: &VoteBuffer, roster: &mut Roster) -> Result<VoteOutcome, RuleError> {
    let mut counts: HashMap<PlayerHandle, u32> = HashMap::new();
    for target in votes.values() {
        *counts.entry(*target).or_insert(0) += 1;
    }

    // Stable tally order: by count descending, join order within a tie.
    let order: HashMap<PlayerHandle, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, s)| (s.handle, i))
        .collect();
    let mut tally: Vec<(PlayerHandle, u32)> = counts.into_iter().collect();
    tally.sort_by_key(|(handle, count)| {
        (std::cmp::Reverse(*count), order.get(handle).copied())
    });

    let eliminated = match tally.as_slice() {
        [] => None,
        [_single] => Some(tally[0].0),
        [(_, top), (_, second), ..] if top == second => None,
        _ => Some(tally[0].0),
    };

    let eliminated = match eliminated {
        None => None,
        Some(handle) => {
            let role = roster.kill(handle).ok_or_else(|| {
                RuleError::Internal(format!(
                    "vote buffer targets unknown or unassigned handle {handle}"
                ))
            })?;
            Some((handle, role))
        }
    };

    Ok(VoteOutcome { eliminated, tally })
}
