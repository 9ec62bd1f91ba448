//! Night-action resolution.
//!
//! One call consumes the round's collected actions and applies the
//! outcome to the roster. Resolution order is fixed:
//!
//! 1. no killer target → no death
//! 2. killer target == guardian target → kill negated (protection)
//! 3. otherwise the target dies, if still alive
//! 4. a seer investigation always resolves, independent of 1–3
//!
//! The narrative wording is the room's job; this module only reports
//! what happened.

use std::collections::HashMap;

use nocturne_protocol::{PlayerHandle, Role};

use crate::{Roster, RuleError};

/// One submitted night action: who acted and whom they chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightRecord {
    pub actor: PlayerHandle,
    pub target: PlayerHandle,
}

/// The round's collected actions, keyed by acting role.
///
/// When the quota grants a role to several players, the last submission
/// for that role wins; `has_acted` still limits each player to one
/// submission per round.
pub type NightBuffer = HashMap<Role, NightRecord>;

/// A resolved seer investigation, delivered privately to the seer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Investigation {
    pub seer: PlayerHandle,
    pub target: PlayerHandle,
    pub is_killer: bool,
}

/// What the night produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NightOutcome {
    /// The player who died tonight, if any.
    pub death: Option<PlayerHandle>,
    /// `true` when a kill was negated by protection. The identity of
    /// the protected target is never part of the outcome.
    pub protected: bool,
    pub investigation: Option<Investigation>,
}

/// Resolves one night and applies any death to the roster.
///
/// # Errors
/// `Internal` when a buffered record points at a handle the roster does
/// not know — submissions are validated, so that indicates a defect.
pub fn resolve(buffer: &NightBuffer, roster: &mut Roster) -> Result<NightOutcome, RuleError> {
    let mut outcome = NightOutcome::default();

    let kill = buffer.get(&Role::Killer);
    let guard = buffer.get(&Role::Guardian);

    match kill {
        None => {}
        Some(kill) => {
            let victim = roster
                .get(kill.target)
                .ok_or_else(|| {
                    RuleError::Internal(format!(
                        "night buffer targets unknown handle {}",
                        kill.target
                    ))
                })?;

            if guard.is_some_and(|g| g.target == kill.target) {
                outcome.protected = true;
            } else if victim.alive {
                roster.kill(kill.target);
                outcome.death = Some(kill.target);
            }
            // A dead target is legal input with no effect.
        }
    }

    if let Some(probe) = buffer.get(&Role::Seer) {
        let target = roster.get(probe.target).ok_or_else(|| {
            RuleError::Internal(format!(
                "investigation targets unknown handle {}",
                probe.target
            ))
        })?;
        outcome.investigation = Some(Investigation {
            seer: probe.actor,
            target: probe.target,
            is_killer: target.role == Some(Role::Killer),
        });
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(id: u64) -> PlayerHandle {
        PlayerHandle(id)
    }

    /// killer=0, seer=1, guardian=2, villagers=3,4
    fn roster() -> Roster {
        let mut roster = Roster::new();
        for (i, name) in ["kay", "sam", "gwen", "vic", "val"].iter().enumerate() {
            roster.push(h(i as u64), name.to_string());
        }
        roster.deal_roles(&[
            Role::Killer,
            Role::Seer,
            Role::Guardian,
            Role::Villager,
            Role::Villager,
        ]);
        roster
    }

    fn record(actor: u64, target: u64) -> NightRecord {
        NightRecord { actor: h(actor), target: h(target) }
    }

    #[test]
    fn test_no_killer_action_means_no_death() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Guardian, record(2, 3));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, None);
        assert!(!outcome.protected);
        assert_eq!(roster.living_count(), 5);
    }

    #[test]
    fn test_unprotected_target_dies() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 3));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, Some(h(3)));
        assert!(!roster.get(h(3)).unwrap().alive);
    }

    #[test]
    fn test_protection_negates_the_kill() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 3));
        buffer.insert(Role::Guardian, record(2, 3));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, None);
        assert!(outcome.protected);
        assert!(roster.get(h(3)).unwrap().alive, "protected target lives");
    }

    #[test]
    fn test_guarding_the_wrong_player_does_not_help() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 3));
        buffer.insert(Role::Guardian, record(2, 4));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, Some(h(3)));
        assert!(!outcome.protected);
    }

    #[test]
    fn test_killing_a_corpse_is_a_no_op() {
        let mut roster = roster();
        roster.kill(h(3));
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 3));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, None);
        assert!(!outcome.protected);
    }

    #[test]
    fn test_investigation_identifies_the_killer() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Seer, record(1, 0));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        let inv = outcome.investigation.unwrap();
        assert_eq!(inv.seer, h(1));
        assert_eq!(inv.target, h(0));
        assert!(inv.is_killer);
    }

    #[test]
    fn test_investigation_clears_an_innocent() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Seer, record(1, 4));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert!(!outcome.investigation.unwrap().is_killer);
    }

    #[test]
    fn test_investigation_survives_death_and_protection() {
        // The seer investigates the very player the killer takes out:
        // the answer is still delivered.
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 4));
        buffer.insert(Role::Seer, record(1, 4));

        let outcome = resolve(&buffer, &mut roster).unwrap();
        assert_eq!(outcome.death, Some(h(4)));
        let inv = outcome.investigation.unwrap();
        assert_eq!(inv.target, h(4));
        assert!(!inv.is_killer);
    }

    #[test]
    fn test_unknown_target_is_an_internal_error() {
        let mut roster = roster();
        let mut buffer = NightBuffer::new();
        buffer.insert(Role::Killer, record(0, 99));

        assert!(matches!(
            resolve(&buffer, &mut roster),
            Err(RuleError::Internal(_))
        ));
    }
}
