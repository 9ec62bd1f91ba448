//! Role assignment: quota → shuffled role list.

use nocturne_protocol::{Role, RoleQuota};
use rand::seq::SliceRandom;

use crate::RuleError;

/// Builds the role multiset for `player_count` players and shuffles it
/// uniformly.
///
/// The multiset is exactly `quota.killer` Killers, `quota.seer` Seers,
/// `quota.guardian` Guardians, padded with Villagers. The result is
/// assigned positionally to seats in join order, so the shuffle is the
/// only source of randomness in who gets what.
///
/// # Errors
/// `InsufficientPlayers` when `player_count < quota.sum() + 1` — at
/// least one Villager must exist so the Killer has a target pool.
pub fn assign(player_count: usize, quota: &RoleQuota) -> Result<Vec<Role>, RuleError> {
    let required = quota.sum() + 1;
    if player_count < required {
        return Err(RuleError::InsufficientPlayers {
            required,
            actual: player_count,
        });
    }

    let mut roles = Vec::with_capacity(player_count);
    roles.extend(std::iter::repeat_n(Role::Killer, quota.killer));
    roles.extend(std::iter::repeat_n(Role::Seer, quota.seer));
    roles.extend(std::iter::repeat_n(Role::Guardian, quota.guardian));
    roles.extend(std::iter::repeat_n(
        Role::Villager,
        player_count - quota.sum(),
    ));

    roles.shuffle(&mut rand::rng());
    Ok(roles)
}
