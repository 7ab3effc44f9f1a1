//! The action-resolver seam. The session delegates every turn to an
//! [`ActionResolver`]; the implementation may be rule-based or generative.
//! A failed resolution leaves the session untouched and is safe to retry.

use rand::Rng;
use thiserror::Error;

use super::types::{Combatant, StatusEffect};

/// Everything a resolved turn changes, for both sides at once. Deltas are
/// signed (negative hp = damage); the session clamps on application.
#[derive(Debug, Clone, Default)]
pub struct TurnResolution {
    pub player_hp_delta: i32,
    pub player_mp_delta: i32,
    pub opponent_hp_delta: i32,
    pub opponent_mp_delta: i32,
    pub player_narrative: String,
    pub opponent_narrative: String,
    pub player_status: Vec<StatusEffect>,
    pub opponent_status: Vec<StatusEffect>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ResolverError(pub String);

pub trait ActionResolver {
    fn resolve_turn(
        &mut self,
        attacker: &Combatant,
        defender: &Combatant,
        action_id: &str,
    ) -> Result<TurnResolution, ResolverError>;
}

/// Rule-based resolver: attack minus defense with a variance roll and a
/// crit chance from the attacker's stats. The defender always strikes
/// back within the same turn.
pub struct BasicActionResolver<R: Rng> {
    rng: R,
}

impl<R: Rng> BasicActionResolver<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn strike(&mut self, attacker: &Combatant, defender: &Combatant) -> (i32, bool) {
        let base = (attacker.effective.attack - defender.effective.defense).max(1);
        // +/-20% variance
        let varied = base as f64 * self.rng.gen_range(0.8..=1.2);
        let is_crit = self.rng.gen::<f64>() < attacker.effective.crit_rate;
        let damage = if is_crit {
            varied * attacker.effective.crit_dmg
        } else {
            varied
        };
        ((damage.round() as i32).max(1), is_crit)
    }
}

/// Flat mp cost charged when the chosen action is a skill rather than a
/// plain attack.
const SKILL_MP_COST: i32 = 5;

impl<R: Rng> ActionResolver for BasicActionResolver<R> {
    fn resolve_turn(
        &mut self,
        attacker: &Combatant,
        defender: &Combatant,
        action_id: &str,
    ) -> Result<TurnResolution, ResolverError> {
        let is_skill = action_id != "attack";
        if is_skill && attacker.effective.mp < SKILL_MP_COST {
            return Err(ResolverError(format!(
                "{} lacks the mp for {}",
                attacker.name, action_id
            )));
        }

        let (mut dealt, crit) = self.strike(attacker, defender);
        if is_skill {
            dealt = (dealt as f64 * 1.5).round() as i32;
        }
        let (taken, _) = self.strike(defender, attacker);

        let player_narrative = if crit {
            format!("{} lands a critical {} for {} damage!", attacker.name, action_id, dealt)
        } else {
            format!("{} uses {} for {} damage.", attacker.name, action_id, dealt)
        };
        let opponent_narrative = format!("{} strikes back for {} damage.", defender.name, taken);

        Ok(TurnResolution {
            player_hp_delta: -taken,
            player_mp_delta: if is_skill { -SKILL_MP_COST } else { 0 },
            opponent_hp_delta: -dealt,
            opponent_mp_delta: 0,
            player_narrative,
            opponent_narrative,
            player_status: attacker.status.clone(),
            opponent_status: defender.status.clone(),
        })
    }
}
