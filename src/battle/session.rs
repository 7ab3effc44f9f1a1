//! Battle session lifecycle: pre-battle side selection, turn application,
//! defeat rotation, and terminal outcome.
//!
//! States run `PreBattle -> InProgress -> Over`, never skipping. A session
//! owns in-memory copies of the combatants it was given; persistent
//! records stay with the caller, who carries hp/mp percentages back out
//! of the terminal [`OutcomeReport`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resolver::ActionResolver;
use super::types::{
    BattleError, BattleState, CombatantSpec, Party, Side, TurnPhase,
};
use crate::character::attributes::Attributes;
use crate::core::constants::{EQUIPMENT_SLOTS, INITIATIVE_DIE_FACES};
use crate::items::types::EquipmentItem;

/// One of the two predefined rosters fielded in this battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterId {
    First,
    Second,
}

impl RosterId {
    pub fn other(&self) -> RosterId {
        match self {
            RosterId::First => RosterId::Second,
            RosterId::Second => RosterId::First,
        }
    }
}

/// Result of the contested pre-battle roll. Ties are re-rolled internally,
/// so the two dice always differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    pub player_die: u32,
    pub opponent_die: u32,
    pub winner: Side,
}

/// What a single applied turn changed, for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Name of the opponent combatant defeated this turn, if any.
    pub opponent_defeated: Option<String>,
    /// Name of the player combatant defeated this turn, if any.
    pub player_defeated: Option<String>,
    pub battle_over: bool,
    pub victory: Option<bool>,
}

/// Per-combatant condition carried back to the owning collection when the
/// session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantCondition {
    pub id: Uuid,
    pub name: String,
    pub hp_percent: f64,
    pub mp_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub victory: Option<bool>,
    pub is_arena: bool,
    pub player_condition: Vec<CombatantCondition>,
    pub opponent_condition: Vec<CombatantCondition>,
}

pub struct BattleSession {
    roster_first: Vec<CombatantSpec>,
    roster_second: Vec<CombatantSpec>,
    is_arena: bool,
    initiative: Option<InitiativeRoll>,
    /// Some once sides are assigned and the session is in progress.
    state: Option<BattleState>,
    turns_applied: u32,
}

impl BattleSession {
    /// Create a session in `PreBattle` over two predefined rosters.
    pub fn new(
        roster_first: Vec<CombatantSpec>,
        roster_second: Vec<CombatantSpec>,
        is_arena: bool,
    ) -> Self {
        Self {
            roster_first,
            roster_second,
            is_arena,
            initiative: None,
            state: None,
            turns_applied: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state.as_ref().map_or(false, |s| s.is_over)
    }

    pub fn state(&self) -> Option<&BattleState> {
        self.state.as_ref()
    }

    /// Contested d6 roll deciding who picks their side. Equal faces force
    /// a re-roll, so every battle resolves to a clean 50/50 winner.
    pub fn roll_initiative(&mut self, rng: &mut impl Rng) -> Result<InitiativeRoll, BattleError> {
        if self.state.is_some() {
            return Err(BattleError::NotPreBattle);
        }
        if self.initiative.is_some() {
            return Err(BattleError::InitiativeAlreadyRolled);
        }

        let (player_die, opponent_die) = loop {
            let p = rng.gen_range(1..=INITIATIVE_DIE_FACES);
            let o = rng.gen_range(1..=INITIATIVE_DIE_FACES);
            if p != o {
                break (p, o);
            }
        };

        let winner = if player_die > opponent_die {
            Side::Player
        } else {
            Side::Opponent
        };
        let roll = InitiativeRoll {
            player_die,
            opponent_die,
            winner,
        };
        self.initiative = Some(roll);
        Ok(roll)
    }

    /// Assign sides from the roll winner's choice and move to
    /// `InProgress`. `choice` is the roster the winner fields; the loser
    /// gets the complement.
    pub fn assign_sides(&mut self, choice: RosterId) -> Result<(), BattleError> {
        if self.state.is_some() {
            return Err(BattleError::NotPreBattle);
        }
        let initiative = self.initiative.ok_or(BattleError::InitiativeNotRolled)?;

        let player_roster = match initiative.winner {
            Side::Player => choice,
            Side::Opponent => choice.other(),
        };
        let (player_specs, opponent_specs) = match player_roster {
            RosterId::First => (self.roster_first.clone(), self.roster_second.clone()),
            RosterId::Second => (self.roster_second.clone(), self.roster_first.clone()),
        };

        self.state = Some(BattleState {
            player: Party::assemble(player_specs),
            opponent: Party::assemble(opponent_specs),
            phase: TurnPhase::PlayerActing,
            log: Vec::new(),
            is_over: false,
            victory: None,
            is_arena: self.is_arena,
        });
        Ok(())
    }

    /// Assign sides on the winner's behalf with a uniform pick. Used when
    /// the winner has not chosen within the selection window.
    pub fn auto_assign_sides(&mut self, rng: &mut impl Rng) -> Result<(), BattleError> {
        let choice = if rng.gen::<bool>() {
            RosterId::First
        } else {
            RosterId::Second
        };
        self.assign_sides(choice)
    }

    /// Abandon the battle. Permitted only before the first turn has been
    /// applied; consumes the session so no state survives. If the window
    /// has closed the session is handed back unchanged.
    pub fn flee(self) -> Result<(), Self> {
        if self.turns_applied == 0 && !self.is_over() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Apply one combat exchange.
    ///
    /// The resolver sees the two active combatants and the chosen action,
    /// and returns deltas, narration, and status lists for both sides.
    /// A resolver failure mutates nothing and the same action may be
    /// retried. On success, in order: deltas are applied with hp/mp
    /// clamped into [0, max], narration is appended to the log, status
    /// lists are replaced, then defeat is evaluated for the opponent side
    /// first and the player side second — a turn that wipes both parties
    /// is therefore a player victory.
    pub fn submit_turn(
        &mut self,
        action_id: &str,
        resolver: &mut dyn ActionResolver,
    ) -> Result<TurnReport, BattleError> {
        let state = self.state.as_mut().ok_or(BattleError::SidesNotAssigned)?;
        if state.is_over {
            return Err(BattleError::BattleOver);
        }

        let attacker = state
            .player
            .active_combatant()
            .ok_or(BattleError::SidesNotAssigned)?;
        let defender = state
            .opponent
            .active_combatant()
            .ok_or(BattleError::SidesNotAssigned)?;

        let resolution = resolver
            .resolve_turn(attacker, defender, action_id)
            .map_err(|e| BattleError::Resolver(e.to_string()))?;

        // Past this point the turn commits; nothing above mutated state.
        let mut report = TurnReport::default();

        if let Some(active) = state.player.active_combatant_mut() {
            active.effective.apply_hp_delta(resolution.player_hp_delta);
            active.effective.apply_mp_delta(resolution.player_mp_delta);
            active.status = resolution.player_status;
        }
        if let Some(active) = state.opponent.active_combatant_mut() {
            active.effective.apply_hp_delta(resolution.opponent_hp_delta);
            active.effective.apply_mp_delta(resolution.opponent_mp_delta);
            active.status = resolution.opponent_status;
        }

        state.log.push(resolution.player_narrative);
        state.log.push(resolution.opponent_narrative);

        // Opponent side is evaluated first: on a simultaneous final KO the
        // player takes the victory.
        if let Some(active) = state.opponent.active_combatant_mut() {
            if !active.is_alive() && !active.defeated {
                active.defeated = true;
                let name = active.name.clone();
                state.log.push(format!("{} is defeated!", name));
                report.opponent_defeated = Some(name);
                if !state.opponent.rotate_to_survivor() {
                    state.is_over = true;
                    state.victory = Some(true);
                    state.log.push("Victory!".to_string());
                }
            }
        }

        if let Some(active) = state.player.active_combatant_mut() {
            if !active.is_alive() && !active.defeated {
                active.defeated = true;
                let name = active.name.clone();
                state.log.push(format!("{} has fallen!", name));
                report.player_defeated = Some(name);
                if !state.player.rotate_to_survivor() {
                    state.is_over = true;
                    if state.victory.is_none() {
                        state.victory = Some(false);
                        state.log.push("Defeat...".to_string());
                    }
                }
            }
        }

        self.turns_applied += 1;
        report.battle_over = state.is_over;
        report.victory = state.victory;
        Ok(report)
    }

    /// Re-resolve one combatant's effective stats after its owning record
    /// changed outside the session (live-refresh mode: hp/mp keep their
    /// percentage). Only callable between turns.
    pub fn refresh_combatant(
        &mut self,
        side: Side,
        index: usize,
        base: Attributes,
        equipment: [Option<EquipmentItem>; EQUIPMENT_SLOTS],
    ) -> Result<(), BattleError> {
        let state = self.state.as_mut().ok_or(BattleError::SidesNotAssigned)?;
        if state.is_over {
            return Err(BattleError::BattleOver);
        }
        let party = match side {
            Side::Player => &mut state.player,
            Side::Opponent => &mut state.opponent,
        };
        if let Some(combatant) = party.members.get_mut(index) {
            combatant.refresh(base, equipment);
        }
        Ok(())
    }

    /// Terminal summary with the arena flag and per-combatant hp/mp
    /// percentages, for carry-back into the owning collection. `None`
    /// until the battle is over.
    pub fn outcome_report(&self) -> Option<OutcomeReport> {
        let state = self.state.as_ref()?;
        if !state.is_over {
            return None;
        }
        let condition = |party: &Party| {
            party
                .members
                .iter()
                .map(|m| CombatantCondition {
                    id: m.id,
                    name: m.name.clone(),
                    hp_percent: m.effective.hp_percent(),
                    mp_percent: m.effective.mp_percent(),
                })
                .collect()
        };
        Some(OutcomeReport {
            victory: state.victory,
            is_arena: state.is_arena,
            player_condition: condition(&state.player),
            opponent_condition: condition(&state.opponent),
        })
    }
}
