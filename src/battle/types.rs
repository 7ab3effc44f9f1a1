use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::character::attributes::Attributes;
use crate::character::resolver::{resolve_fresh, resolve_refresh};
use crate::core::constants::{EQUIPMENT_SLOTS, MAX_PARTY_SIZE};
use crate::items::types::{EquipmentItem, GenderLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Whether this wearer satisfies an item's gender lock.
    pub fn satisfies(&self, lock: Option<GenderLock>) -> bool {
        match lock {
            None => true,
            Some(GenderLock::Male) => *self == Gender::Male,
            Some(GenderLock::Female) => *self == Gender::Female,
        }
    }
}

/// A status effect as reported by the action resolver. The session treats
/// these as opaque: each turn the resolver returns the full replacement
/// list per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub remaining_turns: u32,
}

/// Roster entry: everything needed to assemble a combatant at battle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub base: Attributes,
    pub equipment: [Option<EquipmentItem>; EQUIPMENT_SLOTS],
}

impl CombatantSpec {
    pub fn new(name: impl Into<String>, gender: Gender, base: Attributes) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
            base,
            equipment: [None, None, None, None],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub base: Attributes,
    pub equipment: [Option<EquipmentItem>; EQUIPMENT_SLOTS],
    /// Effective stats; carries current hp/mp.
    pub effective: Attributes,
    pub status: Vec<StatusEffect>,
    pub defeated: bool,
}

impl Combatant {
    /// Assemble a combatant for battle entry: effective stats resolved
    /// fresh, hp/mp full.
    pub fn assemble(spec: CombatantSpec) -> Self {
        let effective = resolve_fresh(&spec.base, &spec.equipment);
        Self {
            id: spec.id,
            name: spec.name,
            gender: spec.gender,
            base: spec.base,
            equipment: spec.equipment,
            effective,
            status: Vec::new(),
            defeated: false,
        }
    }

    /// Re-resolve effective stats in live-refresh mode after the owning
    /// record changed (equipment swap, level-up) outside the session.
    pub fn refresh(&mut self, base: Attributes, equipment: [Option<EquipmentItem>; EQUIPMENT_SLOTS]) {
        let previous = self.effective;
        self.base = base;
        self.equipment = equipment;
        self.effective = resolve_refresh(&self.base, &self.equipment, &previous);
    }

    pub fn is_alive(&self) -> bool {
        self.effective.is_alive()
    }
}

/// One side's ordered roster with the index of the combatant currently
/// engaged. The active index always points at a living member while any
/// member survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub members: Vec<Combatant>,
    pub active: usize,
}

impl Party {
    pub fn assemble(specs: Vec<CombatantSpec>) -> Self {
        let members = specs
            .into_iter()
            .take(MAX_PARTY_SIZE)
            .map(Combatant::assemble)
            .collect();
        Self { members, active: 0 }
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.members.get(self.active)
    }

    pub fn active_combatant_mut(&mut self) -> Option<&mut Combatant> {
        self.members.get_mut(self.active)
    }

    /// Advance the active index to the next living member. Returns false
    /// if the party is wiped.
    pub fn rotate_to_survivor(&mut self) -> bool {
        if let Some(idx) = self.members.iter().position(|m| m.is_alive()) {
            self.active = idx;
            true
        } else {
            false
        }
    }

    pub fn is_wiped(&self) -> bool {
        self.members.iter().all(|m| !m.is_alive())
    }

    pub fn survivors(&self) -> usize {
        self.members.iter().filter(|m| m.is_alive()).count()
    }
}

/// Whose action the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    PreBattle,
    PlayerActing,
    OpponentActing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub player: Party,
    pub opponent: Party,
    pub phase: TurnPhase,
    /// Append-only combat narration.
    pub log: Vec<String>,
    pub is_over: bool,
    /// None until decided; Some(true) = player victory.
    pub victory: Option<bool>,
    /// Arena battles feed a ranked-points pipeline downstream; mechanics
    /// are identical, the flag is only carried through.
    pub is_arena: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    #[error("session is no longer in pre-battle")]
    NotPreBattle,
    #[error("initiative has not been rolled yet")]
    InitiativeNotRolled,
    #[error("initiative was already rolled")]
    InitiativeAlreadyRolled,
    #[error("sides have not been assigned yet")]
    SidesNotAssigned,
    #[error("battle is already over")]
    BattleOver,
    #[error("action resolver failed: {0}")]
    Resolver(String),
}
