use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::types::{EquipmentItem, Rarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolKind {
    /// Always available; no featured overlay.
    Permanent,
    /// Time-limited; high-tier pulls may be swapped for featured identities.
    Limited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Character,
    Equipment,
    Skill,
}

/// A curated identity overweighted within a limited pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedEntry {
    pub category: ItemCategory,
    pub identity: String,
}

/// Static pull-pool configuration, read-only during a roll. Weights are
/// kept in ascending tier order and normalized at draw time; they need
/// not sum to any fixed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GachaPool {
    pub id: String,
    pub kind: PoolKind,
    pub weights: Vec<(Rarity, f64)>,
    #[serde(default)]
    pub featured: Vec<FeaturedEntry>,
    pub category_weights: Vec<(ItemCategory, f64)>,
    pub cost_single: u32,
    pub cost_ten: u32,
}

impl GachaPool {
    /// Featured identities of one category.
    pub fn featured_for(&self, category: ItemCategory) -> Vec<&FeaturedEntry> {
        self.featured
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterReward {
    pub identity: String,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillReward {
    pub identity: String,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentReward {
    pub item: EquipmentItem,
}

/// A materialized reward, tagged by category at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RewardItem {
    Character(CharacterReward),
    Equipment(EquipmentReward),
    Skill(SkillReward),
}

impl RewardItem {
    pub fn category(&self) -> ItemCategory {
        match self {
            RewardItem::Character(_) => ItemCategory::Character,
            RewardItem::Equipment(_) => ItemCategory::Equipment,
            RewardItem::Skill(_) => ItemCategory::Skill,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            RewardItem::Character(c) => c.rarity,
            RewardItem::Equipment(e) => e.item.rarity,
            RewardItem::Skill(s) => s.rarity,
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            RewardItem::Character(c) => &c.identity,
            RewardItem::Equipment(e) => &e.item.name,
            RewardItem::Skill(s) => &s.identity,
        }
    }
}

/// Currency paid out in place of a duplicate character or skill. The
/// amount is a typed field fixed at creation, never derived from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRecord {
    pub rarity: Rarity,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PullOutcome {
    Item(RewardItem),
    Compensation(CompensationRecord),
}

/// The caller-owned uniqueness ledger. Characters and skills are unique
/// per identity; equipment is never tracked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holdings {
    pub characters: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub currency: u64,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: ItemCategory, identity: &str) -> bool {
        match category {
            ItemCategory::Character => self.characters.contains(identity),
            ItemCategory::Skill => self.skills.contains(identity),
            ItemCategory::Equipment => false,
        }
    }

    /// Fold an accepted batch into the ledger: new character/skill
    /// identities are recorded, compensation is credited as currency.
    pub fn merge_outcomes(&mut self, outcomes: &[PullOutcome]) {
        for outcome in outcomes {
            match outcome {
                PullOutcome::Item(RewardItem::Character(c)) => {
                    self.characters.insert(c.identity.clone());
                }
                PullOutcome::Item(RewardItem::Skill(s)) => {
                    self.skills.insert(s.identity.clone());
                }
                PullOutcome::Item(RewardItem::Equipment(_)) => {}
                PullOutcome::Compensation(record) => {
                    self.currency += u64::from(record.amount);
                }
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GachaError {
    #[error("invalid batch size {0}: only 1 and 10 are defined")]
    InvalidBatchSize(u32),
    #[error("pool has no positive weights to draw from")]
    EmptyWeightTable,
    #[error("item generation failed: {0}")]
    Generation(String),
}
