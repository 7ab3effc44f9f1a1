//! Reward rolling: weighted tier draws, ten-pull pity, limited-pool
//! rate-up, and duplicate-to-currency conversion.

use rand::Rng;
use thiserror::Error;

use super::types::{
    CharacterReward, CompensationRecord, EquipmentReward, GachaError, GachaPool, Holdings,
    ItemCategory, PoolKind, PullOutcome, RewardItem, SkillReward,
};
use crate::core::constants::{
    sell_price, COMPENSATION_MULTIPLIER, FEATURED_TIER, HIGH_TIER, RATE_UP_CHANCE,
    VALID_BATCH_SIZES,
};
use crate::items::generation::{generate_equipment, roll_random_slot};
use crate::items::types::Rarity;

/// Failure from the item-generation collaborator. Any failure aborts the
/// whole batch; the caller handles currency refunds.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

/// The item-generation collaborator: materializes a concrete reward for a
/// category/tier pair, or for a specific featured identity.
pub trait ItemGenerator {
    fn generate(
        &mut self,
        category: ItemCategory,
        rarity: Rarity,
    ) -> Result<RewardItem, GenerationError>;

    fn generate_featured(
        &mut self,
        category: ItemCategory,
        identity: &str,
    ) -> Result<RewardItem, GenerationError>;
}

/// Walk a weight table in order with a uniform roll in [0, total),
/// subtracting until the remainder reaches zero. Zero and negative
/// weights are skipped.
fn pick_by_weight<T: Copy>(entries: &[(T, f64)], roll: f64) -> Option<T> {
    let mut remainder = roll;
    let mut last = None;
    for (value, weight) in entries {
        if *weight <= 0.0 {
            continue;
        }
        last = Some(*value);
        remainder -= weight;
        if remainder <= 0.0 {
            return Some(*value);
        }
    }
    // Float drift on the final subtraction lands on the last entry.
    last
}

fn draw_weighted<T: Copy>(entries: &[(T, f64)], rng: &mut impl Rng) -> Result<T, GachaError> {
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Err(GachaError::EmptyWeightTable);
    }
    let roll = rng.gen_range(0.0..total);
    pick_by_weight(entries, roll).ok_or(GachaError::EmptyWeightTable)
}

/// Draw one rarity tier from the pool's weight table. With `force_high`
/// the candidate set is restricted to tiers at or above the pity
/// threshold.
pub fn determine_rarity(
    pool: &GachaPool,
    force_high: bool,
    rng: &mut impl Rng,
) -> Result<Rarity, GachaError> {
    if force_high {
        let high: Vec<(Rarity, f64)> = pool
            .weights
            .iter()
            .filter(|(tier, _)| *tier >= HIGH_TIER)
            .copied()
            .collect();
        draw_weighted(&high, rng)
    } else {
        draw_weighted(&pool.weights, rng)
    }
}

/// Roll a reward batch from a pool. `count` must be 1 or 10.
///
/// Ten-pulls carry pity: if no drawn tier reaches the high threshold,
/// one uniformly chosen slot is redrawn from the high tiers only. On
/// limited pools, each tier at or above the featured threshold flips a
/// fair coin to be replaced by a curated featured identity of its
/// category. Finally, character and skill duplicates (against `holdings`
/// or earlier items in the same batch, in draw order) convert to typed
/// compensation currency; equipment always passes through.
///
/// A generation failure aborts the whole batch with no partial outcomes.
pub fn roll_batch(
    pool: &GachaPool,
    count: u32,
    holdings: &Holdings,
    generator: &mut dyn ItemGenerator,
    rng: &mut impl Rng,
) -> Result<Vec<PullOutcome>, GachaError> {
    if !VALID_BATCH_SIZES.contains(&count) {
        return Err(GachaError::InvalidBatchSize(count));
    }

    let mut tiers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        tiers.push(determine_rarity(pool, false, rng)?);
    }

    // Pity: a ten-pull is guaranteed at least one high-tier result.
    if count == 10 && !tiers.iter().any(|t| *t >= HIGH_TIER) {
        let slot = rng.gen_range(0..tiers.len());
        tiers[slot] = determine_rarity(pool, true, rng)?;
    }

    let mut items = Vec::with_capacity(tiers.len());
    for tier in &tiers {
        let category = draw_weighted(&pool.category_weights, rng)?;

        // Rate-up overlay: limited pools may swap a fresh high-tier item
        // for a curated featured identity of the same category.
        let featured_pick = if pool.kind == PoolKind::Limited
            && *tier >= FEATURED_TIER
            && rng.gen::<f64>() < RATE_UP_CHANCE
        {
            let candidates = pool.featured_for(category);
            if candidates.is_empty() {
                None
            } else {
                Some(candidates[rng.gen_range(0..candidates.len())].identity.clone())
            }
        } else {
            None
        };

        let item = match featured_pick {
            Some(identity) => generator
                .generate_featured(category, &identity)
                .map_err(|e| GachaError::Generation(e.to_string()))?,
            None => generator
                .generate(category, *tier)
                .map_err(|e| GachaError::Generation(e.to_string()))?,
        };
        items.push(item);
    }

    // Duplicate protection, sequentially in draw order so results are
    // reproducible given the same draws.
    let mut outcomes = Vec::with_capacity(items.len());
    let mut accepted_in_batch: Vec<(ItemCategory, String)> = Vec::new();
    for item in items {
        let category = item.category();
        let duplicate = match category {
            ItemCategory::Equipment => false,
            ItemCategory::Character | ItemCategory::Skill => {
                holdings.contains(category, item.identity())
                    || accepted_in_batch
                        .iter()
                        .any(|(c, id)| *c == category && id == item.identity())
            }
        };
        if duplicate {
            outcomes.push(PullOutcome::Compensation(CompensationRecord {
                rarity: item.rarity(),
                amount: sell_price(item.rarity()) * COMPENSATION_MULTIPLIER,
            }));
        } else {
            if matches!(category, ItemCategory::Character | ItemCategory::Skill) {
                accepted_in_batch.push((category, item.identity().to_string()));
            }
            outcomes.push(PullOutcome::Item(item));
        }
    }

    Ok(outcomes)
}

const CHARACTER_NAMES: [&str; 16] = [
    "Seren", "Kael", "Mira", "Dorn", "Liselle", "Varek", "Anya", "Toma", "Ilya", "Bren",
    "Ysolde", "Garrick", "Nyx", "Orin", "Pell", "Vess",
];

const SKILL_NAMES: [&str; 16] = [
    "Starfall", "Ember Wave", "Stone Ward", "Gale Step", "Riptide", "Sunder", "Mend",
    "Frost Lance", "Thunder Coil", "Veil", "Piercing Cry", "Bulwark", "Soul Drain",
    "Radiant Arc", "Shadow Bind", "Last Stand",
];

/// Default generator backed by fixed name pools and the equipment stat
/// roller. Suitable for tests and headless play.
pub struct BasicGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> BasicGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ItemGenerator for BasicGenerator<R> {
    fn generate(
        &mut self,
        category: ItemCategory,
        rarity: Rarity,
    ) -> Result<RewardItem, GenerationError> {
        match category {
            ItemCategory::Character => {
                let identity =
                    CHARACTER_NAMES[self.rng.gen_range(0..CHARACTER_NAMES.len())].to_string();
                Ok(RewardItem::Character(CharacterReward { identity, rarity }))
            }
            ItemCategory::Skill => {
                let identity = SKILL_NAMES[self.rng.gen_range(0..SKILL_NAMES.len())].to_string();
                Ok(RewardItem::Skill(SkillReward { identity, rarity }))
            }
            ItemCategory::Equipment => {
                let slot = roll_random_slot(&mut self.rng);
                let item = generate_equipment(slot, rarity, &mut self.rng);
                Ok(RewardItem::Equipment(EquipmentReward { item }))
            }
        }
    }

    fn generate_featured(
        &mut self,
        category: ItemCategory,
        identity: &str,
    ) -> Result<RewardItem, GenerationError> {
        match category {
            ItemCategory::Character => Ok(RewardItem::Character(CharacterReward {
                identity: identity.to_string(),
                rarity: FEATURED_TIER,
            })),
            ItemCategory::Skill => Ok(RewardItem::Skill(SkillReward {
                identity: identity.to_string(),
                rarity: FEATURED_TIER,
            })),
            ItemCategory::Equipment => {
                let slot = roll_random_slot(&mut self.rng);
                let mut item = generate_equipment(slot, FEATURED_TIER, &mut self.rng);
                item.name = identity.to_string();
                Ok(RewardItem::Equipment(EquipmentReward { item }))
            }
        }
    }
}
