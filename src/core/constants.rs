//! Tuning constants shared across the battle and reward engines.

use crate::items::types::Rarity;

/// Maximum combatants fielded per side.
pub const MAX_PARTY_SIZE: usize = 4;

/// Equipment slots per combatant: weapon, armor, two accessories.
pub const EQUIPMENT_SLOTS: usize = 4;

/// Faces on the initiative die used for pre-battle side selection.
pub const INITIATIVE_DIE_FACES: u32 = 6;

/// Lowest tier counted as a "high" pull. A ten-pull is guaranteed at
/// least one result at or above this tier.
pub const HIGH_TIER: Rarity = Rarity::Rare;

/// Lowest tier eligible for the featured rate-up coin flip on limited pools.
pub const FEATURED_TIER: Rarity = Rarity::Legendary;

/// Probability that an eligible high-tier pull is swapped for a featured
/// identity on a limited pool.
pub const RATE_UP_CHANCE: f64 = 0.5;

/// Duplicate characters and skills convert to currency at
/// `sell_price(rarity) * COMPENSATION_MULTIPLIER`.
pub const COMPENSATION_MULTIPLIER: u32 = 10;

/// Base sell price per rarity tier, ascending tier order.
pub const SELL_PRICES: [u32; Rarity::COUNT] = [5, 10, 25, 60, 150, 400, 1000, 2500];

/// Currency value a duplicate of the given rarity converts into.
pub fn sell_price(rarity: Rarity) -> u32 {
    SELL_PRICES[rarity.index()]
}

/// Batch sizes accepted by the reward roller.
pub const VALID_BATCH_SIZES: [u32; 2] = [1, 10];
