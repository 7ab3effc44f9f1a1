//! Default equipment generation: per-rarity stat budgets spread across a
//! random subset of stats, plus display-name assembly.

use super::types::{EquipmentItem, Rarity, SlotKind, StatBonuses};
use rand::Rng;

/// Generate an equipment item of the given slot and rarity.
pub fn generate_equipment(slot: SlotKind, rarity: Rarity, rng: &mut impl Rng) -> EquipmentItem {
    let bonuses = generate_bonuses(slot, rarity, rng);
    let name = generate_display_name(slot, rarity, rng);

    EquipmentItem {
        slot,
        name,
        rarity,
        bonuses,
        gender_lock: None,
    }
}

/// Pick a random slot kind, weighted by the combatant layout (accessories
/// occupy two of the four slots).
pub fn roll_random_slot(rng: &mut impl Rng) -> SlotKind {
    match rng.gen_range(0..4) {
        0 => SlotKind::Weapon,
        1 => SlotKind::Armor,
        _ => SlotKind::Accessory,
    }
}

/// Per-rarity flat stat budget range (min, max).
fn budget_range(rarity: Rarity) -> (i32, i32) {
    match rarity {
        Rarity::Common => (2, 4),
        Rarity::Uncommon => (4, 7),
        Rarity::Rare => (7, 12),
        Rarity::Elite => (12, 18),
        Rarity::Epic => (18, 28),
        Rarity::Legendary => (28, 42),
        Rarity::Mythic => (42, 64),
        Rarity::Transcendent => (64, 96),
    }
}

fn generate_bonuses(slot: SlotKind, rarity: Rarity, rng: &mut impl Rng) -> StatBonuses {
    let (min, max) = budget_range(rarity);
    let mut budget = rng.gen_range(min..=max);
    let mut bonuses = StatBonuses::new();

    // Slot bias: weapons favor attack, armor favors hp/defense,
    // accessories spread evenly.
    while budget > 0 {
        let point = budget.min(rng.gen_range(1..=3));
        budget -= point;
        let roll = rng.gen_range(0..10);
        match slot {
            SlotKind::Weapon => match roll {
                0..=4 => bonuses.attack += point,
                5..=6 => bonuses.speed += point,
                7..=8 => bonuses.mp += point,
                _ => bonuses.hp += point,
            },
            SlotKind::Armor => match roll {
                0..=4 => bonuses.hp += point * 3,
                5..=7 => bonuses.defense += point,
                _ => bonuses.mp += point,
            },
            SlotKind::Accessory => match roll {
                0..=1 => bonuses.hp += point * 2,
                2..=3 => bonuses.mp += point,
                4..=5 => bonuses.attack += point,
                6..=7 => bonuses.defense += point,
                _ => bonuses.speed += point,
            },
        }
    }

    // High tiers also roll crit bonuses.
    if rarity >= Rarity::Epic {
        bonuses.crit_rate = (rng.gen_range(1..=5) as f64) / 100.0;
        bonuses.crit_dmg = (rng.gen_range(5..=20) as f64) / 100.0;
    }

    bonuses
}

const WEAPON_BASES: [&str; 4] = ["Sword", "Spear", "Bow", "Staff"];
const ARMOR_BASES: [&str; 4] = ["Cuirass", "Robe", "Mail", "Plate"];
const ACCESSORY_BASES: [&str; 4] = ["Ring", "Amulet", "Charm", "Band"];

fn rarity_prefix(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "Plain",
        Rarity::Uncommon => "Sturdy",
        Rarity::Rare => "Fine",
        Rarity::Elite => "Superior",
        Rarity::Epic => "Exalted",
        Rarity::Legendary => "Fabled",
        Rarity::Mythic => "Mythic",
        Rarity::Transcendent => "Transcendent",
    }
}

fn generate_display_name(slot: SlotKind, rarity: Rarity, rng: &mut impl Rng) -> String {
    let bases: &[&str] = match slot {
        SlotKind::Weapon => &WEAPON_BASES,
        SlotKind::Armor => &ARMOR_BASES,
        SlotKind::Accessory => &ACCESSORY_BASES,
    };
    let base = bases[rng.gen_range(0..bases.len())];
    format!("{} {}", rarity_prefix(rarity), base)
}
