use serde::{Deserialize, Serialize};

/// Ordered quality classification applied to generated items,
/// lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Elite = 3,
    Epic = 4,
    Legendary = 5,
    Mythic = 6,
    Transcendent = 7,
}

impl Rarity {
    pub const COUNT: usize = 8;

    /// All tiers in ascending order.
    pub fn all() -> [Rarity; Rarity::COUNT] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Elite,
            Rarity::Epic,
            Rarity::Legendary,
            Rarity::Mythic,
            Rarity::Transcendent,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Elite => "Elite",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Transcendent => "Transcendent",
        }
    }
}

/// Slot category an equipment item occupies. A combatant carries one
/// weapon, one armor, and two accessories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Weapon,
    Armor,
    Accessory,
}

impl SlotKind {
    /// Fixed slot layout of a combatant's equipment array.
    pub fn layout() -> [SlotKind; 4] {
        [
            SlotKind::Weapon,
            SlotKind::Armor,
            SlotKind::Accessory,
            SlotKind::Accessory,
        ]
    }
}

/// Wearer restriction carried by some equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderLock {
    Male,
    Female,
}

/// Flat stat deltas an equipped item contributes. hp/mp deltas raise the
/// wearer's maximums rather than current values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBonuses {
    pub hp: i32,
    pub mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub crit_rate: f64,
    pub crit_dmg: f64,
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the flat integer bonuses, used for rough item scoring.
    pub fn flat_total(&self) -> i32 {
        self.hp + self.mp + self.attack + self.defense + self.speed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub slot: SlotKind,
    pub name: String,
    pub rarity: Rarity,
    pub bonuses: StatBonuses,
    pub gender_lock: Option<GenderLock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Rare < Rarity::Elite);
        assert!(Rarity::Mythic < Rarity::Transcendent);
    }

    #[test]
    fn test_rarity_all_is_ascending() {
        let all = Rarity::all();
        assert_eq!(all.len(), Rarity::COUNT);
        for (i, tier) in all.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn test_rarity_names() {
        assert_eq!(Rarity::Common.name(), "Common");
        assert_eq!(Rarity::Transcendent.name(), "Transcendent");
    }

    #[test]
    fn test_slot_layout() {
        let layout = SlotKind::layout();
        assert_eq!(layout[0], SlotKind::Weapon);
        assert_eq!(layout[1], SlotKind::Armor);
        assert_eq!(layout[2], SlotKind::Accessory);
        assert_eq!(layout[3], SlotKind::Accessory);
    }

    #[test]
    fn test_stat_bonuses_flat_total() {
        let bonuses = StatBonuses {
            hp: 10,
            mp: 5,
            attack: 3,
            defense: 2,
            speed: 1,
            crit_rate: 0.05,
            crit_dmg: 0.2,
        };
        assert_eq!(bonuses.flat_total(), 21);
    }

    #[test]
    fn test_equipment_item_creation() {
        let item = EquipmentItem {
            slot: SlotKind::Weapon,
            name: "Iron Sword".to_string(),
            rarity: Rarity::Common,
            bonuses: StatBonuses {
                attack: 4,
                ..StatBonuses::new()
            },
            gender_lock: None,
        };
        assert_eq!(item.slot, SlotKind::Weapon);
        assert_eq!(item.bonuses.attack, 4);
        assert!(item.gender_lock.is_none());
    }
}
