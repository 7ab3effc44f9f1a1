//! Effective-stat resolution: folds equipped item bonuses into a
//! combatant's base attributes.
//!
//! Two modes exist because the result is used at different moments:
//! fresh assembly when a roster enters battle (full hp/mp), and live
//! refresh when equipment changes mid-session (current hp/mp keep their
//! percentage of the old maximums).

use super::attributes::Attributes;
use crate::core::constants::EQUIPMENT_SLOTS;
use crate::items::types::EquipmentItem;

/// Sum equipment deltas onto base stats. hp/mp item bonuses raise the
/// maximums; current hp/mp are left for the caller to settle.
fn resolve_totals(base: &Attributes, equipment: &[Option<EquipmentItem>; EQUIPMENT_SLOTS]) -> Attributes {
    let mut out = *base;
    for item in equipment.iter().flatten() {
        out.max_hp += item.bonuses.hp;
        out.max_mp += item.bonuses.mp;
        out.attack += item.bonuses.attack;
        out.defense += item.bonuses.defense;
        out.speed += item.bonuses.speed;
        out.crit_rate += item.bonuses.crit_rate;
        out.crit_dmg += item.bonuses.crit_dmg;
    }
    out.max_hp = out.max_hp.max(1);
    out.max_mp = out.max_mp.max(0);
    out
}

/// Fresh assembly: effective stats with hp and mp set to the new maximums.
pub fn resolve_fresh(
    base: &Attributes,
    equipment: &[Option<EquipmentItem>; EQUIPMENT_SLOTS],
) -> Attributes {
    let mut out = resolve_totals(base, equipment);
    out.hp = out.max_hp;
    out.mp = out.max_mp;
    out
}

/// Live refresh: effective stats with hp and mp rescaled to keep the same
/// percentage of the previous maximums. A combatant alive before the
/// refresh never drops below 1 hp.
pub fn resolve_refresh(
    base: &Attributes,
    equipment: &[Option<EquipmentItem>; EQUIPMENT_SLOTS],
    previous: &Attributes,
) -> Attributes {
    let mut out = resolve_totals(base, equipment);

    let hp = (previous.hp_percent() * out.max_hp as f64).round() as i32;
    let mp = (previous.mp_percent() * out.max_mp as f64).round() as i32;
    out.hp = hp.clamp(0, out.max_hp);
    out.mp = mp.clamp(0, out.max_mp);

    if previous.is_alive() && out.hp < 1 {
        out.hp = 1;
    }
    out
}
