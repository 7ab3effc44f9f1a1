//! Integration test: full battle lifecycle
//!
//! Drives a BattleSession end to end through the public crate surface:
//! equipment-aware assembly, contested initiative, repeated turns under
//! the basic resolver, defeat rotation across multi-member parties,
//! mid-battle refresh, and the terminal outcome report.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish::battle::{
    BasicActionResolver, BattleSession, CombatantSpec, Gender, RosterId, Side,
};
use skirmish::character::Attributes;
use skirmish::items::{generate_equipment, Rarity, SlotKind};

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(12345)
}

/// A roster member with a full set of seeded equipment.
fn equipped_spec(name: &str, seed: u64) -> CombatantSpec {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut spec = CombatantSpec::new(name, Gender::Female, Attributes::new());
    spec.equipment = [
        Some(generate_equipment(SlotKind::Weapon, Rarity::Rare, &mut rng)),
        Some(generate_equipment(SlotKind::Armor, Rarity::Rare, &mut rng)),
        Some(generate_equipment(SlotKind::Accessory, Rarity::Uncommon, &mut rng)),
        Some(generate_equipment(SlotKind::Accessory, Rarity::Common, &mut rng)),
    ];
    spec
}

fn two_party_session() -> BattleSession {
    let first = vec![equipped_spec("Seren", 1), equipped_spec("Kael", 2)];
    let second = vec![equipped_spec("Varek", 3), equipped_spec("Nyx", 4)];
    BattleSession::new(first, second, false)
}

#[test]
fn test_assembled_combatants_start_at_full_resolved_stats() {
    let mut session = two_party_session();
    let mut rng = create_test_rng();
    session.roll_initiative(&mut rng).unwrap();
    session.assign_sides(RosterId::First).unwrap();

    let state = session.state().unwrap();
    for member in state.player.members.iter().chain(state.opponent.members.iter()) {
        assert_eq!(member.effective.hp, member.effective.max_hp);
        assert_eq!(member.effective.mp, member.effective.max_mp);
        // Rare weapons and armor push effective maximums past the base.
        assert!(member.effective.max_hp >= Attributes::new().max_hp);
        assert!(member.is_alive());
    }
}

#[test]
fn test_battle_runs_to_a_terminal_outcome() {
    let mut session = two_party_session();
    let mut rng = create_test_rng();
    session.roll_initiative(&mut rng).unwrap();
    session.auto_assign_sides(&mut rng).unwrap();

    let mut resolver = BasicActionResolver::new(ChaCha8Rng::seed_from_u64(99));
    let mut turns = 0;
    while !session.is_over() {
        session.submit_turn("attack", &mut resolver).unwrap();
        turns += 1;
        assert!(turns < 500, "battle failed to terminate");
    }

    let report = session.outcome_report().expect("terminal battle has a report");
    assert!(report.victory.is_some());
    assert!(!report.is_arena);
    assert_eq!(report.player_condition.len(), 2);
    assert_eq!(report.opponent_condition.len(), 2);

    // The losing side is fully wiped.
    let loser = if report.victory == Some(true) {
        &report.opponent_condition
    } else {
        &report.player_condition
    };
    assert!(loser.iter().all(|c| c.hp_percent == 0.0));
}

#[test]
fn test_defeat_rotates_through_a_full_party() {
    let mut session = two_party_session();
    let mut rng = create_test_rng();
    session.roll_initiative(&mut rng).unwrap();
    session.assign_sides(RosterId::First).unwrap();

    let mut resolver = BasicActionResolver::new(ChaCha8Rng::seed_from_u64(7));
    let mut defeats = Vec::new();
    while !session.is_over() {
        let report = session.submit_turn("attack", &mut resolver).unwrap();
        if let Some(name) = report.opponent_defeated {
            defeats.push(name);
        }
        if let Some(name) = report.player_defeated {
            defeats.push(name);
        }
        if defeats.len() > 8 {
            panic!("more defeats than combatants");
        }
    }

    // Every member of the losing side went down exactly once.
    assert!(defeats.len() >= 2, "a two-member side must fall in full");
    let mut unique = defeats.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), defeats.len());
}

#[test]
fn test_flee_is_only_open_before_the_first_turn() {
    let mut rng = create_test_rng();

    let mut early = two_party_session();
    early.roll_initiative(&mut rng).unwrap();
    early.assign_sides(RosterId::Second).unwrap();
    assert!(early.flee().is_ok());

    let mut late = two_party_session();
    late.roll_initiative(&mut rng).unwrap();
    late.assign_sides(RosterId::Second).unwrap();
    let mut resolver = BasicActionResolver::new(ChaCha8Rng::seed_from_u64(3));
    late.submit_turn("attack", &mut resolver).unwrap();
    let returned = late.flee().expect_err("flee window must be closed");
    // The session comes back usable.
    assert!(!returned.is_over());
}

#[test]
fn test_mid_battle_refresh_applies_new_equipment() {
    let mut session = two_party_session();
    let mut rng = create_test_rng();
    session.roll_initiative(&mut rng).unwrap();
    session.assign_sides(RosterId::First).unwrap();

    let mut resolver = BasicActionResolver::new(ChaCha8Rng::seed_from_u64(21));
    session.submit_turn("attack", &mut resolver).unwrap();

    let before = session.state().unwrap().player.members[0].effective.clone();
    let hp_pct = before.hp_percent();

    // Upgrade the first player combatant to a transcendent loadout.
    let mut gear_rng = ChaCha8Rng::seed_from_u64(500);
    let equipment = [
        Some(generate_equipment(SlotKind::Weapon, Rarity::Transcendent, &mut gear_rng)),
        Some(generate_equipment(SlotKind::Armor, Rarity::Transcendent, &mut gear_rng)),
        None,
        None,
    ];
    session
        .refresh_combatant(Side::Player, 0, Attributes::new(), equipment)
        .unwrap();

    let after = &session.state().unwrap().player.members[0].effective;
    assert!(after.max_hp > before.max_hp, "transcendent gear raises max hp");
    assert!((after.hp_percent() - hp_pct).abs() < 0.01, "hp percentage carries over");
    assert!(after.hp >= 1);
}
