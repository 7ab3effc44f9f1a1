//! Deterministic core for a party-based adventure game: battle sessions
//! with contested initiative and turn resolution, weighted reward
//! rolling with pity and duplicate protection, equipment-aware stat
//! resolution, and checksummed slot saves.
//!
//! All randomness is taken through `rand::Rng` parameters so every
//! roll-dependent path can be replayed under a seeded generator.

pub mod battle;
pub mod character;
pub mod core;
pub mod gacha;
pub mod items;
pub mod save;
