//! Weighted reward rolling with pity, rate-up, and duplicate protection.

#![allow(unused_imports)]

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
