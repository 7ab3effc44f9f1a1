use serde::{Deserialize, Serialize};

/// Combat stat bundle. `hp`/`mp` are current values and are always kept
/// inside `[0, max_hp]` / `[0, max_mp]` by the delta helpers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub crit_rate: f64,
    pub crit_dmg: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            hp: 100,
            max_hp: 100,
            mp: 50,
            max_mp: 50,
            attack: 10,
            defense: 5,
            speed: 10,
            crit_rate: 0.05,
            crit_dmg: 1.5,
        }
    }

    /// Apply an hp delta (negative = damage), clamping into [0, max_hp].
    pub fn apply_hp_delta(&mut self, delta: i32) {
        self.hp = (self.hp + delta).clamp(0, self.max_hp);
    }

    /// Apply an mp delta, clamping into [0, max_mp].
    pub fn apply_mp_delta(&mut self, delta: i32) {
        self.mp = (self.mp + delta).clamp(0, self.max_mp);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current hp as a fraction of max, 0.0 if max is zero.
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp > 0 {
            self.hp as f64 / self.max_hp as f64
        } else {
            0.0
        }
    }

    /// Current mp as a fraction of max, 0.0 if max is zero.
    pub fn mp_percent(&self) -> f64 {
        if self.max_mp > 0 {
            self.mp as f64 / self.max_mp as f64
        } else {
            0.0
        }
    }
}
