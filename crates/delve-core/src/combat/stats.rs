//! Health, combat statistics and experience

use serde::{Deserialize, Serialize};

/// Hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    /// Full health with the given maximum
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub const fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Current over max; 0.0 when max is not positive
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Subtract damage, never going below zero
    pub fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    /// Restore hit points up to max
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Offensive and defensive numbers used by attack resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: i32,
    pub defense: i32,
    /// Percent
    pub accuracy: i32,
    /// Percent subtracted from the attacker's accuracy
    pub evasion: i32,
    /// Percent
    pub crit_chance: i32,
    pub crit_multiplier: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 1,
            defense: 0,
            accuracy: 80,
            evasion: 10,
            crit_chance: 5,
            crit_multiplier: 1.5,
        }
    }
}

/// Experience points and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub current: i32,
    pub level: i32,
    pub to_next_level: i32,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            current: 0,
            level: 1,
            to_next_level: Self::needed_for(1),
        }
    }
}

impl Experience {
    /// Points needed to leave `level`
    pub const fn needed_for(level: i32) -> i32 {
        100 + (level - 1) * 50
    }

    /// Add points; returns true on level up. At most one level per call.
    pub fn add(&mut self, amount: i32) -> bool {
        self.current += amount;
        if self.current >= self.to_next_level {
            self.current -= self.to_next_level;
            self.level += 1;
            self.to_next_level = Self::needed_for(self.level);
            return true;
        }
        false
    }
}
