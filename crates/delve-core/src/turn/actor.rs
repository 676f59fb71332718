//! Per-actor energy accounting

use serde::{Deserialize, Serialize};

use crate::{ENERGY_THRESHOLD, NORMAL_SPEED};

/// Speed and accumulated energy of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnActor {
    /// Energy gained per tick; always positive
    pub speed: i32,
    pub energy: i32,
    pub is_player: bool,
}

impl TurnActor {
    /// New actor with empty energy. Non-positive speeds are raised to 1.
    pub fn new(speed: i32, is_player: bool) -> Self {
        Self {
            speed: speed.max(1),
            energy: 0,
            is_player,
        }
    }

    pub const fn can_act(&self) -> bool {
        self.energy >= ENERGY_THRESHOLD
    }

    /// One energy tick
    pub fn gain_energy(&mut self) {
        self.energy += self.speed;
    }

    /// Pay for one action; any excess carries over
    pub fn spend_energy(&mut self) {
        self.energy -= ENERGY_THRESHOLD;
    }
}

impl Default for TurnActor {
    fn default() -> Self {
        Self::new(NORMAL_SPEED, false)
    }
}
