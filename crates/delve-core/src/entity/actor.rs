//! Actor and item records

use serde::{Deserialize, Serialize};

use crate::action::ActionCommand;
use crate::combat::{CombatStats, Experience, Health};
use crate::dungeon::GridPosition;
use crate::monster::AiState;
use crate::turn::TurnActor;

/// Anything that takes turns: the player or a monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub symbol: char,
    pub pos: GridPosition,

    /// Speed and accumulated energy
    pub turn: TurnActor,

    /// Pending command, reset to None once the action completes
    pub command: ActionCommand,

    /// Set while the turn manager waits for this actor's input
    pub awaiting_input: bool,

    /// Present on AI-controlled monsters
    pub ai: Option<AiState>,

    pub health: Option<Health>,
    pub stats: CombatStats,

    /// Tracked for the player only
    pub experience: Option<Experience>,

    pub is_player: bool,

    /// Experience awarded for killing this actor
    pub exp_value: i32,

    /// Marked by combat, removed by the next death sweep
    pub dead: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>, symbol: char, pos: GridPosition, speed: i32) -> Self {
        Self {
            name: name.into(),
            symbol,
            pos,
            turn: TurnActor::new(speed, false),
            command: ActionCommand::None,
            awaiting_input: false,
            ai: None,
            health: None,
            stats: CombatStats::default(),
            experience: None,
            is_player: false,
            exp_value: 0,
            dead: false,
        }
    }

    /// The player character
    pub fn player(pos: GridPosition, speed: i32, hp: i32) -> Self {
        let mut actor = Self::new("player", '@', pos, speed).with_health(hp);
        actor.is_player = true;
        actor.experience = Some(Experience::default());
        actor.turn.is_player = true;
        actor.stats.attack = 3;
        actor.stats.defense = 1;
        actor
    }

    pub fn with_ai(mut self, ai: AiState) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_health(mut self, hp: i32) -> Self {
        self.health = Some(Health::new(hp));
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && self.health.is_none_or(|h| h.is_alive())
    }

    /// Fraction of health remaining; actors without health count as full.
    pub fn health_ratio(&self) -> f32 {
        self.health.map_or(1.0, |h| h.ratio())
    }
}

/// An object lying on the floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub symbol: char,
    pub pos: GridPosition,
}

impl Item {
    pub fn new(name: impl Into<String>, symbol: char, pos: GridPosition) -> Self {
        Self {
            name: name.into(),
            symbol,
            pos,
        }
    }
}
