//! delve-core: engine for a turn-based dungeon crawl
//!
//! This crate contains all game logic with no terminal I/O: BSP floor
//! generation, shadowcast field of view, energy-based turn scheduling,
//! monster AI, melee combat and the game loop tying them together.
//! Every random decision draws from an explicit [`GameRng`], so a seed
//! fully determines a session.

pub mod action;
pub mod combat;
pub mod dungeon;
pub mod entity;
pub mod monster;
pub mod options;
pub mod turn;
pub mod vision;

mod consts;
mod gameloop;
mod rng;

pub use consts::*;
pub use gameloop::{GameLoop, GameLoopError, GameLoopResult};
pub use rng::GameRng;
