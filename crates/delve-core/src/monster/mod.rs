//! Monster system
//!
//! AI decisions, the species table and floor population.

mod ai;
mod species;
mod spawner;

pub use ai::{AiState, AiType, decide_action, move_towards, random_move};
pub use species::{SPECIES, Species, find_species, species_for_floor};
pub use spawner::{clear_monsters, create_monster, spawn_monsters_for_floor};
