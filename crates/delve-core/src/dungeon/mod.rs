//! Dungeon system
//!
//! Contains tile storage, map coordinates and BSP floor generation.

mod corridor;
mod generation;
mod grid;
mod position;
mod rect;
mod tile;

pub use corridor::{carve_horizontal, carve_l_corridor, carve_vertical, reachable_from};
pub use generation::{
    BspNode, GeneratedFloor, GenerationError, GeneratorConfig, generate, generate_floor,
    generate_with_rng, random_floor_position,
};
pub use grid::{Grid, GridError};
pub use position::GridPosition;
pub use rect::Rect;
pub use tile::{Tile, TileType};
