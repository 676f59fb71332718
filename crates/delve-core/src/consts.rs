//! Core engine constants

/// Energy an actor needs to act, and the cost of one action
pub const ENERGY_THRESHOLD: i32 = 100;

/// Speed of a baseline actor
pub const NORMAL_SPEED: i32 = 100;

/// Turns a hostile monster keeps chasing the last known player position
pub const MAX_LOST_TURNS: i32 = 5;

/// Distance below which a monster counts as adjacent (covers diagonals)
pub const ADJACENT_RANGE: f32 = 1.5;

/// Default monster sight range in tiles
pub const DEFAULT_SIGHT_RANGE: i32 = 8;

/// Largest width or height a grid may have
pub const MAX_MAP_DIMENSION: i32 = 1024;

/// Largest sight radius accepted from options
pub const MAX_SIGHT_RANGE: i32 = 255;

/// Seed stride between consecutive floors
pub const FLOOR_SEED_STRIDE: u64 = 12345;

/// Deepest reachable floor unless overridden by options
pub const MAX_FLOOR: i32 = 10;

/// Squared distance from the player inside which monsters never spawn
pub const SPAWN_SAFE_RADIUS_SQ: i32 = 25;

/// Messages kept in the game loop's log
pub const MESSAGE_LOG_LEN: usize = 50;
