//! BSP dungeon generation
//!
//! The interior of the map is recursively split into regions. Each leaf
//! region receives one room, sibling subtrees are joined by L-shaped
//! corridors, and stairs go into the two rooms whose centers are furthest
//! apart. Generation is a pure function of the seed and config.

use serde::{Deserialize, Serialize};

use crate::{FLOOR_SEED_STRIDE, MAX_MAP_DIMENSION};
use crate::rng::GameRng;

use super::corridor::carve_l_corridor;
use super::{Grid, GridPosition, Rect, TileType};

/// Errors reported by [`GeneratorConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub split_depth: i32,
    /// Reserved; the BSP generator places no doors.
    pub door_chance: f32,
    /// 0 draws a seed from entropy
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            min_room_size: 5,
            max_room_size: 12,
            split_depth: 5,
            door_chance: 0.3,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Config for a given floor: deeper floors split further and get their
    /// own seed derived from `base_seed`.
    pub fn for_floor(width: i32, height: i32, floor: i32, base_seed: u64) -> Self {
        Self {
            width,
            height,
            min_room_size: 4,
            max_room_size: 10,
            split_depth: 4 + floor / 3,
            seed: base_seed.wrapping_add((floor.max(0) as u64).wrapping_mul(FLOOR_SEED_STRIDE)),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "map size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.width > MAX_MAP_DIMENSION || self.height > MAX_MAP_DIMENSION {
            return Err(GenerationError::InvalidConfig(format!(
                "map size {}x{} exceeds {MAX_MAP_DIMENSION}",
                self.width, self.height
            )));
        }
        if self.min_room_size <= 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "min_room_size {} must be positive",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(GenerationError::InvalidConfig(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.split_depth < 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "split_depth {} must not be negative",
                self.split_depth
            )));
        }
        if !(0.0..=1.0).contains(&self.door_chance) {
            return Err(GenerationError::InvalidConfig(format!(
                "door_chance {} outside 0..=1",
                self.door_chance
            )));
        }
        Ok(())
    }
}

/// What a generation run produced besides the tiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFloor {
    /// Seed actually used
    pub seed: u64,
    /// Rooms in leaf order
    pub rooms: Vec<Rect>,
    /// None when fewer than two rooms exist
    pub stairs_up: Option<GridPosition>,
    pub stairs_down: Option<GridPosition>,
}

/// A node of the partition tree
#[derive(Debug, Clone)]
pub struct BspNode {
    pub bounds: Rect,
    pub room: Option<Rect>,
    children: Option<Box<(BspNode, BspNode)>>,
}

// Room size limits after clamping an unvalidated config
struct RoomLimits {
    min: i32,
    max: i32,
    split_depth: i32,
}

impl BspNode {
    fn leaf(bounds: Rect) -> Self {
        Self {
            bounds,
            room: None,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<(&BspNode, &BspNode)> {
        self.children.as_deref().map(|(l, r)| (l, r))
    }

    /// Check if any node in this subtree holds a room
    pub fn has_rooms(&self) -> bool {
        self.room.is_some()
            || self
                .children()
                .is_some_and(|(l, r)| l.has_rooms() || r.has_rooms())
    }

    fn split(&mut self, depth: i32, limits: &RoomLimits, rng: &mut GameRng) {
        if depth >= limits.split_depth {
            return;
        }

        let b = self.bounds;
        let min_size = limits.min * 2 + 3;
        if b.w < min_size && b.h < min_size {
            return;
        }

        // A horizontal cut divides the height
        let horizontal = if b.w < min_size {
            true
        } else if b.h < min_size {
            false
        } else {
            rng.coin()
        };

        let span = if horizontal { b.h } else { b.w };
        let min_split = limits.min + 2;
        let max_split = span - limits.min - 2;
        if max_split <= min_split {
            return;
        }
        let at = rng.range(min_split, max_split);

        let (left, right) = if horizontal {
            (
                Rect::new(b.x, b.y, b.w, at),
                Rect::new(b.x, b.y + at, b.w, b.h - at),
            )
        } else {
            (
                Rect::new(b.x, b.y, at, b.h),
                Rect::new(b.x + at, b.y, b.w - at, b.h),
            )
        };

        let mut children = Box::new((BspNode::leaf(left), BspNode::leaf(right)));
        children.0.split(depth + 1, limits, rng);
        children.1.split(depth + 1, limits, rng);
        self.children = Some(children);
    }

    fn create_rooms(
        &mut self,
        grid: &mut Grid,
        limits: &RoomLimits,
        rng: &mut GameRng,
        rooms: &mut Vec<Rect>,
    ) {
        if let Some(children) = self.children.as_mut() {
            children.0.create_rooms(grid, limits, rng, rooms);
            children.1.create_rooms(grid, limits, rng, rooms);
            return;
        }

        let b = self.bounds;
        let max_w = limits.max.min(b.w - 2);
        let max_h = limits.max.min(b.h - 2);
        if limits.min > max_w || limits.min > max_h {
            return;
        }

        let w = rng.range(limits.min, max_w);
        let h = rng.range(limits.min, max_h);
        let x = rng.range(b.x + 1, b.x + b.w - w - 1);
        let y = rng.range(b.y + 1, b.y + b.h - h - 1);
        let room = Rect::new(x, y, w, h);

        for pos in room.cells() {
            grid.set_type(pos.x, pos.y, TileType::Floor);
        }
        self.room = Some(room);
        rooms.push(room);
    }

    fn connect(&self, grid: &mut Grid, rng: &mut GameRng) {
        let Some((left, right)) = self.children() else {
            return;
        };
        left.connect(grid, rng);
        right.connect(grid, rng);

        if let (Some(a), Some(b)) = (left.pick_room(rng), right.pick_room(rng)) {
            carve_l_corridor(grid, a.center(), b.center(), rng);
        }
    }

    /// A room from this subtree, descending into a random child that has one
    fn pick_room(&self, rng: &mut GameRng) -> Option<Rect> {
        if self.room.is_some() {
            return self.room;
        }
        let (left, right) = self.children()?;
        match (left.has_rooms(), right.has_rooms()) {
            (true, true) => {
                if rng.coin() {
                    left.pick_room(rng)
                } else {
                    right.pick_room(rng)
                }
            }
            (true, false) => left.pick_room(rng),
            (false, true) => right.pick_room(rng),
            (false, false) => None,
        }
    }
}

/// Generate into `grid`, seeding from `config.seed` (or entropy when 0)
pub fn generate(grid: &mut Grid, config: &GeneratorConfig) -> GeneratedFloor {
    let mut rng = if config.seed == 0 {
        GameRng::from_entropy()
    } else {
        GameRng::new(config.seed)
    };
    generate_with_rng(grid, config, &mut rng)
}

/// Generate into `grid` drawing from a caller-supplied generator.
///
/// `config.seed` is ignored; the result records `rng.seed()`.
pub fn generate_with_rng(
    grid: &mut Grid,
    config: &GeneratorConfig,
    rng: &mut GameRng,
) -> GeneratedFloor {
    let width = config.width.clamp(1, MAX_MAP_DIMENSION);
    let height = config.height.clamp(1, MAX_MAP_DIMENSION);
    let min = config.min_room_size.max(1);
    let limits = RoomLimits {
        min,
        max: config.max_room_size.max(min),
        split_depth: config.split_depth,
    };

    grid.initialize(width, height);
    grid.fill(TileType::Wall);

    let mut root = BspNode::leaf(Rect::new(1, 1, width - 2, height - 2));
    root.split(0, &limits, rng);

    let mut rooms = Vec::new();
    root.create_rooms(grid, &limits, rng, &mut rooms);
    root.connect(grid, rng);

    let (stairs_up, stairs_down) = match place_stairs(grid, &rooms) {
        Some((up, down)) => (Some(up), Some(down)),
        None => (None, None),
    };

    tracing::debug!(
        seed = rng.seed(),
        width,
        height,
        rooms = rooms.len(),
        ?stairs_up,
        ?stairs_down,
        "generated dungeon"
    );

    GeneratedFloor {
        seed: rng.seed(),
        rooms,
        stairs_up,
        stairs_down,
    }
}

/// Generate a fresh grid for `floor` using [`GeneratorConfig::for_floor`]
pub fn generate_floor(
    width: i32,
    height: i32,
    floor: i32,
    base_seed: u64,
) -> (Grid, GeneratedFloor) {
    let config = GeneratorConfig::for_floor(width, height, floor, base_seed);
    let mut grid = Grid::default();
    let generated = generate(&mut grid, &config);
    grid.current_floor = floor;
    (grid, generated)
}

// Stairs go in the pair of rooms with the largest squared center distance.
fn place_stairs(grid: &mut Grid, rooms: &[Rect]) -> Option<(GridPosition, GridPosition)> {
    if rooms.len() < 2 {
        return None;
    }

    let mut best = (0, 1);
    let mut max_dist = 0;
    for i in 0..rooms.len() {
        for j in i + 1..rooms.len() {
            let dist = rooms[i].center().distance_sq(rooms[j].center());
            if dist > max_dist {
                max_dist = dist;
                best = (i, j);
            }
        }
    }

    let up = rooms[best.0].center();
    let down = rooms[best.1].center();
    grid.set_type(up.x, up.y, TileType::StairsUp);
    grid.set_type(down.x, down.y, TileType::StairsDown);
    Some((up, down))
}

/// Random Floor tile, or None when the grid has no floor
pub fn random_floor_position(grid: &Grid, rng: &mut GameRng) -> Option<GridPosition> {
    let floors = grid.find_all(TileType::Floor);
    rng.choose(&floors).copied()
}
