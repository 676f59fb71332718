//! Corridor carving and connectivity checks

use std::collections::{HashSet, VecDeque};

use crate::rng::GameRng;

use super::{Grid, GridPosition, TileType};

/// Carve an L-shaped corridor between two points.
///
/// A coin flip picks whether the horizontal or the vertical leg comes first.
pub fn carve_l_corridor(grid: &mut Grid, from: GridPosition, to: GridPosition, rng: &mut GameRng) {
    if rng.coin() {
        carve_horizontal(grid, from.x, to.x, from.y);
        carve_vertical(grid, from.y, to.y, to.x);
    } else {
        carve_vertical(grid, from.y, to.y, from.x);
        carve_horizontal(grid, from.x, to.x, to.y);
    }
}

/// Carve a horizontal run at row `y`, inclusive of both ends
pub fn carve_horizontal(grid: &mut Grid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        dig(grid, x, y);
    }
}

/// Carve a vertical run at column `x`, inclusive of both ends
pub fn carve_vertical(grid: &mut Grid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        dig(grid, x, y);
    }
}

// Only solid rock is converted; room floor is never overwritten.
fn dig(grid: &mut Grid, x: i32, y: i32) {
    if let Ok(tile) = grid.get_mut(x, y) {
        if tile.typ == TileType::Wall {
            tile.typ = TileType::Corridor;
        }
    }
}

/// All walkable positions reachable from `start` with 4-connected steps.
///
/// Returns an empty set when `start` itself is not walkable.
pub fn reachable_from(grid: &Grid, start: GridPosition) -> HashSet<GridPosition> {
    let mut seen = HashSet::new();
    if !grid.is_walkable(start.x, start.y) {
        return seen;
    }

    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = pos.offset(dx, dy);
            if grid.is_walkable(next.x, next.y) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}
