//! Lightweight line-of-sight raycast used by monster AI

use crate::dungeon::{Grid, GridPosition};

/// Check whether `to` can be seen from `from` within `range` tiles.
///
/// Walks the line in unit steps along the longer axis, rounding the other
/// axis to the nearest cell. Only intermediate cells are tested; the
/// endpoints themselves may block.
pub fn has_line_of_sight(grid: &Grid, from: GridPosition, to: GridPosition, range: i32) -> bool {
    if from.distance_sq(to) > range * range {
        return false;
    }

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return true;
    }

    let x_step = dx as f32 / steps as f32;
    let y_step = dy as f32 / steps as f32;
    let mut x = from.x as f32;
    let mut y = from.y as f32;

    for _ in 1..steps {
        x += x_step;
        y += y_step;
        let cx = (x + 0.5).floor() as i32;
        let cy = (y + 0.5).floor() as i32;
        if !grid.in_bounds(cx, cy) || grid.blocks_vision(cx, cy) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::TileType;

    fn open_grid() -> Grid {
        let mut grid = Grid::new(20, 20);
        grid.fill(TileType::Floor);
        grid
    }

    #[test]
    fn test_clear_line() {
        let grid = open_grid();
        assert!(has_line_of_sight(
            &grid,
            GridPosition::new(2, 2),
            GridPosition::new(8, 5),
            8
        ));
    }

    #[test]
    fn test_out_of_range() {
        let grid = open_grid();
        let from = GridPosition::new(0, 0);
        assert!(has_line_of_sight(&grid, from, GridPosition::new(3, 4), 5));
        assert!(!has_line_of_sight(&grid, from, GridPosition::new(4, 4), 5));
    }

    #[test]
    fn test_wall_blocks() {
        let mut grid = open_grid();
        grid.set_type(5, 5, TileType::Wall);
        assert!(!has_line_of_sight(
            &grid,
            GridPosition::new(2, 5),
            GridPosition::new(9, 5),
            10
        ));
    }

    #[test]
    fn test_closed_door_blocks_but_water_does_not() {
        let mut grid = open_grid();
        grid.set_type(4, 1, TileType::Water);
        assert!(has_line_of_sight(
            &grid,
            GridPosition::new(1, 1),
            GridPosition::new(8, 1),
            10
        ));
        grid.set_type(6, 1, TileType::DoorClosed);
        assert!(!has_line_of_sight(
            &grid,
            GridPosition::new(1, 1),
            GridPosition::new(8, 1),
            10
        ));
    }

    #[test]
    fn test_endpoints_not_checked() {
        let mut grid = open_grid();
        grid.set_type(3, 3, TileType::Wall);
        grid.set_type(4, 3, TileType::Wall);
        assert!(has_line_of_sight(
            &grid,
            GridPosition::new(3, 3),
            GridPosition::new(4, 3),
            2
        ));
        assert!(has_line_of_sight(
            &grid,
            GridPosition::new(3, 3),
            GridPosition::new(3, 3),
            0
        ));
    }
}
