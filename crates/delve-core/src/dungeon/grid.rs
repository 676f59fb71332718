//! Dense tile storage for one dungeon floor

use serde::{Deserialize, Serialize};

use crate::MAX_MAP_DIMENSION;

use super::{GridPosition, Tile, TileType};

/// Errors from checked grid access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("tile ({x}, {y}) out of range for {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Map data for a single floor
///
/// Tiles are stored row-major. Out-of-range access through [`Grid::at`] is a
/// precondition violation; use [`Grid::in_bounds`] or the checked
/// [`Grid::get`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,

    /// Floor number this grid was generated for
    pub current_floor: i32,
}

impl Grid {
    /// Create a grid filled with Void tiles
    pub fn new(width: i32, height: i32) -> Self {
        let mut grid = Self::default();
        grid.initialize(width, height);
        grid
    }

    /// Reallocate to `width` x `height` and fill every tile with Void.
    ///
    /// Each dimension is clamped to `0..=MAX_MAP_DIMENSION`.
    pub fn initialize(&mut self, width: i32, height: i32) {
        self.width = width.clamp(0, MAX_MAP_DIMENSION);
        self.height = height.clamp(0, MAX_MAP_DIMENSION);
        self.tiles = vec![Tile::default(); (self.width * self.height) as usize];
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Tile at (x, y). Panics when out of bounds.
    pub fn at(&self, x: i32, y: i32) -> &Tile {
        assert!(self.in_bounds(x, y), "tile ({x}, {y}) out of range");
        &self.tiles[self.index(x, y)]
    }

    /// Mutable tile at (x, y). Panics when out of bounds.
    pub fn at_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        assert!(self.in_bounds(x, y), "tile ({x}, {y}) out of range");
        let idx = self.index(x, y);
        &mut self.tiles[idx]
    }

    /// Checked tile access
    pub fn get(&self, x: i32, y: i32) -> Result<&Tile, GridError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        Ok(&self.tiles[self.index(x, y)])
    }

    /// Checked mutable tile access
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, GridError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        let idx = self.index(x, y);
        Ok(&mut self.tiles[idx])
    }

    fn out_of_range(&self, x: i32, y: i32) -> GridError {
        GridError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Tile at a position, or None when out of bounds
    pub fn tile(&self, pos: GridPosition) -> Option<&Tile> {
        self.get(pos.x, pos.y).ok()
    }

    /// Set the terrain type of an in-bounds tile. Out-of-range writes are ignored.
    pub fn set_type(&mut self, x: i32, y: i32, typ: TileType) {
        if let Ok(tile) = self.get_mut(x, y) {
            tile.typ = typ;
        }
    }

    /// Fill every tile with the given terrain, keeping flags and references
    pub fn fill(&mut self, typ: TileType) {
        for tile in &mut self.tiles {
            tile.typ = typ;
        }
    }

    /// False for anything out of bounds
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_ok_and(Tile::is_walkable)
    }

    /// True for anything out of bounds
    pub fn blocks_vision(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, Tile::blocks_vision)
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_ok_and(|t| t.occupant.is_some())
    }

    /// Reset the visible flag on every tile. Explored flags are kept.
    pub fn clear_visible(&mut self) {
        for tile in &mut self.tiles {
            tile.visible = false;
        }
    }

    /// Mark a tile visible and explored
    pub fn set_visible(&mut self, x: i32, y: i32) {
        if let Ok(tile) = self.get_mut(x, y) {
            tile.visible = true;
            tile.explored = true;
        }
    }

    /// Iterate over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPosition::new(x, y)))
    }

    /// Positions of all tiles of the given type
    pub fn find_all(&self, typ: TileType) -> Vec<GridPosition> {
        self.positions()
            .filter(|p| self.at(p.x, p.y).typ == typ)
            .collect()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fills_void() {
        let grid = Grid::new(6, 4);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.tiles().len(), 24);
        assert!(grid.tiles().iter().all(|t| t.typ == TileType::Void));
    }

    #[test]
    fn test_initialize_clamps_dimensions() {
        let grid = Grid::new(-3, i32::MAX);
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), MAX_MAP_DIMENSION);
        assert!(grid.tiles().is_empty());

        let grid = Grid::new(MAX_MAP_DIMENSION + 1, 2);
        assert_eq!(grid.width(), MAX_MAP_DIMENSION);
        assert_eq!(grid.tiles().len(), (MAX_MAP_DIMENSION * 2) as usize);
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new(3, 3);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(3, 0));
        assert!(!grid.in_bounds(0, -1));
    }

    #[test]
    fn test_checked_access_out_of_range() {
        let mut grid = Grid::new(3, 2);
        assert_eq!(
            grid.get(5, 1).unwrap_err(),
            GridError::OutOfRange {
                x: 5,
                y: 1,
                width: 3,
                height: 2
            }
        );
        assert!(grid.get_mut(-1, 0).is_err());
    }

    #[test]
    #[should_panic]
    fn test_unchecked_access_panics() {
        let grid = Grid::new(2, 2);
        let _ = grid.at(2, 0);
    }

    #[test]
    fn test_walkable_and_vision_queries() {
        let mut grid = Grid::new(3, 1);
        grid.set_type(0, 0, TileType::Floor);
        grid.set_type(1, 0, TileType::Water);
        grid.set_type(2, 0, TileType::DoorClosed);

        assert!(grid.is_walkable(0, 0));
        assert!(!grid.is_walkable(1, 0));
        assert!(!grid.blocks_vision(1, 0));
        assert!(grid.blocks_vision(2, 0));
        assert!(grid.blocks_vision(9, 9));
        assert!(!grid.is_walkable(-1, 0));
    }

    #[test]
    fn test_visibility_flags() {
        let mut grid = Grid::new(2, 2);
        grid.set_visible(1, 1);
        assert!(grid.at(1, 1).visible);
        assert!(grid.at(1, 1).explored);

        grid.clear_visible();
        assert!(!grid.at(1, 1).visible);
        assert!(grid.at(1, 1).explored);
    }

    #[test]
    fn test_find_all() {
        let mut grid = Grid::new(4, 4);
        grid.set_type(1, 2, TileType::StairsDown);
        assert_eq!(
            grid.find_all(TileType::StairsDown),
            vec![GridPosition::new(1, 2)]
        );
    }
}
