//! Axis-aligned rectangles for BSP regions and rooms

use serde::{Deserialize, Serialize};

use super::GridPosition;

/// A rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Integer center, rounding toward the top-left
    pub const fn center(&self) -> GridPosition {
        GridPosition::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check if the rectangle has positive area
    pub const fn is_valid(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// Iterate over every cell inside the rectangle
    pub fn cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (self.y..self.bottom())
            .flat_map(move |y| (self.x..self.right()).map(move |x| GridPosition::new(x, y)))
    }
}
