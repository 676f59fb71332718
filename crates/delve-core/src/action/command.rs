//! Action commands and movement directions

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::GridPosition;

/// Eight compass directions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// All directions, row by row from the top-left neighbour
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Get the delta (dx, dy) for this direction
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// Get direction from delta values, or None for (0, 0) and longer steps
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (-1, -1) => Some(Direction::NorthWest),
            (0, -1) => Some(Direction::North),
            (1, -1) => Some(Direction::NorthEast),
            (-1, 0) => Some(Direction::West),
            (1, 0) => Some(Direction::East),
            (-1, 1) => Some(Direction::SouthWest),
            (0, 1) => Some(Direction::South),
            (1, 1) => Some(Direction::SouthEast),
            _ => None,
        }
    }

    pub const fn is_cardinal(&self) -> bool {
        matches!(
            self,
            Direction::North | Direction::South | Direction::East | Direction::West
        )
    }
}

/// A command waiting to be executed for one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionCommand {
    /// Nothing pending
    #[default]
    None,
    Move { dx: i32, dy: i32 },
    Wait,
    PickUp,
    Use { slot: u32 },
    Drop { slot: u32 },
    Open,
    Close,
    Descend,
    Ascend,
    Attack { target: GridPosition },
}

impl ActionCommand {
    /// Single step in a direction
    pub const fn step(dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        ActionCommand::Move { dx, dy }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, ActionCommand::None)
    }

    /// Check if this is a one-tile orthogonal move, the only kind of
    /// movement the player may submit
    pub const fn is_cardinal_move(&self) -> bool {
        match self {
            ActionCommand::Move { dx, dy } => {
                (dx.abs() == 1 && *dy == 0) || (*dx == 0 && dy.abs() == 1)
            }
            _ => false,
        }
    }
}
