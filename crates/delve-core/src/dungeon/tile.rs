//! Map tile types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::entity::EntityId;

/// Terrain type of a single tile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileType {
    /// Not generated
    #[default]
    Void = 0,
    Floor = 1,
    Wall = 2,
    Corridor = 3,
    DoorClosed = 4,
    DoorOpen = 5,
    StairsUp = 6,
    StairsDown = 7,
    Water = 8,
    Lava = 9,
}

impl TileType {
    /// Check if an actor can stand here.
    ///
    /// Water and lava are impassable.
    pub const fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileType::Floor
                | TileType::Corridor
                | TileType::DoorOpen
                | TileType::StairsUp
                | TileType::StairsDown
        )
    }

    /// Check if this tile blocks line of sight
    pub const fn blocks_vision(&self) -> bool {
        matches!(self, TileType::Wall | TileType::DoorClosed | TileType::Void)
    }

    /// Check if this is a staircase
    pub const fn is_stairs(&self) -> bool {
        matches!(self, TileType::StairsUp | TileType::StairsDown)
    }

    /// Get the display character for this tile type
    pub const fn symbol(&self) -> char {
        match self {
            TileType::Void => ' ',
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Corridor => '#',
            TileType::DoorClosed => '+',
            TileType::DoorOpen => '\'',
            TileType::StairsUp => '<',
            TileType::StairsDown => '>',
            TileType::Water => '~',
            TileType::Lava => '~',
        }
    }
}

/// A single map tile
///
/// `occupant` and `item` are non-owning handles into the
/// [`Registry`](crate::entity::Registry); whoever moves or removes an entity
/// clears the stale side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain type
    pub typ: TileType,

    /// Has been seen at some point
    pub explored: bool,

    /// In the current field of view
    pub visible: bool,

    /// Actor standing here
    pub occupant: Option<EntityId>,

    /// Item lying here
    pub item: Option<EntityId>,
}

impl Tile {
    /// Create an unoccupied tile of the given type
    pub const fn of(typ: TileType) -> Self {
        Self {
            typ,
            explored: false,
            visible: false,
            occupant: None,
            item: None,
        }
    }

    pub const fn is_walkable(&self) -> bool {
        self.typ.is_walkable()
    }

    pub const fn blocks_vision(&self) -> bool {
        self.typ.blocks_vision()
    }
}
