//! Entity store
//!
//! Actors and items live in one generational slot table. Tiles refer back to
//! them through [`EntityId`] handles; the registry keeps `Tile::occupant` and
//! `Tile::item` in step with every spawn, move and removal so that grid and
//! registry never disagree about where something stands.

mod actor;

pub use actor::{Actor, Item};

use serde::{Deserialize, Serialize};

use crate::dungeon::{Grid, GridPosition};

/// Generational handle to an actor or item.
///
/// A handle whose slot has been freed never resolves again, even after the
/// slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Entity {
    Actor(Box<Actor>),
    Item(Item),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owner of all actors and items on the current floor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn slot(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_ref())
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_mut())
    }

    fn release(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(entity)
    }

    /// Check if the handle refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.slot(id).is_some()
    }

    /// Place an actor on the grid.
    ///
    /// Fails when the position is out of bounds or already occupied.
    pub fn spawn_actor(&mut self, grid: &mut Grid, actor: Actor) -> Option<EntityId> {
        let pos = actor.pos;
        if grid.get(pos.x, pos.y).ok()?.occupant.is_some() {
            return None;
        }
        let id = self.insert(Entity::Actor(Box::new(actor)));
        grid.at_mut(pos.x, pos.y).occupant = Some(id);
        Some(id)
    }

    /// Remove an actor, clearing its tile back-reference first
    pub fn despawn(&mut self, grid: &mut Grid, id: EntityId) -> Option<Actor> {
        let pos = self.actor(id)?.pos;
        if let Ok(tile) = grid.get_mut(pos.x, pos.y) {
            if tile.occupant == Some(id) {
                tile.occupant = None;
            }
        }
        match self.release(id)? {
            Entity::Actor(actor) => Some(*actor),
            Entity::Item(_) => None,
        }
    }

    /// Move an actor to `to`, keeping both tiles' occupant fields in step.
    ///
    /// The caller checks walkability; this only refuses out-of-bounds or
    /// tiles held by another entity.
    pub fn relocate(&mut self, grid: &mut Grid, id: EntityId, to: GridPosition) -> bool {
        let Some(from) = self.actor(id).map(|a| a.pos) else {
            return false;
        };
        match grid.get(to.x, to.y) {
            Ok(tile) if tile.occupant.is_none() || tile.occupant == Some(id) => {}
            _ => return false,
        }

        if let Ok(tile) = grid.get_mut(from.x, from.y) {
            if tile.occupant == Some(id) {
                tile.occupant = None;
            }
        }
        grid.at_mut(to.x, to.y).occupant = Some(id);
        if let Some(actor) = self.actor_mut(id) {
            actor.pos = to;
        }
        true
    }

    /// Put an existing actor onto a different grid at `to`, keeping its
    /// handle. The grid it stood on before is left untouched.
    pub fn transfer(&mut self, grid: &mut Grid, id: EntityId, to: GridPosition) -> bool {
        if self.actor(id).is_none() {
            return false;
        }
        match grid.get_mut(to.x, to.y) {
            Ok(tile) if tile.occupant.is_none() => tile.occupant = Some(id),
            _ => return false,
        }
        if let Some(actor) = self.actor_mut(id) {
            actor.pos = to;
        }
        true
    }

    /// Put an item on the grid. Fails if the tile already holds one.
    pub fn place_item(&mut self, grid: &mut Grid, item: Item) -> Option<EntityId> {
        let pos = item.pos;
        if grid.get(pos.x, pos.y).ok()?.item.is_some() {
            return None;
        }
        let id = self.insert(Entity::Item(item));
        grid.at_mut(pos.x, pos.y).item = Some(id);
        Some(id)
    }

    /// Take an item off the grid
    pub fn remove_item(&mut self, grid: &mut Grid, id: EntityId) -> Option<Item> {
        let pos = self.item(id)?.pos;
        if let Ok(tile) = grid.get_mut(pos.x, pos.y) {
            if tile.item == Some(id) {
                tile.item = None;
            }
        }
        match self.release(id)? {
            Entity::Item(item) => Some(item),
            Entity::Actor(_) => None,
        }
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        match self.slot(id)? {
            Entity::Actor(actor) => Some(actor.as_ref()),
            Entity::Item(_) => None,
        }
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        match self.slot_mut(id)? {
            Entity::Actor(actor) => Some(actor.as_mut()),
            Entity::Item(_) => None,
        }
    }

    pub fn item(&self, id: EntityId) -> Option<&Item> {
        match self.slot(id)? {
            Entity::Item(item) => Some(item),
            Entity::Actor(_) => None,
        }
    }

    /// Live actors in slot order
    pub fn actors(&self) -> impl Iterator<Item = (EntityId, &Actor)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match &slot.entity {
            Some(Entity::Actor(actor)) => Some((
                EntityId {
                    index: i as u32,
                    generation: slot.generation,
                },
                actor.as_ref(),
            )),
            _ => None,
        })
    }

    /// Live items in slot order
    pub fn items(&self) -> impl Iterator<Item = (EntityId, &Item)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match &slot.entity {
            Some(Entity::Item(item)) => Some((
                EntityId {
                    index: i as u32,
                    generation: slot.generation,
                },
                item,
            )),
            _ => None,
        })
    }

    /// Handles of all live actors in slot order
    pub fn actor_ids(&self) -> Vec<EntityId> {
        self.actors().map(|(id, _)| id).collect()
    }

    /// The first actor flagged as the player
    pub fn player(&self) -> Option<EntityId> {
        self.actors().find(|(_, a)| a.is_player).map(|(id, _)| id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors().count()
    }
}
