//! Populating a floor with monsters

use crate::SPAWN_SAFE_RADIUS_SQ;
use crate::combat::CombatStats;
use crate::dungeon::{Grid, GridPosition, TileType};
use crate::entity::{Actor, EntityId, Registry};
use crate::rng::GameRng;

use super::{AiState, Species, species_for_floor};

/// Build a monster of `species` scaled for `floor`.
///
/// Each floor past the species' first adds 2 hp and every second one adds 1
/// attack. Energy starts empty so the player moves first.
pub fn create_monster(species: &Species, pos: GridPosition, floor: i32) -> Actor {
    let depth = (floor - species.min_floor).max(0);
    let stats = CombatStats {
        attack: species.attack + depth / 2,
        defense: species.defense,
        ..CombatStats::default()
    };

    let mut actor = Actor::new(species.name, species.symbol, pos, species.speed)
        .with_health(species.hp + depth * 2)
        .with_stats(stats)
        .with_ai(AiState::new(species.ai, species.sight_range));
    actor.exp_value = species.exp;
    actor
}

/// Place monsters on the current floor.
///
/// Spawns `max(2, 3 + floor ± 2)` monsters on free Floor or Corridor tiles
/// more than five tiles from the player, picking species by weight. Returns
/// the spawned handles; fewer than requested when candidate tiles run out.
pub fn spawn_monsters_for_floor(
    registry: &mut Registry,
    grid: &mut Grid,
    floor: i32,
    player_pos: GridPosition,
    rng: &mut GameRng,
) -> Vec<EntityId> {
    let count = (3 + floor + rng.range(-2, 2)).max(2);

    let mut candidates: Vec<GridPosition> = grid
        .positions()
        .filter(|p| {
            let typ = grid.at(p.x, p.y).typ;
            matches!(typ, TileType::Floor | TileType::Corridor)
                && p.distance_sq(player_pos) > SPAWN_SAFE_RADIUS_SQ
        })
        .collect();

    let available = species_for_floor(floor);
    let mut spawned = Vec::new();
    if candidates.is_empty() || available.is_empty() {
        return spawned;
    }
    let total_weight: f32 = available.iter().map(|s| s.weight).sum();

    for _ in 0..count {
        if candidates.is_empty() {
            break;
        }
        let idx = rng.rn2(candidates.len() as u32) as usize;
        let pos = candidates.swap_remove(idx);
        if grid.is_occupied(pos.x, pos.y) {
            continue;
        }

        let roll = rng.roll_f32(total_weight);
        let mut cumulative = 0.0;
        let species = available
            .iter()
            .find(|s| {
                cumulative += s.weight;
                roll <= cumulative
            })
            .unwrap_or(&available[0]);

        if let Some(id) = registry.spawn_actor(grid, create_monster(species, pos, floor)) {
            spawned.push(id);
        }
    }

    tracing::debug!(floor, requested = count, spawned = spawned.len(), "spawned monsters");
    spawned
}

/// Remove every non-player actor. Returns how many were removed.
pub fn clear_monsters(registry: &mut Registry, grid: &mut Grid) -> usize {
    let monsters: Vec<EntityId> = registry
        .actors()
        .filter(|(_, a)| !a.is_player)
        .map(|(id, _)| id)
        .collect();
    for &id in &monsters {
        registry.despawn(grid, id);
    }
    monsters.len()
}
