//! Combat system
//!
//! Melee attack resolution, death sweeps and experience awards.

mod stats;

pub use stats::{CombatStats, Experience, Health};

use crate::dungeon::Grid;
use crate::entity::{EntityId, Registry};
use crate::rng::GameRng;

/// Outcome of one attack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatResult {
    pub hit: bool,
    pub critical: bool,
    pub damage: i32,
    pub killed: bool,
    pub message: String,
}

/// Resolve a melee attack.
///
/// Hit chance is accuracy minus evasion, clamped to 5..=95 percent. A hit
/// deals the attacker's attack (scaled on a critical) with roughly 20%
/// variance, reduced by defense but never below 1. A defender brought to
/// zero hit points is marked dead. Returns a default (missed) result when
/// the defender has no health.
pub fn resolve_attack(
    registry: &mut Registry,
    attacker: EntityId,
    defender: EntityId,
    rng: &mut GameRng,
) -> CombatResult {
    let mut result = CombatResult::default();

    let Some(def) = registry.actor(defender) else {
        return result;
    };
    if def.health.is_none() {
        return result;
    }
    let def_name = def.name.clone();
    let def_stats = def.stats;

    let (atk_name, atk_stats) = registry
        .actor(attacker)
        .map(|a| (a.name.clone(), a.stats))
        .unwrap_or_else(|| ("something".to_string(), CombatStats::default()));

    let hit_chance = (atk_stats.accuracy - def_stats.evasion).clamp(5, 95);
    if (rng.rn2(100) as i32) >= hit_chance {
        result.message = format!("The {atk_name} misses the {def_name}.");
        return result;
    }
    result.hit = true;
    result.critical = (rng.rn2(100) as i32) < atk_stats.crit_chance;

    let mut base = atk_stats.attack;
    if result.critical {
        base = (base as f32 * atk_stats.crit_multiplier) as i32;
    }
    let variance = (base / 5).max(1);
    base += rng.rn2((variance * 2 + 1) as u32) as i32 - variance;
    result.damage = (base - def_stats.defense).max(1);

    if let Some(def) = registry.actor_mut(defender) {
        if let Some(health) = def.health.as_mut() {
            health.take_damage(result.damage);
            if !health.is_alive() {
                result.killed = true;
                def.dead = true;
            }
        }
    }

    result.message = if result.critical {
        format!(
            "The {atk_name} lands a critical hit on the {def_name} for {} damage!",
            result.damage
        )
    } else {
        format!(
            "The {atk_name} hits the {def_name} for {} damage.",
            result.damage
        )
    };
    if result.killed {
        result.message.push_str(&format!(" The {def_name} dies."));
    }

    tracing::debug!(
        attacker = %atk_name,
        defender = %def_name,
        damage = result.damage,
        critical = result.critical,
        killed = result.killed,
        "attack resolved"
    );
    result
}

/// Remove dead monsters from the registry and their tiles.
///
/// A dead player stays in place; the game loop turns that into game over.
pub fn process_deaths(registry: &mut Registry, grid: &mut Grid) -> Vec<EntityId> {
    let dead: Vec<EntityId> = registry
        .actors()
        .filter(|(_, a)| !a.is_player && !a.is_alive())
        .map(|(id, _)| id)
        .collect();

    for &id in &dead {
        registry.despawn(grid, id);
    }
    dead
}

/// Award experience and apply level-up bonuses.
///
/// Returns true on level up; false also when the actor has no experience
/// track.
pub fn give_experience(registry: &mut Registry, id: EntityId, amount: i32) -> bool {
    let Some(actor) = registry.actor_mut(id) else {
        return false;
    };
    let Some(exp) = actor.experience.as_mut() else {
        return false;
    };
    if !exp.add(amount) {
        return false;
    }
    let level = exp.level;

    if let Some(health) = actor.health.as_mut() {
        health.max += 5 + level / 3;
        health.current = health.max;
    }
    if level % 2 == 0 {
        actor.stats.attack += 1;
    }
    if level % 3 == 0 {
        actor.stats.defense += 1;
    }
    if level % 5 == 0 {
        actor.stats.crit_chance += 1;
    }
    tracing::info!(name = %actor.name, level, "level up");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{GridPosition, TileType};
    use crate::entity::Actor;

    fn arena() -> (Grid, Registry, EntityId, EntityId) {
        let mut grid = Grid::new(5, 5);
        grid.fill(TileType::Floor);
        let mut reg = Registry::new();
        let player = reg
            .spawn_actor(&mut grid, Actor::player(GridPosition::new(1, 1), 100, 30))
            .unwrap();
        let rat = reg
            .spawn_actor(
                &mut grid,
                Actor::new("rat", 'r', GridPosition::new(2, 1), 120).with_health(4),
            )
            .unwrap();
        (grid, reg, player, rat)
    }

    #[test]
    fn test_hits_deal_at_least_one() {
        let (_grid, mut reg, player, rat) = arena();
        reg.actor_mut(rat).unwrap().stats.defense = 50;
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            reg.actor_mut(rat).unwrap().health = Some(Health::new(1000));
            let r = resolve_attack(&mut reg, player, rat, &mut rng);
            if r.hit {
                assert_eq!(r.damage, 1);
            } else {
                assert_eq!(r.damage, 0);
            }
        }
    }

    #[test]
    fn test_hit_chance_clamped() {
        let (_grid, mut reg, player, rat) = arena();
        reg.actor_mut(player).unwrap().stats.accuracy = 0;
        let mut rng = GameRng::new(11);
        let mut hits = 0;
        for _ in 0..2000 {
            reg.actor_mut(rat).unwrap().health = Some(Health::new(1000));
            if resolve_attack(&mut reg, player, rat, &mut rng).hit {
                hits += 1;
            }
        }
        // 5% floor
        assert!(hits > 40 && hits < 180, "hits = {hits}");
    }

    #[test]
    fn test_damage_variance_range() {
        let (_grid, mut reg, player, rat) = arena();
        {
            let p = reg.actor_mut(player).unwrap();
            p.stats.attack = 10;
            p.stats.crit_chance = 0;
        }
        let mut rng = GameRng::new(5);
        for _ in 0..200 {
            reg.actor_mut(rat).unwrap().health = Some(Health::new(1000));
            let r = resolve_attack(&mut reg, player, rat, &mut rng);
            if r.hit {
                assert!((8..=12).contains(&r.damage), "damage {}", r.damage);
            }
        }
    }

    #[test]
    fn test_kill_marks_dead_and_sweep_removes() {
        let (mut grid, mut reg, player, rat) = arena();
        let mut rng = GameRng::new(9);
        let mut result = CombatResult::default();
        for _ in 0..100 {
            result = resolve_attack(&mut reg, player, rat, &mut rng);
            if result.killed {
                break;
            }
        }
        assert!(result.killed);
        assert!(reg.actor(rat).unwrap().dead);

        let removed = process_deaths(&mut reg, &mut grid);
        assert_eq!(removed, vec![rat]);
        assert!(grid.at(2, 1).occupant.is_none());
        assert!(reg.contains(player));
    }

    #[test]
    fn test_dead_player_not_removed() {
        let (mut grid, mut reg, player, _rat) = arena();
        reg.actor_mut(player).unwrap().health = Some(Health { current: 0, max: 30 });
        assert!(process_deaths(&mut reg, &mut grid).is_empty());
        assert!(reg.contains(player));
    }

    #[test]
    fn test_defender_without_health() {
        let mut grid = Grid::new(3, 3);
        grid.fill(TileType::Floor);
        let mut reg = Registry::new();
        let a = reg
            .spawn_actor(&mut grid, Actor::new("a", 'a', GridPosition::new(0, 0), 100))
            .unwrap();
        let b = reg
            .spawn_actor(&mut grid, Actor::new("b", 'b', GridPosition::new(1, 0), 100))
            .unwrap();
        let mut rng = GameRng::new(1);
        assert_eq!(resolve_attack(&mut reg, a, b, &mut rng), CombatResult::default());
    }

    #[test]
    fn test_give_experience_levels_up() {
        let (_grid, mut reg, player, rat) = arena();
        assert!(!give_experience(&mut reg, rat, 500));
        assert!(give_experience(&mut reg, player, 100));
        let p = reg.actor(player).unwrap();
        assert_eq!(p.health.unwrap().max, 35);
        assert_eq!(p.health.unwrap().current, 35);
        assert_eq!(p.stats.attack, 4);
    }
}
