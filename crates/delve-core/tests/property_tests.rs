//! Property-based tests using proptest
//!
//! Invariants that must hold for any seed:
//! - Generation: deterministic, connected, stairs on distinct walkable tiles
//! - FOV: the viewer always sees its own tile, visible implies explored
//! - Scheduling: each completed action costs exactly one threshold of energy

use proptest::prelude::*;

use delve_core::ENERGY_THRESHOLD;
use delve_core::action::ActionCommand;
use delve_core::dungeon::{GeneratorConfig, Grid, GridPosition, TileType, generate, reachable_from};
use delve_core::entity::{Actor, Registry};
use delve_core::turn::{TurnManager, TurnState};
use delve_core::vision::calculate_fov;

fn config(seed: u64, width: i32, height: i32) -> GeneratorConfig {
    GeneratorConfig {
        width,
        height,
        seed,
        ..GeneratorConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generation_is_deterministic(seed in 1u64.., width in 20i32..100, height in 15i32..60) {
        let mut a = Grid::default();
        let mut b = Grid::default();
        let fa = generate(&mut a, &config(seed, width, height));
        let fb = generate(&mut b, &config(seed, width, height));
        prop_assert_eq!(fa, fb);
        prop_assert!(a == b, "grids differ for seed {}", seed);
    }

    #[test]
    fn prop_generated_floor_is_connected(seed in 1u64.., width in 20i32..100, height in 15i32..60) {
        let mut grid = Grid::default();
        let floor = generate(&mut grid, &config(seed, width, height));
        if let (Some(up), Some(down)) = (floor.stairs_up, floor.stairs_down) {
            prop_assert_ne!(up, down);
            prop_assert_eq!(grid.at(up.x, up.y).typ, TileType::StairsUp);
            prop_assert_eq!(grid.at(down.x, down.y).typ, TileType::StairsDown);

            let reachable = reachable_from(&grid, up);
            for pos in grid.positions() {
                if grid.is_walkable(pos.x, pos.y) {
                    prop_assert!(reachable.contains(&pos), "seed {}: {:?} cut off", seed, pos);
                }
            }
        } else {
            prop_assert!(floor.rooms.len() < 2);
        }
    }

    #[test]
    fn prop_fov_viewer_always_visible(seed in 1u64.., radius in 0i32..12, pick in any::<prop::sample::Index>()) {
        let mut grid = Grid::default();
        generate(&mut grid, &config(seed, 60, 30));
        let viewers: Vec<GridPosition> = grid.positions().collect();
        let viewer = viewers[pick.index(viewers.len())];

        calculate_fov(&mut grid, viewer, radius);
        prop_assert!(grid.at(viewer.x, viewer.y).visible);
        for pos in grid.positions() {
            let tile = grid.at(pos.x, pos.y);
            if tile.visible {
                prop_assert!(tile.explored);
                prop_assert!(pos.distance_sq(viewer) <= radius * radius);
            }
        }
    }

    #[test]
    fn prop_energy_is_conserved(speeds in prop::collection::vec(1i32..=200, 1..6), steps in 1usize..200) {
        let mut grid = Grid::new(10, 1);
        grid.fill(TileType::Floor);
        let mut reg = Registry::new();
        let ids: Vec<_> = speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| {
                reg.spawn_actor(&mut grid, Actor::new("m", 'm', GridPosition::new(i as i32, 0), speed))
                    .unwrap()
            })
            .collect();

        let speed_sum: i64 = speeds.iter().map(|&s| s as i64).sum();
        let total = |reg: &Registry| -> i64 {
            ids.iter().map(|&id| reg.actor(id).unwrap().turn.energy as i64).sum()
        };

        let mut turns = TurnManager::new();
        for _ in 0..steps {
            let before = total(&reg);
            prop_assert_eq!(turns.update(&mut reg), TurnState::ProcessingTurns);
            let after = total(&reg);
            prop_assert!(after == before || after == before + speed_sum);

            if let Some(id) = turns.current_actor() {
                let actor = reg.actor_mut(id).unwrap();
                prop_assert!(actor.turn.energy >= ENERGY_THRESHOLD);
                actor.command = ActionCommand::Wait;
                turns.complete_action(&mut reg);
                prop_assert_eq!(total(&reg), after - ENERGY_THRESHOLD as i64);
            }
        }
    }
}
