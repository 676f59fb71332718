//! Monster decision making
//!
//! Each call refreshes the monster's view of the player with a cheap
//! raycast, then picks one command according to its AI type. Only the
//! monster's AI state and command slot are written.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::action::{ActionCommand, Direction};
use crate::dungeon::{Grid, GridPosition};
use crate::entity::{EntityId, Registry};
use crate::rng::GameRng;
use crate::vision::has_line_of_sight;
use crate::{ADJACENT_RANGE, DEFAULT_SIGHT_RANGE, MAX_LOST_TURNS};

/// Behaviour profile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AiType {
    /// Chase and attack the player
    #[default]
    Hostile,
    /// Drift around at random with pauses
    Wander,
    /// Hostile until badly hurt, then flee
    Cowardly,
    /// Never moves
    Idle,
}

/// Per-monster AI memory, kept across turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    pub kind: AiType,
    pub sight_range: i32,
    pub can_see_player: bool,
    pub last_known_player: Option<GridPosition>,
    /// Consecutive decisions without sight of the player
    pub turns_lost_player: i32,
    pub wander_cooldown: i32,
}

impl AiState {
    pub fn new(kind: AiType, sight_range: i32) -> Self {
        Self {
            kind,
            sight_range,
            can_see_player: false,
            last_known_player: None,
            turns_lost_player: 0,
            wander_cooldown: 0,
        }
    }
}

impl Default for AiState {
    fn default() -> Self {
        Self::new(AiType::default(), DEFAULT_SIGHT_RANGE)
    }
}

/// Choose the next command for `monster` and store it in its command slot.
///
/// A monster without AI state, or with no player to react to, waits.
/// Returns the chosen command, or `ActionCommand::None` for an unknown
/// handle.
pub fn decide_action(
    registry: &mut Registry,
    grid: &Grid,
    monster: EntityId,
    player: EntityId,
    rng: &mut GameRng,
) -> ActionCommand {
    let Some(actor) = registry.actor(monster) else {
        return ActionCommand::None;
    };
    let pos = actor.pos;
    let health_ratio = actor.health_ratio();
    let ai = actor.ai;
    let player_pos = registry.actor(player).map(|p| p.pos);

    let (command, ai) = match (ai, player_pos) {
        (Some(mut ai), Some(target)) => {
            let command = think(&mut ai, grid, pos, target, health_ratio, rng);
            (command, Some(ai))
        }
        (ai, _) => (ActionCommand::Wait, ai),
    };

    if let Some(actor) = registry.actor_mut(monster) {
        actor.ai = ai;
        actor.command = command;
    }
    command
}

fn think(
    ai: &mut AiState,
    grid: &Grid,
    pos: GridPosition,
    player: GridPosition,
    health_ratio: f32,
    rng: &mut GameRng,
) -> ActionCommand {
    ai.can_see_player = has_line_of_sight(grid, pos, player, ai.sight_range);
    if ai.can_see_player {
        ai.last_known_player = Some(player);
        ai.turns_lost_player = 0;
    } else {
        ai.turns_lost_player += 1;
    }

    match ai.kind {
        AiType::Hostile => hostile(ai, grid, pos, player, rng),
        AiType::Wander => wander(ai, grid, pos, rng),
        AiType::Cowardly => {
            if health_ratio < 0.5 && ai.can_see_player {
                let flee = GridPosition::new(2 * pos.x - player.x, 2 * pos.y - player.y);
                move_towards(grid, pos, flee)
            } else {
                hostile(ai, grid, pos, player, rng)
            }
        }
        AiType::Idle => ActionCommand::Wait,
    }
}

fn hostile(
    ai: &AiState,
    grid: &Grid,
    pos: GridPosition,
    player: GridPosition,
    rng: &mut GameRng,
) -> ActionCommand {
    if pos.distance(player) < ADJACENT_RANGE {
        return ActionCommand::Attack { target: player };
    }
    if ai.can_see_player {
        return move_towards(grid, pos, player);
    }
    match ai.last_known_player {
        Some(last) if ai.turns_lost_player < MAX_LOST_TURNS => move_towards(grid, pos, last),
        _ => random_move(grid, pos, rng),
    }
}

fn wander(ai: &mut AiState, grid: &Grid, pos: GridPosition, rng: &mut GameRng) -> ActionCommand {
    if ai.wander_cooldown > 0 {
        ai.wander_cooldown -= 1;
        return ActionCommand::Wait;
    }
    let command = random_move(grid, pos, rng);
    ai.wander_cooldown = 1 + rng.rn2(3) as i32;
    command
}

fn can_move_to(grid: &Grid, pos: GridPosition) -> bool {
    grid.is_walkable(pos.x, pos.y) && !grid.is_occupied(pos.x, pos.y)
}

/// Greedy step toward `to`: the direct (possibly diagonal) step, then the
/// horizontal component alone, then the vertical one, else wait.
pub fn move_towards(grid: &Grid, from: GridPosition, to: GridPosition) -> ActionCommand {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();

    if can_move_to(grid, from.offset(dx, dy)) {
        return ActionCommand::Move { dx, dy };
    }
    if dx != 0 && can_move_to(grid, from.offset(dx, 0)) {
        return ActionCommand::Move { dx, dy: 0 };
    }
    if dy != 0 && can_move_to(grid, from.offset(0, dy)) {
        return ActionCommand::Move { dx: 0, dy };
    }
    ActionCommand::Wait
}

/// Step in the first open direction, starting the scan at a random one
pub fn random_move(grid: &Grid, from: GridPosition, rng: &mut GameRng) -> ActionCommand {
    let start = rng.rn2(8) as usize;
    for i in 0..Direction::ALL.len() {
        let dir = Direction::ALL[(start + i) % Direction::ALL.len()];
        let (dx, dy) = dir.delta();
        if can_move_to(grid, from.offset(dx, dy)) {
            return ActionCommand::step(dir);
        }
    }
    ActionCommand::Wait
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Health;
    use crate::dungeon::TileType;
    use crate::entity::Actor;

    fn open_grid(w: i32, h: i32) -> Grid {
        let mut grid = Grid::new(w, h);
        grid.fill(TileType::Wall);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                grid.set_type(x, y, TileType::Floor);
            }
        }
        grid
    }

    fn setup(
        grid: &mut Grid,
        kind: AiType,
        monster_at: (i32, i32),
        player_at: (i32, i32),
    ) -> (Registry, EntityId, EntityId) {
        let mut reg = Registry::new();
        let player = reg
            .spawn_actor(
                grid,
                Actor::player(GridPosition::new(player_at.0, player_at.1), 100, 30),
            )
            .unwrap();
        let monster = reg
            .spawn_actor(
                grid,
                Actor::new("goblin", 'g', GridPosition::new(monster_at.0, monster_at.1), 100)
                    .with_ai(AiState::new(kind, 8))
                    .with_health(10),
            )
            .unwrap();
        (reg, monster, player)
    }

    #[test]
    fn test_hostile_attacks_diagonal_neighbour() {
        let mut grid = open_grid(10, 10);
        let (mut reg, m, p) = setup(&mut grid, AiType::Hostile, (4, 4), (5, 5));
        let mut rng = GameRng::new(1);
        let cmd = decide_action(&mut reg, &grid, m, p, &mut rng);
        assert_eq!(
            cmd,
            ActionCommand::Attack {
                target: GridPosition::new(5, 5)
            }
        );
        assert_eq!(reg.actor(m).unwrap().command, cmd);
    }

    #[test]
    fn test_hostile_chases_visible_player() {
        let mut grid = open_grid(12, 12);
        let (mut reg, m, p) = setup(&mut grid, AiType::Hostile, (2, 2), (6, 4));
        let mut rng = GameRng::new(1);
        let cmd = decide_action(&mut reg, &grid, m, p, &mut rng);
        assert_eq!(cmd, ActionCommand::Move { dx: 1, dy: 1 });
        let ai = reg.actor(m).unwrap().ai.unwrap();
        assert!(ai.can_see_player);
        assert_eq!(ai.last_known_player, Some(GridPosition::new(6, 4)));
        assert_eq!(ai.turns_lost_player, 0);
    }

    #[test]
    fn test_move_towards_falls_back_to_axis_steps() {
        let mut grid = open_grid(10, 10);
        let from = GridPosition::new(3, 3);
        let to = GridPosition::new(7, 7);

        grid.set_type(4, 4, TileType::Wall);
        assert_eq!(move_towards(&grid, from, to), ActionCommand::Move { dx: 1, dy: 0 });

        grid.set_type(4, 3, TileType::Wall);
        assert_eq!(move_towards(&grid, from, to), ActionCommand::Move { dx: 0, dy: 1 });

        grid.set_type(3, 4, TileType::Wall);
        assert_eq!(move_towards(&grid, from, to), ActionCommand::Wait);
    }

    #[test]
    fn test_move_towards_own_tile_waits() {
        let mut grid = open_grid(6, 6);
        let (reg, m, _) = setup(&mut grid, AiType::Hostile, (2, 2), (4, 4));
        let pos = reg.actor(m).unwrap().pos;
        assert_eq!(move_towards(&grid, pos, pos), ActionCommand::Wait);
    }

    #[test]
    fn test_random_move_avoids_blocked_tiles() {
        let mut grid = open_grid(5, 5);
        // Only (3, 2) is open around (2, 2)
        for (x, y) in [(1, 1), (2, 1), (3, 1), (1, 2), (1, 3), (2, 3), (3, 3)] {
            grid.set_type(x, y, TileType::Wall);
        }
        let mut rng = GameRng::new(17);
        for _ in 0..20 {
            assert_eq!(
                random_move(&grid, GridPosition::new(2, 2), &mut rng),
                ActionCommand::Move { dx: 1, dy: 0 }
            );
        }
        grid.set_type(3, 2, TileType::Wall);
        assert_eq!(
            random_move(&grid, GridPosition::new(2, 2), &mut rng),
            ActionCommand::Wait
        );
    }

    #[test]
    fn test_wander_cooldown() {
        let mut grid = open_grid(10, 10);
        let (mut reg, m, p) = setup(&mut grid, AiType::Wander, (2, 2), (8, 8));
        let mut rng = GameRng::new(5);

        let first = decide_action(&mut reg, &grid, m, p, &mut rng);
        assert!(matches!(first, ActionCommand::Move { .. }));
        let cooldown = reg.actor(m).unwrap().ai.unwrap().wander_cooldown;
        assert!((1..=3).contains(&cooldown));

        for _ in 0..cooldown {
            assert_eq!(
                decide_action(&mut reg, &grid, m, p, &mut rng),
                ActionCommand::Wait
            );
        }
        assert_eq!(reg.actor(m).unwrap().ai.unwrap().wander_cooldown, 0);
        assert!(matches!(
            decide_action(&mut reg, &grid, m, p, &mut rng),
            ActionCommand::Move { .. }
        ));
    }

    #[test]
    fn test_cowardly_flees_when_hurt() {
        let mut grid = open_grid(12, 12);
        let (mut reg, m, p) = setup(&mut grid, AiType::Cowardly, (5, 5), (7, 5));
        let mut rng = GameRng::new(2);

        // Healthy: behaves like hostile
        assert_eq!(
            decide_action(&mut reg, &grid, m, p, &mut rng),
            ActionCommand::Move { dx: 1, dy: 0 }
        );

        reg.actor_mut(m).unwrap().health = Some(Health { current: 4, max: 10 });
        assert_eq!(
            decide_action(&mut reg, &grid, m, p, &mut rng),
            ActionCommand::Move { dx: -1, dy: 0 }
        );
    }

    #[test]
    fn test_idle_waits() {
        let mut grid = open_grid(10, 10);
        let (mut reg, m, p) = setup(&mut grid, AiType::Idle, (4, 4), (5, 4));
        let mut rng = GameRng::new(3);
        assert_eq!(
            decide_action(&mut reg, &grid, m, p, &mut rng),
            ActionCommand::Wait
        );
    }

    #[test]
    fn test_without_ai_state_waits() {
        let mut grid = open_grid(10, 10);
        let (mut reg, m, p) = setup(&mut grid, AiType::Hostile, (4, 4), (5, 4));
        reg.actor_mut(m).unwrap().ai = None;
        let mut rng = GameRng::new(3);
        assert_eq!(
            decide_action(&mut reg, &grid, m, p, &mut rng),
            ActionCommand::Wait
        );
    }
}
