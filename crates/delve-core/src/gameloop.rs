//! Game loop
//!
//! One running session: the current floor, everything standing on it, the
//! scheduler and the session's random stream. Each [`GameLoop::tick`] lets
//! exactly one actor act, or reports that the player has to decide.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::MESSAGE_LOG_LEN;
use crate::action::{ActionCommand, execute_action};
use crate::combat::{give_experience, process_deaths, resolve_attack};
use crate::dungeon::{
    GeneratedFloor, Grid, GridPosition, TileType, generate_floor, random_floor_position,
};
use crate::entity::{Actor, EntityId, Registry};
use crate::monster::{clear_monsters, decide_action, spawn_monsters_for_floor};
use crate::options::GameOptions;
use crate::rng::GameRng;
use crate::turn::{TurnManager, TurnState};
use crate::vision::calculate_fov;

/// Error starting a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameLoopError {
    #[error("floor {0} has no tile to place the player on")]
    NoStartingPosition(i32),
}

/// Result of one game loop step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLoopResult {
    /// Someone acted, or energy was handed out
    Continue,
    /// The player has to submit a command
    AwaitingInput,
    /// The player took the stairs to this floor
    FloorChanged(i32),
    /// Player died with message
    PlayerDied(String),
    /// Nothing more will happen
    GameOver,
}

/// A running session
#[derive(Debug, Clone)]
pub struct GameLoop {
    grid: Grid,
    registry: Registry,
    turns: TurnManager,
    rng: GameRng,
    options: GameOptions,
    /// Seed floors are derived from, resolved from entropy when the options say 0
    seed: u64,
    floor: i32,
    player: EntityId,
    generated: GeneratedFloor,
    messages: VecDeque<String>,
    killer: Option<String>,
}

impl GameLoop {
    /// Start a session on floor 1.
    ///
    /// The player starts on the up stairs, or on a random floor tile when
    /// the floor has none.
    pub fn new(options: GameOptions) -> Result<Self, GameLoopError> {
        let mut rng = if options.base_seed == 0 {
            GameRng::from_entropy()
        } else {
            GameRng::new(options.base_seed)
        };
        let seed = rng.seed();

        let (mut grid, generated) = generate_floor(options.map_width, options.map_height, 1, seed);
        let start = generated
            .stairs_up
            .or_else(|| random_floor_position(&grid, &mut rng))
            .ok_or(GameLoopError::NoStartingPosition(1))?;

        let mut registry = Registry::new();
        let player = registry
            .spawn_actor(
                &mut grid,
                Actor::player(start, options.player_speed, options.player_hp),
            )
            .ok_or(GameLoopError::NoStartingPosition(1))?;
        spawn_monsters_for_floor(&mut registry, &mut grid, 1, start, &mut rng);

        let mut game = Self {
            grid,
            registry,
            turns: TurnManager::new(),
            rng,
            options,
            seed,
            floor: 1,
            player,
            generated,
            messages: VecDeque::new(),
            killer: None,
        };
        game.update_fov();
        game.push_message("You descend into the dungeon.");
        tracing::info!(seed, monsters = game.registry.actor_count() - 1, "new game");
        Ok(game)
    }

    /// Hand the player's command to the scheduler.
    ///
    /// Accepted only while the game waits for input and nothing is queued
    /// yet. The player may move one tile orthogonally, wait, pick up, or
    /// take the stairs.
    pub fn submit_player_command(&mut self, command: ActionCommand) -> bool {
        if !self.turns.is_awaiting_input() {
            return false;
        }
        let allowed = command.is_cardinal_move()
            || matches!(
                command,
                ActionCommand::Wait
                    | ActionCommand::PickUp
                    | ActionCommand::Descend
                    | ActionCommand::Ascend
            );
        if !allowed {
            tracing::debug!(?command, "player command rejected");
            return false;
        }

        let Some(actor) = self.registry.actor_mut(self.player) else {
            return false;
        };
        if !actor.awaiting_input || !actor.command.is_none() {
            return false;
        }
        actor.command = command;
        true
    }

    /// Run one step
    pub fn tick(&mut self) -> GameLoopResult {
        if self.turns.is_game_over() {
            return GameLoopResult::GameOver;
        }

        for id in process_deaths(&mut self.registry, &mut self.grid) {
            tracing::trace!(?id, "removed dead actor");
        }
        if let Some(result) = self.check_player_death() {
            return result;
        }

        match self.turns.update(&mut self.registry) {
            TurnState::GameOver => return GameLoopResult::GameOver,
            TurnState::AwaitingInput => return GameLoopResult::AwaitingInput,
            TurnState::ProcessingTurns | TurnState::Animating => {}
        }

        let Some(id) = self.turns.current_actor() else {
            return GameLoopResult::Continue;
        };
        let Some(is_player) = self.registry.actor(id).map(|a| a.is_player) else {
            self.turns.reset_current();
            return GameLoopResult::Continue;
        };

        if !is_player {
            decide_action(
                &mut self.registry,
                &self.grid,
                id,
                self.player,
                &mut self.rng,
            );
        }

        let result = self.perform(id, is_player);
        self.turns.complete_action(&mut self.registry);

        let result = match result {
            Performed::FloorChange(target) if self.change_floor(target) => {
                GameLoopResult::FloorChanged(target)
            }
            Performed::Moved if is_player => {
                self.update_fov();
                GameLoopResult::Continue
            }
            _ => GameLoopResult::Continue,
        };

        self.check_player_death().unwrap_or(result)
    }

    /// Tick until the player has to decide or the game ends, at most
    /// `max_steps` times.
    pub fn run_until_input(&mut self, max_steps: usize) -> GameLoopResult {
        let mut last = GameLoopResult::Continue;
        for _ in 0..max_steps {
            last = self.tick();
            match last {
                GameLoopResult::AwaitingInput
                | GameLoopResult::PlayerDied(_)
                | GameLoopResult::GameOver => return last,
                GameLoopResult::Continue | GameLoopResult::FloorChanged(_) => {}
            }
        }
        last
    }

    fn perform(&mut self, id: EntityId, is_player: bool) -> Performed {
        let Some(actor) = self.registry.actor(id) else {
            return Performed::Failed;
        };
        let (pos, command) = (actor.pos, actor.command);

        match command {
            ActionCommand::Move { dx, dy } => {
                let Some(target) = pos.checked_offset(dx, dy) else {
                    return Performed::Failed;
                };
                match self.hostile_at(id, target) {
                    Some(defender) => self.attack(id, defender),
                    None if execute_action(&mut self.registry, &mut self.grid, id) => {
                        Performed::Moved
                    }
                    None => Performed::Failed,
                }
            }
            ActionCommand::Attack { target } => match self.hostile_at(id, target) {
                Some(defender) if pos.is_adjacent(target) => self.attack(id, defender),
                _ => Performed::Failed,
            },
            ActionCommand::Descend | ActionCommand::Ascend if is_player => {
                let (stairs, target) = if command == ActionCommand::Descend {
                    (TileType::StairsDown, self.floor + 1)
                } else {
                    (TileType::StairsUp, self.floor - 1)
                };
                let on_stairs = self.grid.tile(pos).is_some_and(|t| t.typ == stairs);
                if !on_stairs {
                    self.push_message("You can't go that way here.");
                    Performed::Failed
                } else if !(1..=self.options.max_floor).contains(&target) {
                    self.push_message("The stairs are blocked.");
                    Performed::Failed
                } else {
                    Performed::FloorChange(target)
                }
            }
            ActionCommand::PickUp if is_player => {
                let item = self.grid.tile(pos).and_then(|t| t.item);
                match item.and_then(|item| self.registry.remove_item(&mut self.grid, item)) {
                    Some(item) => {
                        self.push_message(format!("You pick up the {}.", item.name));
                        Performed::Done
                    }
                    None => {
                        self.push_message("There is nothing here to pick up.");
                        Performed::Failed
                    }
                }
            }
            _ if execute_action(&mut self.registry, &mut self.grid, id) => Performed::Done,
            _ => Performed::Failed,
        }
    }

    // Occupant of `target` that `attacker` fights: the player attacks
    // monsters, monsters attack the player.
    fn hostile_at(&self, attacker: EntityId, target: GridPosition) -> Option<EntityId> {
        let occupant = self.grid.tile(target)?.occupant?;
        if occupant == attacker {
            return None;
        }
        let attacker_is_player = self.registry.actor(attacker)?.is_player;
        let defender_is_player = self.registry.actor(occupant)?.is_player;
        (attacker_is_player != defender_is_player).then_some(occupant)
    }

    fn attack(&mut self, attacker: EntityId, defender: EntityId) -> Performed {
        let result = resolve_attack(&mut self.registry, attacker, defender, &mut self.rng);
        if !result.message.is_empty() {
            self.push_message(result.message);
        }
        if !result.killed {
            return Performed::Done;
        }

        if defender == self.player {
            self.killer = self.registry.actor(attacker).map(|a| a.name.clone());
        } else {
            let exp = self.registry.actor(defender).map_or(0, |d| d.exp_value);
            if give_experience(&mut self.registry, attacker, exp) {
                let level = self
                    .registry
                    .actor(attacker)
                    .and_then(|a| a.experience)
                    .map_or(1, |e| e.level);
                self.push_message(format!("Welcome to experience level {level}!"));
            }
        }
        Performed::Done
    }

    // Swap in a freshly generated floor and carry the player over. Leaves
    // everything as it was when the new floor has nowhere to stand.
    fn change_floor(&mut self, target: i32) -> bool {
        let (mut grid, generated) = generate_floor(
            self.options.map_width,
            self.options.map_height,
            target,
            self.seed,
        );
        let arrival = if target > self.floor {
            generated.stairs_up
        } else {
            generated.stairs_down
        };
        let Some(start) = arrival.or_else(|| random_floor_position(&grid, &mut self.rng)) else {
            tracing::warn!(floor = target, "no arrival tile on new floor");
            return false;
        };

        clear_monsters(&mut self.registry, &mut self.grid);
        let items: Vec<EntityId> = self.registry.items().map(|(id, _)| id).collect();
        for item in items {
            self.registry.remove_item(&mut self.grid, item);
        }
        if !self.registry.transfer(&mut grid, self.player, start) {
            tracing::warn!(floor = target, "player could not be placed");
            return false;
        }

        let descended = target > self.floor;
        self.grid = grid;
        self.generated = generated;
        self.floor = target;
        self.turns.reset_current();
        spawn_monsters_for_floor(
            &mut self.registry,
            &mut self.grid,
            target,
            start,
            &mut self.rng,
        );
        self.update_fov();

        self.push_message(if descended {
            format!("You descend to floor {target}.")
        } else {
            format!("You climb up to floor {target}.")
        });
        tracing::info!(floor = target, "floor changed");
        true
    }

    fn check_player_death(&mut self) -> Option<GameLoopResult> {
        let alive = self.registry.actor(self.player).is_some_and(|p| p.is_alive());
        if alive {
            return None;
        }
        let reason = match self.killer.as_deref() {
            Some(name) => format!("killed by a {name} on floor {}", self.floor),
            None => format!("died on floor {}", self.floor),
        };
        self.push_message("You die...");
        self.turns.set_game_over();
        Some(GameLoopResult::PlayerDied(reason))
    }

    fn update_fov(&mut self) {
        if let Some(pos) = self.registry.actor(self.player).map(|p| p.pos) {
            calculate_fov(&mut self.grid, pos, self.options.view_radius);
        }
    }

    fn push_message(&mut self, msg: impl Into<String>) {
        if self.messages.len() == MESSAGE_LOG_LEN {
            self.messages.pop_front();
        }
        self.messages.push_back(msg.into());
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn player_actor(&self) -> Option<&Actor> {
        self.registry.actor(self.player)
    }

    /// Current floor, starting at 1
    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// Seed every floor of this session is derived from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Layout summary of the current floor
    pub fn generated(&self) -> &GeneratedFloor {
        &self.generated
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn turn_state(&self) -> TurnState {
        self.turns.state()
    }

    /// Completed actions across all actors
    pub fn turn_count(&self) -> u64 {
        self.turns.turn_count()
    }

    /// Recent messages, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }
}

enum Performed {
    Moved,
    Done,
    Failed,
    FloorChange(i32),
}
