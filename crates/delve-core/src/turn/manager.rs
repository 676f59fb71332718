//! Energy-based turn scheduling
//!
//! Every actor accumulates energy at its speed. Whoever holds at least
//! [`ENERGY_THRESHOLD`] acts next, highest energy first with ties going to
//! the player. When nobody is ready, everyone receives one tick.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::ENERGY_THRESHOLD;
use crate::action::ActionCommand;
use crate::entity::{EntityId, Registry};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum TurnState {
    #[default]
    ProcessingTurns,
    AwaitingInput,
    /// Reserved for a presentation layer
    Animating,
    /// Terminal
    GameOver,
}

/// Drives turn order across all actors in a [`Registry`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnManager {
    state: TurnState,
    current: Option<EntityId>,
    turn_count: u64,
}

impl TurnManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the scheduler by one step and return the resulting state.
    ///
    /// While awaiting input this only polls the waiting actor's command
    /// slot. Otherwise it picks the next ready actor; executing that actor's
    /// command and calling [`TurnManager::complete_action`] is up to the
    /// caller.
    pub fn update(&mut self, registry: &mut Registry) -> TurnState {
        match self.state {
            TurnState::GameOver => return self.state,
            TurnState::AwaitingInput => {
                let Some(id) = self.current else {
                    return self.state;
                };
                if let Some(actor) = registry.actor_mut(id)
                    && actor.awaiting_input
                    && actor.command != ActionCommand::None
                {
                    actor.awaiting_input = false;
                    self.state = TurnState::ProcessingTurns;
                    tracing::trace!(?id, "input received");
                }
                return self.state;
            }
            TurnState::ProcessingTurns | TurnState::Animating => {}
        }

        let pending = self
            .current
            .and_then(|id| registry.actor(id))
            .is_some_and(|a| a.command != ActionCommand::None);
        if pending {
            return self.state;
        }

        self.current = find_next_actor(registry);
        if self.current.is_none() {
            give_energy(registry);
            self.current = find_next_actor(registry);
        }

        if let Some(id) = self.current {
            let is_player = registry.actor(id).is_some_and(|a| a.turn.is_player);
            if is_player {
                if let Some(actor) = registry.actor_mut(id) {
                    actor.awaiting_input = true;
                }
                self.state = TurnState::AwaitingInput;
                tracing::trace!(?id, "awaiting player input");
            } else {
                self.state = TurnState::ProcessingTurns;
            }
        }
        self.state
    }

    /// Charge the current actor for its action and release it
    pub fn complete_action(&mut self, registry: &mut Registry) {
        if let Some(actor) = self.current.and_then(|id| registry.actor_mut(id)) {
            actor.turn.spend_energy();
            actor.command = ActionCommand::None;
            self.turn_count += 1;
        }
        self.current = None;
        if self.state != TurnState::GameOver {
            self.state = TurnState::ProcessingTurns;
        }
    }

    /// One-way transition to the terminal state
    pub fn set_game_over(&mut self) {
        if self.state != TurnState::GameOver {
            tracing::info!(turns = self.turn_count, "game over");
        }
        self.state = TurnState::GameOver;
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Actor selected to act, if any
    pub fn current_actor(&self) -> Option<EntityId> {
        self.current
    }

    /// Number of completed actions
    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.state == TurnState::AwaitingInput
    }

    pub fn is_game_over(&self) -> bool {
        self.state == TurnState::GameOver
    }

    /// Forget the selected actor, e.g. after the floor is replaced
    pub fn reset_current(&mut self) {
        self.current = None;
        if self.state != TurnState::GameOver {
            self.state = TurnState::ProcessingTurns;
        }
    }
}

// Highest energy at or above the threshold; the player wins exact ties.
fn find_next_actor(registry: &Registry) -> Option<EntityId> {
    let mut best: Option<EntityId> = None;
    let mut best_energy = ENERGY_THRESHOLD - 1;
    let mut best_is_player = false;

    for (id, actor) in registry.actors() {
        if actor.dead || !actor.turn.can_act() {
            continue;
        }
        let energy = actor.turn.energy;
        let better = energy > best_energy
            || (energy == best_energy && actor.turn.is_player && !best_is_player);
        if better {
            best = Some(id);
            best_energy = energy;
            best_is_player = actor.turn.is_player;
        }
    }
    best
}

fn give_energy(registry: &mut Registry) {
    for id in registry.actor_ids() {
        if let Some(actor) = registry.actor_mut(id) {
            actor.turn.gain_energy();
        }
    }
    tracing::trace!("energy tick");
}
