//! Turn system
//!
//! Per-actor energy and the scheduler that decides who acts next.

mod actor;
mod manager;

pub use actor::TurnActor;
pub use manager::{TurnManager, TurnState};
