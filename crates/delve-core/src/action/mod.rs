//! Action system
//!
//! Commands an actor can issue and the executor that applies them.

mod command;
mod execute;

pub use command::{ActionCommand, Direction};
pub use execute::execute_action;
