//! Command execution against the grid

use crate::dungeon::{Grid, TileType};
use crate::entity::{EntityId, Registry};

use super::ActionCommand;

/// Apply an actor's pending command.
///
/// Returns false, without changing anything, when the command cannot be
/// carried out here. Attacks are not resolved by this function; the caller
/// redirects them to combat first.
pub fn execute_action(registry: &mut Registry, grid: &mut Grid, entity: EntityId) -> bool {
    let Some(actor) = registry.actor(entity) else {
        return false;
    };
    let (pos, command) = (actor.pos, actor.command);

    let ok = match command {
        ActionCommand::Move { dx, dy } => {
            let Some(target) = pos.checked_offset(dx, dy) else {
                tracing::debug!(?entity, ?pos, ?command, "move offset overflows");
                return false;
            };
            let open = grid.get(target.x, target.y).is_ok_and(|tile| {
                tile.is_walkable() && tile.occupant.is_none_or(|o| o == entity)
            });
            open && registry.relocate(grid, entity, target)
        }
        ActionCommand::Wait => true,
        ActionCommand::PickUp => grid.tile(pos).is_some_and(|t| t.item.is_some()),
        ActionCommand::Descend => {
            grid.tile(pos).is_some_and(|t| t.typ == TileType::StairsDown)
        }
        ActionCommand::Ascend => grid.tile(pos).is_some_and(|t| t.typ == TileType::StairsUp),
        ActionCommand::None
        | ActionCommand::Use { .. }
        | ActionCommand::Drop { .. }
        | ActionCommand::Open
        | ActionCommand::Close
        | ActionCommand::Attack { .. } => false,
    };

    if !ok {
        tracing::debug!(?entity, ?pos, ?command, "action failed");
    }
    ok
}
