//! End-of-step compaction.
//!
//! Entities destroyed during the step (by `destroy`, a boundary policy, a
//! lifespan or a callback) are still present in the world, only inactive.
//! [`compact_destroyed`] despawns them and forgets their ids, and drops any
//! pointer state referring to them.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::identity::{EntityId, Identity};
use crate::resources::pointer::{DragState, Pointer};
use crate::resources::registry::EntityRegistry;

pub fn compact_destroyed(world: &mut World) {
    let mut query = world.query::<(Entity, &Identity)>();
    let dead: Vec<(Entity, EntityId)> = query
        .iter(world)
        .filter(|(_, identity)| !identity.active)
        .map(|(entity, identity)| (entity, identity.id))
        .collect();
    if dead.is_empty() {
        return;
    }

    for (entity, id) in &dead {
        world.resource_mut::<EntityRegistry>().forget(*id);
        world.despawn(*entity);
    }

    let mut pointer = world.resource_mut::<Pointer>();
    if let Some(dragged) = pointer.dragged()
        && dead.iter().any(|(_, id)| *id == dragged)
    {
        pointer.state = DragState::Idle;
    }
    if let Some(hovered) = pointer.hovered
        && dead.iter().any(|(_, id)| *id == hovered)
    {
        pointer.hovered = None;
    }
    pointer
        .returning
        .retain(|(returning, _)| !dead.iter().any(|(_, id)| id == returning));
    debug!("Compacted {} destroyed entities", dead.len());
}
