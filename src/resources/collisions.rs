//! Collision bookkeeping between steps.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

use crate::components::identity::EntityId;
use crate::events::collision::CollisionEvent;

/// Overlap set of the previous step (for edge-triggered counting), the
/// events reported this step and a running total.
#[derive(Resource, Debug, Default)]
pub struct CollisionState {
    /// Normalized pairs overlapping at the end of the previous detection.
    pub previous: FxHashSet<(EntityId, EntityId)>,
    /// Events reported during the current step.
    pub events: Vec<CollisionEvent>,
    /// Events reported since the simulation started.
    pub total: u64,
}
