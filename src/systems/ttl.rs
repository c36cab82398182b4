//! TTL (Time-to-live) system.
//!
//! This module provides the [`ttl_system`] that decrements lifespans and
//! destroys entities when their time runs out.
//!
//! # System Flow
//!
//! Each step:
//!
//! 1. `ttl_system` iterates all active entities with [`Ttl`]
//! 2. Decrements `remaining` by the scaled delta
//! 3. When `remaining <= 0`, retires the entity through the
//!    [`EntityRegistry`]; compaction despawns it at the end of the step
//!
//! # Time Scaling
//!
//! The countdown respects [`WorldTime::time_scale`], so slow-motion effects
//! stretch lifespans.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::identity::Identity;
use crate::components::ttl::Ttl;
use crate::resources::registry::EntityRegistry;
use crate::resources::worldtime::WorldTime;

/// Decrements TTL and destroys entities when it reaches zero.
pub fn ttl_system(
    world_time: Res<WorldTime>,
    mut registry: ResMut<EntityRegistry>,
    mut query: Query<(&mut Identity, &mut Ttl)>,
) {
    let dt = world_time.delta; // delta is already scaled by time_scale
    for (mut identity, mut ttl) in query.iter_mut() {
        if !identity.active {
            continue;
        }
        ttl.remaining -= dt;
        if ttl.remaining <= 0.0 && registry.retire(&mut identity) {
            trace!("Lifespan of {} ran out", identity.id);
        }
    }
}
