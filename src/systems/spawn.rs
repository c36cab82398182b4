//! Spawn system.
//!
//! Advances every [`SpawnRuleState`](crate::resources::spawner::SpawnRuleState)
//! by the scaled step delta and creates one entity per elapsed interval.
//! When the registry refuses an entity the rule's remaining due spawns for
//! the step are dropped.
//! Spawn handlers run after all rules have been processed, so a handler
//! reading `spawned_count` sees the final count for the step.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::context::SimContext;
use crate::events::spawn::SpawnEvent;
use crate::resources::callbacks::SpawnHandlers;
use crate::resources::registry::create_entity;
use crate::resources::spawner::SpawnScheduler;
use crate::resources::worldtime::WorldTime;

pub fn spawn_system(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    let mut events: Vec<SpawnEvent> = Vec::new();

    world.resource_scope(|world, mut scheduler: Mut<SpawnScheduler>| {
        let scheduler = &mut *scheduler;
        for state in scheduler.rules.iter_mut() {
            state.advance(dt);
            let due = state.take_due();
            for skipped in (0..due).rev() {
                let spec = state.rule.sample(&mut scheduler.rng);
                match create_entity(world, &spec) {
                    Some(id) => {
                        let spawned_count = state.record_spawn();
                        trace!("Spawn rule {:?} created {} ({})", state.id, id, spawned_count);
                        events.push(SpawnEvent {
                            rule: state.id,
                            id,
                            spawned_count,
                        });
                    }
                    None => {
                        debug!(
                            "Spawn rule {:?}: entity refused, {} due spawns skipped",
                            state.id,
                            skipped + 1
                        );
                        break;
                    }
                }
            }
        }
    });

    if events.is_empty() {
        return;
    }
    world.resource_scope(|world, mut handlers: Mut<SpawnHandlers>| {
        let mut ctx = SimContext::new(world);
        for event in &events {
            for callback in handlers.callbacks.iter_mut() {
                callback(&mut ctx, event);
            }
        }
    });
}
