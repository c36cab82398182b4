//! Timer system.
//!
//! Counts the [`Timers`] resource down by the scaled step delta and hands
//! every expired timer to the registered timer handlers.

use bevy_ecs::prelude::*;
use log::trace;

use crate::context::SimContext;
use crate::resources::callbacks::TimerHandlers;
use crate::resources::timers::Timers;
use crate::resources::worldtime::WorldTime;

pub fn timer_system(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    let fired = world.resource_mut::<Timers>().advance(dt);
    if fired.is_empty() {
        return;
    }
    world.resource_scope(|world, mut handlers: Mut<TimerHandlers>| {
        let mut ctx = SimContext::new(world);
        for event in &fired {
            trace!("Timer {:?} fired: {}", event.timer, event.signal);
            for callback in handlers.callbacks.iter_mut() {
                callback(&mut ctx, event);
            }
        }
    });
}
