//! Time-to-live component for automatic entity destruction.
//!
//! The [`Ttl`] component counts down simulated time each step. When the
//! remaining time reaches zero the entity is destroyed (marked inactive and
//! compacted at the end of the step). There is no callback: it is a "fire
//! and forget" lifespan for particles and short-lived projectiles.
//!
//! # Related
//!
//! - [`crate::systems::ttl::ttl_system`] – system that counts down and destroys
//! - [`crate::resources::timers::Timers`] – for delayed signals instead of destruction

use bevy_ecs::prelude::Component;

/// Time-to-live component that destroys its entity after a duration.
///
/// The countdown respects [`WorldTime::time_scale`](crate::resources::worldtime::WorldTime)
/// and continues while the entity is frozen.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ttl {
    /// Remaining time in seconds before destruction.
    pub remaining: f64,
}

impl Ttl {
    pub fn new(seconds: f64) -> Self {
        Ttl { remaining: seconds }
    }
}
