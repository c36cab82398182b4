use bevy_ecs::prelude::*;
use glam::DVec2;

use crate::components::identity::Identity;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Explicit Euler step.
pub fn integrate(position: DVec2, velocity: DVec2, dt: f64) -> DVec2 {
    position + velocity * dt
}

/// Integrate positions of active, non-frozen bodies.
pub fn movement(mut query: Query<(&Identity, &mut MapPosition, &RigidBody)>, time: Res<WorldTime>) {
    let dt = time.delta;
    for (identity, mut position, rigidbody) in query.iter_mut() {
        if !identity.active || rigidbody.frozen {
            continue;
        }
        position.pos = integrate(position.pos, rigidbody.velocity, dt);
    }
}
