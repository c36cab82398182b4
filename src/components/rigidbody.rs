//! Kinematic body component.
//!
//! The [`RigidBody`] component stores the velocity integrated by the
//! [`movement`](crate::systems::movement::movement) system. There is no
//! acceleration, friction or mass: bodies move in straight lines until a
//! boundary, a collision response or game code changes their velocity.
//!
//! The `frozen` flag disables integration while an entity's position is
//! controlled externally (an entity held by the pointer, for example).

use bevy_ecs::prelude::Component;
use glam::DVec2;

/// Kinematic body storing velocity in world units per second.
///
/// # Example
/// ```
/// use glam::DVec2;
/// use playfield::components::rigidbody::RigidBody;
///
/// let mut rb = RigidBody::with_velocity(DVec2::new(3.0, 4.0));
/// assert!(rb.set_speed(10.0));
/// assert!((rb.speed() - 10.0).abs() < 1e-9);
/// ```
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: DVec2,
    /// When true, the movement and boundary systems skip this entity.
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a RigidBody at rest.
    pub fn new() -> Self {
        Self {
            velocity: DVec2::ZERO,
            frozen: false,
        }
    }

    /// Create a RigidBody with the given velocity.
    pub fn with_velocity(velocity: DVec2) -> Self {
        Self {
            velocity,
            frozen: false,
        }
    }

    /// Magnitude of the velocity.
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Freeze the rigid body, preventing the movement system from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the rigid body.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Set speed while keeping the current direction of travel.
    ///
    /// Returns `false` and leaves the body untouched when the velocity is
    /// zero (there is no direction to keep) or not finite.
    pub fn set_speed(&mut self, new_speed: f64) -> bool {
        let current = self.velocity.length();
        if current > 0.0 && current.is_finite() {
            self.velocity *= new_speed / current;
            true
        } else {
            false
        }
    }
}
