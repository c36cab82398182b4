//! Boundary policies.
//!
//! Applied once per entity per step, right after [`movement`](super::movement::movement)
//! and before collision detection. The per-axis math lives in small pure
//! functions so it can be checked in isolation:
//!
//! - [`clamp_axis`] keeps the full extent inside the bounds.
//! - [`wrap_axis`] wraps toroidally over `[min - h, max + h)`.
//! - [`bounce_axis`] reflects the velocity and puts the entity back on the edge.
//! - [`fully_outside`] decides when `DestroyOnExit` retires an entity.
//!
//! Frozen bodies (an entity held by the pointer) are left alone.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::trace;

use crate::components::collider::Shape;
use crate::components::identity::Identity;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::registry::EntityRegistry;
use crate::resources::simconfig::{BoundaryPolicy, ClampVelocity, Rect, SimConfig};

/// Toroidal wrap of one coordinate with half extent `half`.
///
/// The entity leaves through one edge once it is completely past it and
/// reappears completely past the opposite edge. With `half == 0` the result
/// lies in `[min, max)`.
pub fn wrap_axis(value: f64, min: f64, max: f64, half: f64) -> f64 {
    let lo = min - half;
    let span = (max - min) + 2.0 * half;
    let wrapped = lo + (value - lo).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative offsets.
    if wrapped >= lo + span { lo } else { wrapped }
}

/// Reflect off the violated edge of one axis.
///
/// Returns the corrected position and velocity and whether a bounce happened.
/// The reflected component always points back inside, so an entity that is
/// still overlapping the edge on the next step does not flip back out.
pub fn bounce_axis(value: f64, velocity: f64, min: f64, max: f64, half: f64) -> (f64, f64, bool) {
    let lo = min + half;
    let hi = max - half;
    if lo > hi {
        return ((min + max) * 0.5, velocity, false);
    }
    if value < lo {
        (lo, velocity.abs(), true)
    } else if value > hi {
        (hi, -velocity.abs(), true)
    } else {
        (value, velocity, false)
    }
}

/// Clamp one axis so the full extent stays inside.
///
/// Returns the corrected position and velocity.
pub fn clamp_axis(
    value: f64,
    velocity: f64,
    min: f64,
    max: f64,
    half: f64,
    mode: ClampVelocity,
) -> (f64, f64) {
    let lo = min + half;
    let hi = max - half;
    if lo > hi {
        return ((min + max) * 0.5, velocity);
    }
    let clamped = value.clamp(lo, hi);
    if clamped != value && mode == ClampVelocity::Zero {
        (clamped, 0.0)
    } else {
        (clamped, velocity)
    }
}

/// True once no part of the entity's extent is inside the bounds.
pub fn fully_outside(position: DVec2, half: DVec2, bounds: &Rect) -> bool {
    position.x + half.x < bounds.min.x
        || position.x - half.x > bounds.max.x
        || position.y + half.y < bounds.min.y
        || position.y - half.y > bounds.max.y
}

pub fn boundary_system(
    config: Res<SimConfig>,
    mut registry: ResMut<EntityRegistry>,
    mut query: Query<(&mut Identity, &mut MapPosition, &mut RigidBody, &Shape)>,
) {
    let bounds = config.bounds;
    for (mut identity, mut position, mut body, shape) in query.iter_mut() {
        if !identity.active || body.frozen {
            continue;
        }
        let half = shape.half_extents();
        match config.boundary_policy {
            BoundaryPolicy::Clamp => {
                let (x, vx) = clamp_axis(
                    position.pos.x,
                    body.velocity.x,
                    bounds.min.x,
                    bounds.max.x,
                    half.x,
                    config.clamp_velocity,
                );
                let (y, vy) = clamp_axis(
                    position.pos.y,
                    body.velocity.y,
                    bounds.min.y,
                    bounds.max.y,
                    half.y,
                    config.clamp_velocity,
                );
                position.pos = DVec2::new(x, y);
                body.velocity = DVec2::new(vx, vy);
            }
            BoundaryPolicy::Wrap => {
                position.pos = DVec2::new(
                    wrap_axis(position.pos.x, bounds.min.x, bounds.max.x, half.x),
                    wrap_axis(position.pos.y, bounds.min.y, bounds.max.y, half.y),
                );
            }
            BoundaryPolicy::Bounce => {
                let (x, vx, bx) =
                    bounce_axis(position.pos.x, body.velocity.x, bounds.min.x, bounds.max.x, half.x);
                let (y, vy, by) =
                    bounce_axis(position.pos.y, body.velocity.y, bounds.min.y, bounds.max.y, half.y);
                position.pos = DVec2::new(x, y);
                body.velocity = DVec2::new(vx, vy);
                if (bx || by)
                    && let Some(speed) = config.target_speed
                {
                    body.set_speed(speed);
                }
            }
            BoundaryPolicy::DestroyOnExit => {
                if fully_outside(position.pos, half, &bounds) && registry.retire(&mut identity) {
                    trace!("{} left the playfield", identity.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn wrap_past_max_edge() {
        assert!(approx_eq(wrap_axis(849.0, 0.0, 800.0, 0.0), 49.0));
        assert!(approx_eq(wrap_axis(-1.0, 0.0, 800.0, 0.0), 799.0));
        assert!(approx_eq(wrap_axis(800.0, 0.0, 800.0, 0.0), 0.0));
        assert!(approx_eq(wrap_axis(0.0, 0.0, 800.0, 0.0), 0.0));
    }

    #[test]
    fn wrap_uses_extended_range() {
        // A radius-10 entity stays put until fully past the edge.
        assert!(approx_eq(wrap_axis(805.0, 0.0, 800.0, 10.0), 805.0));
        assert!(approx_eq(wrap_axis(811.0, 0.0, 800.0, 10.0), -9.0));
        assert!(approx_eq(wrap_axis(-11.0, 0.0, 800.0, 10.0), 809.0));
    }

    #[test]
    fn wrap_handles_many_spans() {
        assert!(approx_eq(wrap_axis(10_000.0 + 5.0, 0.0, 100.0, 0.0), 5.0));
        assert!(approx_eq(wrap_axis(-10_000.0 + 5.0, 0.0, 100.0, 0.0), 5.0));
    }

    #[test]
    fn wrap_never_returns_upper_bound() {
        let v = wrap_axis(-1e-17, 0.0, 800.0, 0.0);
        assert!((0.0..800.0).contains(&v));
    }

    #[test]
    fn bounce_reflects_and_repositions() {
        let (x, vx, hit) = bounce_axis(805.0, 50.0, 0.0, 800.0, 0.0);
        assert!(hit);
        assert_eq!(x, 800.0);
        assert_eq!(vx, -50.0);

        let (x, vx, hit) = bounce_axis(3.0, -20.0, 0.0, 800.0, 5.0);
        assert!(hit);
        assert_eq!(x, 5.0);
        assert_eq!(vx, 20.0);

        let (x, vx, hit) = bounce_axis(400.0, 20.0, 0.0, 800.0, 5.0);
        assert!(!hit);
        assert_eq!((x, vx), (400.0, 20.0));
    }

    #[test]
    fn bounce_points_inward_even_if_already_reflected() {
        // Velocity already points inside: keep it that way.
        let (_, vx, _) = bounce_axis(-2.0, 30.0, 0.0, 100.0, 0.0);
        assert_eq!(vx, 30.0);
    }

    #[test]
    fn clamp_zero_and_keep() {
        assert_eq!(clamp_axis(120.0, 15.0, 0.0, 100.0, 10.0, ClampVelocity::Zero), (90.0, 0.0));
        assert_eq!(clamp_axis(120.0, 15.0, 0.0, 100.0, 10.0, ClampVelocity::Keep), (90.0, 15.0));
        assert_eq!(clamp_axis(50.0, 15.0, 0.0, 100.0, 10.0, ClampVelocity::Zero), (50.0, 15.0));
    }

    #[test]
    fn outside_by_full_extent() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let half = DVec2::splat(5.0);
        assert!(!fully_outside(DVec2::new(104.0, 50.0), half, &bounds));
        assert!(fully_outside(DVec2::new(106.0, 50.0), half, &bounds));
        assert!(fully_outside(DVec2::new(50.0, -5.5), half, &bounds));
        assert!(!fully_outside(DVec2::new(50.0, 50.0), half, &bounds));
    }
}
