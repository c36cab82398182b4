//! Tween animation system.
//!
//! [`tween_system`] advances every tween held by the
//! [`TweenDriver`](crate::resources::tweens::TweenDriver) once per step and
//! writes the interpolated value to the target entity's property:
//!
//! - `X` / `Y` – [`MapPosition`](crate::components::mapposition::MapPosition)
//! - `Scale` / `Alpha` / `Rotation` – [`Appearance`](crate::components::appearance::Appearance)
//!
//! At the end of a pass the property is set to the exact end value. `Once`
//! tweens are then removed and reported to the completion handlers, `Yoyo`
//! tweens swap their endpoints and `Infinite` tweens start over. Repeating
//! tweens keep the time that ran past the end of the pass. Tweens whose
//! target is gone are dropped without a completion event.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::appearance::Appearance;
use crate::components::mapposition::MapPosition;
use crate::components::tween::{Easing, RepeatMode, Tween, TweenProperty};
use crate::context::SimContext;
use crate::events::tween::TweenCompleteEvent;
use crate::resources::callbacks::TweenHandlers;
use crate::resources::registry::resolve;
use crate::resources::tweens::TweenDriver;
use crate::resources::worldtime::WorldTime;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f64) -> f64 {
    use std::f64::consts::{FRAC_PI_2, PI};

    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
        Easing::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
        Easing::SineOut => (t * FRAC_PI_2).sin(),
        Easing::SineInOut => 0.5 * (1.0 - (t * PI).cos()),
    }
}

/// Linearly interpolate between two values.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Advance one tween by `dt`.
///
/// Returns the value to write and whether a `Once` tween just finished.
pub(crate) fn advance(tween: &mut Tween, dt: f64) -> (f64, bool) {
    tween.elapsed += dt;
    if tween.elapsed < tween.duration {
        let t = ease(tween.easing, tween.progress());
        return (lerp(tween.from, tween.to, t), false);
    }

    let end = tween.to;
    // Time past the end of the pass carries into the next one.
    let (extra_passes, carry) = if tween.duration > 0.0 {
        let overshoot = tween.elapsed - tween.duration;
        (
            (overshoot / tween.duration).floor(),
            overshoot.rem_euclid(tween.duration),
        )
    } else {
        (0.0, 0.0)
    };
    match tween.repeat {
        RepeatMode::Once => {
            tween.elapsed = tween.duration.max(0.0);
            tween.running = false;
            (end, true)
        }
        RepeatMode::Yoyo => {
            // An even number of whole passes skipped leaves the direction flipped.
            if extra_passes % 2.0 == 0.0 {
                std::mem::swap(&mut tween.from, &mut tween.to);
            }
            tween.elapsed = carry;
            (end, false)
        }
        RepeatMode::Infinite => {
            tween.elapsed = carry;
            (end, false)
        }
    }
}

/// Current value of an entity property.
pub fn read_property(world: &World, entity: Entity, property: TweenProperty) -> Option<f64> {
    match property {
        TweenProperty::X => world.get::<MapPosition>(entity).map(|p| p.pos.x),
        TweenProperty::Y => world.get::<MapPosition>(entity).map(|p| p.pos.y),
        TweenProperty::Scale => world.get::<Appearance>(entity).map(|a| a.scale),
        TweenProperty::Alpha => world.get::<Appearance>(entity).map(|a| a.alpha),
        TweenProperty::Rotation => world.get::<Appearance>(entity).map(|a| a.rotation),
    }
}

/// Write an entity property. Returns false if the component is missing.
pub fn write_property(world: &mut World, entity: Entity, property: TweenProperty, value: f64) -> bool {
    match property {
        TweenProperty::X | TweenProperty::Y => {
            let Some(mut position) = world.get_mut::<MapPosition>(entity) else {
                return false;
            };
            if property == TweenProperty::X {
                position.pos.x = value;
            } else {
                position.pos.y = value;
            }
        }
        TweenProperty::Scale | TweenProperty::Alpha | TweenProperty::Rotation => {
            let Some(mut appearance) = world.get_mut::<Appearance>(entity) else {
                return false;
            };
            match property {
                TweenProperty::Scale => appearance.scale = value,
                TweenProperty::Alpha => appearance.alpha = value,
                _ => appearance.rotation = value,
            }
        }
    }
    true
}

pub fn tween_system(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta.max(0.0);
    let mut completed: Vec<TweenCompleteEvent> = Vec::new();

    world.resource_scope(|world, mut driver: Mut<TweenDriver>| {
        driver.tweens.retain_mut(|(handle, tween)| {
            let Some(entity) = resolve(world, tween.target) else {
                trace!("Tween {:?} dropped: target {} is gone", handle, tween.target);
                return false;
            };
            if !tween.running {
                return false;
            }
            let (value, finished) = advance(tween, dt);
            write_property(world, entity, tween.property, value);
            if finished {
                completed.push(TweenCompleteEvent {
                    handle: *handle,
                    target: tween.target,
                    property: tween.property,
                });
            }
            !finished
        });
    });

    if completed.is_empty() {
        return;
    }
    world.resource_scope(|world, mut handlers: Mut<TweenHandlers>| {
        let mut ctx = SimContext::new(world);
        for event in &completed {
            for callback in handlers.callbacks.iter_mut() {
                callback(&mut ctx, event);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::identity::EntityId;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_ease_all_types_at_zero() {
        for easing in Easing::ALL {
            assert!(approx_eq(ease(easing, 0.0), 0.0), "{:?} at 0", easing);
        }
    }

    #[test]
    fn test_ease_all_types_at_one() {
        for easing in Easing::ALL {
            assert!(approx_eq(ease(easing, 1.0), 1.0), "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_ease_clamps_out_of_range_input() {
        for easing in Easing::ALL {
            assert!(approx_eq(ease(easing, -0.5), 0.0));
            assert!(approx_eq(ease(easing, 1.5), 1.0));
        }
    }

    #[test]
    fn test_ease_inout_midpoints() {
        assert!(approx_eq(ease(Easing::QuadInOut, 0.5), 0.5));
        assert!(approx_eq(ease(Easing::CubicInOut, 0.5), 0.5));
        assert!(approx_eq(ease(Easing::SineInOut, 0.5), 0.5));
    }

    #[test]
    fn test_ease_quad_and_cubic() {
        assert!(approx_eq(ease(Easing::QuadIn, 0.5), 0.25));
        assert!(approx_eq(ease(Easing::QuadOut, 0.5), 0.75));
        assert!(approx_eq(ease(Easing::CubicIn, 0.5), 0.125));
        assert!(approx_eq(ease(Easing::CubicOut, 0.5), 0.875));
    }

    #[test]
    fn test_ease_monotonicity() {
        for easing in Easing::ALL {
            let mut prev = ease(easing, 0.0);
            for i in 1..=100 {
                let v = ease(easing, i as f64 / 100.0);
                assert!(v >= prev - EPSILON, "{:?} not monotonic at {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_lerp_basic() {
        assert!(approx_eq(lerp(0.0, 10.0, 0.5), 5.0));
        assert!(approx_eq(lerp(-4.0, 4.0, 0.25), -2.0));
        assert!(approx_eq(lerp(3.0, 3.0, 0.7), 3.0));
    }

    #[test]
    fn test_advance_once_finishes_on_exact_end() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::X, 0.0, 10.0, 1.0);
        let (v, done) = advance(&mut tw, 0.5);
        assert!(approx_eq(v, 5.0));
        assert!(!done);
        let (v, done) = advance(&mut tw, 0.75);
        assert_eq!(v, 10.0);
        assert!(done);
        assert!(!tw.running);
    }

    #[test]
    fn test_advance_yoyo_swaps() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::Alpha, 0.0, 1.0, 1.0).with_repeat(RepeatMode::Yoyo);
        let (v, done) = advance(&mut tw, 1.0);
        assert_eq!(v, 1.0);
        assert!(!done);
        assert_eq!((tw.from, tw.to), (1.0, 0.0));
        assert_eq!(tw.elapsed, 0.0);
        let (v, _) = advance(&mut tw, 0.25);
        assert!(approx_eq(v, 0.75));
    }

    #[test]
    fn test_advance_infinite_restarts() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::Rotation, 0.0, 360.0, 2.0)
            .with_repeat(RepeatMode::Infinite);
        let (v, done) = advance(&mut tw, 2.0);
        assert_eq!(v, 360.0);
        assert!(!done);
        assert_eq!((tw.from, tw.to), (0.0, 360.0));
        let (v, _) = advance(&mut tw, 0.5);
        assert!(approx_eq(v, 90.0));
    }

    #[test]
    fn test_repeat_carries_overshoot() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::Rotation, 0.0, 360.0, 2.0)
            .with_repeat(RepeatMode::Infinite);
        let (v, _) = advance(&mut tw, 2.5);
        assert_eq!(v, 360.0);
        assert_eq!(tw.elapsed, 0.5);
        let (v, _) = advance(&mut tw, 0.5);
        assert!(approx_eq(v, 180.0));
    }

    #[test]
    fn test_yoyo_phase_survives_uneven_steps() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::Alpha, 0.0, 1.0, 1.0).with_repeat(RepeatMode::Yoyo);
        advance(&mut tw, 1.25);
        assert_eq!((tw.from, tw.to), (1.0, 0.0));
        assert_eq!(tw.elapsed, 0.25);
        // Ends the falling pass, skips a rising one, lands half way down.
        advance(&mut tw, 2.25);
        assert_eq!((tw.from, tw.to), (1.0, 0.0));
        assert_eq!(tw.elapsed, 0.5);
        let (v, _) = advance(&mut tw, 0.25);
        assert!(approx_eq(v, 0.25));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::Scale, 1.0, 2.0, 0.0);
        let (v, done) = advance(&mut tw, 0.0);
        assert_eq!(v, 2.0);
        assert!(done);
    }

    #[test]
    fn test_property_accessors() {
        let mut world = World::new();
        let entity = world.spawn((MapPosition::new(1.0, 2.0), Appearance::default())).id();
        for (property, value) in [
            (TweenProperty::X, 10.0),
            (TweenProperty::Y, 20.0),
            (TweenProperty::Scale, 3.0),
            (TweenProperty::Alpha, 0.5),
            (TweenProperty::Rotation, 45.0),
        ] {
            assert!(write_property(&mut world, entity, property, value));
            assert_eq!(read_property(&world, entity, property), Some(value));
        }
        let bare = world.spawn_empty().id();
        assert!(!write_property(&mut world, bare, TweenProperty::Alpha, 1.0));
        assert_eq!(read_property(&world, bare, TweenProperty::X), None);
    }
}
