//! Tween data types.
//!
//! A [`Tween`] interpolates one scalar [`TweenProperty`] of one entity from a
//! start value to an end value over a duration. Tweens are owned by the
//! [`TweenDriver`](crate::resources::tweens::TweenDriver) resource rather than
//! attached to entities, so any number of them may target the same entity and
//! each one can be cancelled on its own through its [`TweenHandle`].
//!
//! See [`crate::systems::tween`] for the easing curves and the update system.

use serde::{Deserialize, Serialize};

use crate::components::identity::EntityId;

/// Determines how a tween behaves when it reaches the end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play once, then stop and notify completion.
    #[default]
    Once,
    /// Swap start and end values and play again, forever (ping-pong).
    Yoyo,
    /// Restart from the start value, forever.
    Infinite,
}

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
    /// Starts slow, accelerates (sine).
    SineIn,
    /// Starts fast, decelerates (sine).
    SineOut,
    /// Slow start and end (sine).
    SineInOut,
}

impl Easing {
    pub const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "quad_in",
            Easing::QuadOut => "quad_out",
            Easing::QuadInOut => "quad_in_out",
            Easing::CubicIn => "cubic_in",
            Easing::CubicOut => "cubic_out",
            Easing::CubicInOut => "cubic_in_out",
            Easing::SineIn => "sine_in",
            Easing::SineOut => "sine_out",
            Easing::SineInOut => "sine_in_out",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Easing::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

/// Scalar entity property a tween writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenProperty {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Uniform scale.
    Scale,
    /// Opacity.
    Alpha,
    /// Rotation in degrees.
    Rotation,
}

/// Handle returned when a tween is added; used to cancel it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenHandle(pub u64);

/// Interpolation of one entity property.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Entity whose property is animated.
    pub target: EntityId,
    /// Property written each step.
    pub property: TweenProperty,
    /// Starting value.
    pub from: f64,
    /// Ending value.
    pub to: f64,
    /// Duration of one pass in seconds.
    pub duration: f64,
    /// Easing function to use.
    pub easing: Easing,
    /// Behavior when a pass ends.
    pub repeat: RepeatMode,
    /// Time spent in the current pass.
    pub elapsed: f64,
    /// Whether the tween is still playing.
    pub running: bool,
}

impl Tween {
    pub fn new(target: EntityId, property: TweenProperty, from: f64, to: f64, duration: f64) -> Self {
        Tween {
            target,
            property,
            from,
            to,
            duration,
            easing: Easing::Linear,
            repeat: RepeatMode::Once,
            elapsed: 0.0,
            running: true,
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    /// Linear progress through the current pass, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_new_defaults() {
        let tw = Tween::new(EntityId(1), TweenProperty::Alpha, 1.0, 0.0, 2.0);
        assert_eq!(tw.target, EntityId(1));
        assert_eq!(tw.property, TweenProperty::Alpha);
        assert_eq!(tw.easing, Easing::Linear);
        assert_eq!(tw.repeat, RepeatMode::Once);
        assert_eq!(tw.elapsed, 0.0);
        assert!(tw.running);
    }

    #[test]
    fn test_tween_builder_chaining() {
        let tw = Tween::new(EntityId(1), TweenProperty::Scale, 1.0, 2.0, 1.0)
            .with_easing(Easing::CubicOut)
            .with_repeat(RepeatMode::Yoyo);
        assert_eq!(tw.easing, Easing::CubicOut);
        assert_eq!(tw.repeat, RepeatMode::Yoyo);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut tw = Tween::new(EntityId(1), TweenProperty::X, 0.0, 10.0, 2.0);
        tw.elapsed = 1.0;
        assert_eq!(tw.progress(), 0.5);
        tw.elapsed = 5.0;
        assert_eq!(tw.progress(), 1.0);
        tw.duration = 0.0;
        assert_eq!(tw.progress(), 1.0);
    }

    #[test]
    fn test_easing_names_round_trip() {
        for easing in Easing::ALL {
            assert_eq!(Easing::from_name(easing.as_str()), Some(easing));
        }
        assert_eq!(Easing::from_name("bounce"), None);
    }
}
