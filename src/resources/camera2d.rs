//! Shared 2D camera resource.
//!
//! The camera follows one target entity with exponential smoothing:
//!
//! ```text
//! position += (target + offset - position) * alpha
//! ```
//!
//! `alpha` is applied once per step, not scaled by `dt`, so the follow feel
//! depends on the step rate. Hosts running a fixed step get identical results
//! on every machine. With `bounds` set, the view (`position ± half_view`)
//! never leaves the bounds rectangle.
//!
//! The target is weak: the camera never keeps an entity alive, and when the
//! target is destroyed the camera simply holds its position.

use bevy_ecs::prelude::Resource;
use glam::DVec2;

use crate::components::identity::EntityId;
use crate::resources::simconfig::{Rect, SimConfig};

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Entity followed by the camera.
    pub target: Option<EntityId>,
    /// Center of the view in world space.
    pub position: DVec2,
    /// Smoothing factor in (0, 1].
    pub alpha: f64,
    pub bounds: Option<Rect>,
    /// Half the viewport size.
    pub half_view: DVec2,
    /// Added to the target position, to look ahead of or above the target.
    pub offset: DVec2,
}

impl Camera2D {
    pub fn new(alpha: f64, half_view: DVec2, bounds: Option<Rect>) -> Self {
        let mut camera = Self {
            target: None,
            position: half_view,
            alpha,
            bounds,
            half_view,
            offset: DVec2::ZERO,
        };
        camera.clamp();
        camera
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.camera_alpha, config.half_view(), config.camera_bounds)
    }

    pub fn follow(&mut self, id: EntityId) {
        self.target = Some(id);
    }

    pub fn unfollow(&mut self) {
        self.target = None;
    }

    /// Move one smoothing step toward `target_position`.
    pub fn smooth_toward(&mut self, target_position: DVec2) {
        let goal = target_position + self.offset;
        self.position += (goal - self.position) * self.alpha;
        self.clamp();
    }

    /// Jump straight to `target_position`.
    pub fn snap_to(&mut self, target_position: DVec2) {
        self.position = target_position + self.offset;
        self.clamp();
    }

    /// Keep the view inside the bounds, if any.
    pub fn clamp(&mut self) {
        if let Some(bounds) = self.bounds {
            self.position.x = clamp_view_axis(self.position.x, bounds.min.x, bounds.max.x, self.half_view.x);
            self.position.y = clamp_view_axis(self.position.y, bounds.min.y, bounds.max.y, self.half_view.y);
        }
    }

    /// Visible world rectangle.
    pub fn view_rect(&self) -> Rect {
        Rect {
            min: self.position - self.half_view,
            max: self.position + self.half_view,
        }
    }
}

/// Clamp one axis of the view center. When the bounds are narrower than the
/// view the camera centers on them.
pub fn clamp_view_axis(value: f64, min: f64, max: f64, half: f64) -> f64 {
    if max - min <= 2.0 * half {
        (min + max) * 0.5
    } else {
        value.clamp(min + half, max - half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn smoothing_moves_alpha_of_the_gap() {
        let mut camera = Camera2D::new(0.25, DVec2::new(50.0, 50.0), None);
        camera.position = DVec2::ZERO;
        camera.smooth_toward(DVec2::new(100.0, -40.0));
        assert!((camera.position - DVec2::new(25.0, -10.0)).length() < EPSILON);
        camera.smooth_toward(DVec2::new(100.0, -40.0));
        assert!((camera.position - DVec2::new(43.75, -17.5)).length() < EPSILON);
    }

    #[test]
    fn alpha_one_snaps() {
        let mut camera = Camera2D::new(1.0, DVec2::ZERO, None);
        camera.smooth_toward(DVec2::new(7.0, 8.0));
        assert_eq!(camera.position, DVec2::new(7.0, 8.0));
    }

    #[test]
    fn bounds_keep_view_inside() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let mut camera = Camera2D::new(1.0, DVec2::new(200.0, 150.0), Some(bounds));
        camera.smooth_toward(DVec2::new(-500.0, 990.0));
        assert_eq!(camera.position, DVec2::new(200.0, 850.0));
        let view = camera.view_rect();
        assert!(view.min.x >= 0.0 && view.max.y <= 1000.0);
    }

    #[test]
    fn narrow_bounds_center_the_view() {
        assert_eq!(clamp_view_axis(30.0, 0.0, 100.0, 80.0), 50.0);
        assert_eq!(clamp_view_axis(30.0, 0.0, 100.0, 10.0), 30.0);
        assert_eq!(clamp_view_axis(-5.0, 0.0, 100.0, 10.0), 10.0);
    }

    #[test]
    fn offset_shifts_the_goal() {
        let mut camera = Camera2D::new(1.0, DVec2::ZERO, None);
        camera.offset = DVec2::new(0.0, -30.0);
        camera.snap_to(DVec2::new(10.0, 10.0));
        assert_eq!(camera.position, DVec2::new(10.0, -20.0));
    }
}
