//! Collision shape of an entity.
//!
//! A [`Shape`] is centered on the entity's
//! [`MapPosition`](super::mapposition::MapPosition). It is used by the
//! collision system for overlap tests, by the boundary policies for the
//! entity's extent, and by the drag interaction for pointer picking.

use bevy_ecs::prelude::Component;
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Circle of the given radius.
    Circle { radius: f64 },
    /// Axis-aligned box described by its half extents.
    Rect { half_width: f64, half_height: f64 },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    /// Axis-aligned box of the given full width and height.
    pub fn rect(width: f64, height: f64) -> Self {
        Shape::Rect {
            half_width: width * 0.5,
            half_height: height * 0.5,
        }
    }

    /// Zero-sized shape, for entities that only need a position.
    pub fn point() -> Self {
        Shape::Circle { radius: 0.0 }
    }

    /// Half extents of the shape's bounding box.
    pub fn half_extents(&self) -> DVec2 {
        match *self {
            Shape::Circle { radius } => DVec2::splat(radius.abs()),
            Shape::Rect {
                half_width,
                half_height,
            } => DVec2::new(half_width.abs(), half_height.abs()),
        }
    }

    /// Returns (min, max) of the shape's bounding box at a position.
    pub fn aabb(&self, position: DVec2) -> (DVec2, DVec2) {
        let half = self.half_extents();
        (position - half, position + half)
    }

    /// Overlap test against another shape at a different position.
    ///
    /// Touching shapes do not overlap: circles need `distance < r1 + r2`,
    /// boxes need a strictly positive intersection on both axes.
    pub fn overlaps(&self, position: DVec2, other: &Shape, other_position: DVec2) -> bool {
        match (*self, *other) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                let reach = ra.abs() + rb.abs();
                position.distance_squared(other_position) < reach * reach
            }
            (Shape::Rect { .. }, Shape::Rect { .. }) => {
                let (min_a, max_a) = self.aabb(position);
                let (min_b, max_b) = other.aabb(other_position);
                min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
            }
            (Shape::Circle { radius }, Shape::Rect { .. }) => {
                circle_rect_overlap(position, radius.abs(), other, other_position)
            }
            (Shape::Rect { .. }, Shape::Circle { radius }) => {
                circle_rect_overlap(other_position, radius.abs(), self, position)
            }
        }
    }

    /// Point containment in world space (edges included).
    pub fn contains_point(&self, position: DVec2, point: DVec2) -> bool {
        match *self {
            Shape::Circle { radius } => position.distance_squared(point) <= radius * radius,
            Shape::Rect { .. } => {
                let (min, max) = self.aabb(position);
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
        }
    }

    /// Unit normal pointing from this shape toward `other`.
    ///
    /// Circle pairs use the line between centers. Pairs involving a box use
    /// the axis of least penetration of the two bounding boxes. Coincident
    /// centers fall back to +X so callers always get a usable direction.
    pub fn contact_normal(&self, position: DVec2, other: &Shape, other_position: DVec2) -> DVec2 {
        let delta = other_position - position;
        if let (Shape::Circle { .. }, Shape::Circle { .. }) = (self, other) {
            let n = delta.normalize_or_zero();
            return if n == DVec2::ZERO { DVec2::X } else { n };
        }
        let overlap = self.half_extents() + other.half_extents() - delta.abs();
        if overlap.x < overlap.y {
            DVec2::new(if delta.x < 0.0 { -1.0 } else { 1.0 }, 0.0)
        } else {
            DVec2::new(0.0, if delta.y < 0.0 { -1.0 } else { 1.0 })
        }
    }
}

fn circle_rect_overlap(center: DVec2, radius: f64, rect: &Shape, rect_position: DVec2) -> bool {
    let (min, max) = rect.aabb(rect_position);
    let closest = center.clamp(min, max);
    center.distance_squared(closest) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circles_overlap_strictly() {
        let a = Shape::circle(16.0);
        let b = Shape::circle(16.0);
        assert!(a.overlaps(DVec2::ZERO, &b, DVec2::new(30.0, 0.0)));
        assert!(!a.overlaps(DVec2::ZERO, &b, DVec2::new(32.0, 0.0)));
        assert!(!a.overlaps(DVec2::ZERO, &b, DVec2::new(40.0, 0.0)));
    }

    #[test]
    fn rects_overlap_strictly() {
        let a = Shape::rect(10.0, 10.0);
        let b = Shape::rect(10.0, 10.0);
        assert!(a.overlaps(DVec2::ZERO, &b, DVec2::new(9.0, 9.0)));
        assert!(!a.overlaps(DVec2::ZERO, &b, DVec2::new(10.0, 0.0)));
        assert!(!a.overlaps(DVec2::ZERO, &b, DVec2::new(0.0, -11.0)));
    }

    #[test]
    fn circle_against_rect_uses_closest_point() {
        let circle = Shape::circle(5.0);
        let rect = Shape::rect(10.0, 10.0);
        // Corner of the rect is at (5, 5); the circle center is ~5.66 away.
        assert!(!circle.overlaps(DVec2::new(9.0, 9.0), &rect, DVec2::ZERO));
        assert!(circle.overlaps(DVec2::new(9.0, 0.0), &rect, DVec2::ZERO));
        assert!(rect.overlaps(DVec2::ZERO, &circle, DVec2::new(9.0, 0.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let shapes = [Shape::circle(4.0), Shape::rect(6.0, 3.0)];
        let positions = [
            DVec2::new(0.0, 0.0),
            DVec2::new(3.0, 1.0),
            DVec2::new(7.0, 7.0),
            DVec2::new(-2.5, 0.5),
        ];
        for a in shapes {
            for b in shapes {
                for pa in positions {
                    for pb in positions {
                        assert_eq!(a.overlaps(pa, &b, pb), b.overlaps(pb, &a, pa));
                    }
                }
            }
        }
    }

    #[test]
    fn contains_point_includes_edges() {
        let rect = Shape::rect(4.0, 2.0);
        assert!(rect.contains_point(DVec2::ZERO, DVec2::new(2.0, 1.0)));
        assert!(!rect.contains_point(DVec2::ZERO, DVec2::new(2.1, 0.0)));
        let circle = Shape::circle(1.0);
        assert!(circle.contains_point(DVec2::new(5.0, 5.0), DVec2::new(6.0, 5.0)));
        assert!(!circle.contains_point(DVec2::new(5.0, 5.0), DVec2::new(6.0, 6.0)));
    }

    #[test]
    fn contact_normal_points_toward_other() {
        let a = Shape::circle(1.0);
        let n = a.contact_normal(DVec2::ZERO, &a, DVec2::new(0.0, 1.5));
        assert!((n - DVec2::Y).length() < 1e-12);

        let r = Shape::rect(10.0, 10.0);
        let n = r.contact_normal(DVec2::ZERO, &r, DVec2::new(-9.0, 2.0));
        assert_eq!(n, DVec2::new(-1.0, 0.0));

        let n = a.contact_normal(DVec2::ZERO, &a, DVec2::ZERO);
        assert_eq!(n, DVec2::X);
    }

    #[test]
    fn half_extents_of_shapes() {
        assert_eq!(Shape::circle(3.0).half_extents(), DVec2::splat(3.0));
        assert_eq!(Shape::rect(8.0, 2.0).half_extents(), DVec2::new(4.0, 1.0));
        assert_eq!(Shape::point().half_extents(), DVec2::ZERO);
    }
}
