use bevy_ecs::prelude::Component;
use glam::DVec2;

/// World-space position of an entity's center.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: DVec2,
}

impl MapPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }
}

impl From<DVec2> for MapPosition {
    fn from(pos: DVec2) -> Self {
        Self { pos }
    }
}
