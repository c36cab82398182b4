//! Presentation-facing state owned by the simulation.
//!
//! The core never draws anything, but tweens animate scale, alpha and
//! rotation, and the drag interaction switches the visual state. Renderers
//! read both through [`EntityView`](crate::resources::registry::EntityView).

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Scale, opacity and rotation (degrees) of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub scale: f64,
    pub alpha: f64,
    pub rotation: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            scale: 1.0,
            alpha: 1.0,
            rotation: 0.0,
        }
    }
}

/// Pointer-interaction state, for highlight effects.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Idle,
    /// The pointer is over the entity.
    Hovered,
    /// The entity is held by the pointer.
    Dragged,
}
