//! Pointer and drag state resources.
//!
//! The host feeds pointer input through
//! [`Simulation::pointer_down`](crate::simulation::Simulation::pointer_down)
//! and friends between steps; the transitions themselves live in
//! [`crate::systems::drag`].

use bevy_ecs::prelude::Resource;
use glam::DVec2;

use crate::components::identity::EntityId;
use crate::components::tween::TweenHandle;
use crate::events::interaction::InteractionEvent;

/// Drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// An entity is held. `grab_offset` is pointer minus entity position at
    /// pickup, `origin` the entity position at pickup.
    Dragging {
        id: EntityId,
        grab_offset: DVec2,
        origin: DVec2,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Pointer {
    pub state: DragState,
    /// Entity under the pointer while idle.
    pub hovered: Option<EntityId>,
    /// Last known pointer position.
    pub position: Option<DVec2>,
    /// Released entities flying back to their origin. They stay frozen until
    /// both return tweens are gone.
    pub returning: Vec<(EntityId, [TweenHandle; 2])>,
}

impl Pointer {
    pub fn dragged(&self) -> Option<EntityId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged().is_some()
    }

    pub fn is_returning(&self, id: EntityId) -> bool {
        self.returning.iter().any(|(returning, _)| *returning == id)
    }
}

/// Interaction events waiting for the host.
#[derive(Resource, Debug, Default)]
pub struct InteractionEvents {
    events: Vec<InteractionEvent>,
}

impl InteractionEvents {
    pub fn push(&mut self, event: InteractionEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
