//! Pointer interaction events.
//!
//! The drag state machine in [`crate::systems::drag`] queues these in the
//! [`InteractionEvents`](crate::resources::pointer::InteractionEvents)
//! resource. The host drains them after feeding pointer input, typically to
//! change cursors or play a sound.

use glam::DVec2;

use crate::components::identity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// The pointer moved over an entity.
    HoverEnter(EntityId),
    /// The pointer left an entity.
    HoverExit(EntityId),
    /// An entity was picked up; `origin` is where it was.
    DragStart { id: EntityId, origin: DVec2 },
    /// An entity was released at `position`.
    DragEnd { id: EntityId, position: DVec2 },
}
