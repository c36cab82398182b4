//! Pointer drag state machine.
//!
//! The host calls these between steps, so every transition is applied before
//! the next integration:
//!
//! ```text
//! Idle --down over draggable e--> Dragging { e, grab_offset = p - e.pos, origin = e.pos }
//! Dragging --move(p)--> Dragging       (e.pos = p - grab_offset)
//! Dragging --up--> Idle                (optional return tweens to origin)
//! Returning --tweens done--> released  (see release_returned)
//! Dragging --down--> Dragging          (ignored)
//! ```
//!
//! While idle, moving the pointer updates the hover highlight. Picking only
//! considers active entities tagged [`Tag::Draggable`]; when several overlap
//! the point, the one with the highest id (spawned last, drawn on top) wins.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::{debug, trace};

use crate::components::appearance::VisualState;
use crate::components::collider::Shape;
use crate::components::identity::{EntityId, Identity};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::tag::Tag;
use crate::components::tween::{Tween, TweenProperty};
use crate::events::interaction::InteractionEvent;
use crate::resources::pointer::{DragState, InteractionEvents, Pointer};
use crate::resources::registry::resolve;
use crate::resources::simconfig::SimConfig;
use crate::resources::tweens::TweenDriver;

/// Topmost draggable entity under `point`.
pub fn pick_draggable(world: &mut World, point: DVec2) -> Option<EntityId> {
    let mut query = world.query::<(&Identity, &MapPosition, &Shape, &Tag)>();
    query
        .iter(world)
        .filter(|(identity, position, shape, tag)| {
            identity.active && **tag == Tag::Draggable && shape.contains_point(position.pos, point)
        })
        .map(|(identity, ..)| identity.id)
        .max()
}

fn set_visual_state(world: &mut World, id: EntityId, state: VisualState) {
    if let Some(entity) = resolve(world, id)
        && let Some(mut visual) = world.get_mut::<VisualState>(entity)
    {
        *visual = state;
    }
}

fn push_event(world: &mut World, event: InteractionEvent) {
    world.resource_mut::<InteractionEvents>().push(event);
}

/// Start dragging the topmost draggable entity under `point`.
///
/// Returns the picked entity, or `None` when nothing was picked or a drag
/// is already in progress.
pub fn pointer_down(world: &mut World, point: DVec2) -> Option<EntityId> {
    world.resource_mut::<Pointer>().position = Some(point);
    if world.resource::<Pointer>().is_dragging() {
        debug!("pointer_down ignored: already dragging");
        return None;
    }
    let id = pick_draggable(world, point)?;
    let entity = resolve(world, id)?;
    let origin = world.get::<MapPosition>(entity)?.pos;

    // A pending return animation would fight the pointer.
    {
        let mut driver = world.resource_mut::<TweenDriver>();
        driver.cancel_property(id, TweenProperty::X);
        driver.cancel_property(id, TweenProperty::Y);
    }
    world
        .resource_mut::<Pointer>()
        .returning
        .retain(|(returning, _)| *returning != id);
    if let Some(mut body) = world.get_mut::<RigidBody>(entity) {
        body.freeze();
    }
    set_visual_state(world, id, VisualState::Dragged);

    let mut pointer = world.resource_mut::<Pointer>();
    pointer.state = DragState::Dragging {
        id,
        grab_offset: point - origin,
        origin,
    };
    pointer.hovered = None;
    push_event(world, InteractionEvent::DragStart { id, origin });
    debug!("Drag started on {} at {:?}", id, origin);
    Some(id)
}

/// Move the dragged entity, or update hover state while idle.
pub fn pointer_move(world: &mut World, point: DVec2) {
    world.resource_mut::<Pointer>().position = Some(point);
    let state = world.resource::<Pointer>().state;
    match state {
        DragState::Dragging { id, grab_offset, .. } => match resolve(world, id) {
            Some(entity) => {
                if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
                    position.pos = point - grab_offset;
                }
            }
            None => {
                debug!("Dragged entity {} is gone, dropping drag", id);
                world.resource_mut::<Pointer>().state = DragState::Idle;
            }
        },
        DragState::Idle => update_hover(world, point),
    }
}

fn update_hover(world: &mut World, point: DVec2) {
    let hit = pick_draggable(world, point);
    let previous = world.resource::<Pointer>().hovered;
    if hit == previous {
        return;
    }
    if let Some(old) = previous {
        set_visual_state(world, old, VisualState::Idle);
        push_event(world, InteractionEvent::HoverExit(old));
    }
    if let Some(new) = hit {
        set_visual_state(world, new, VisualState::Hovered);
        push_event(world, InteractionEvent::HoverEnter(new));
    }
    world.resource_mut::<Pointer>().hovered = hit;
}

/// Release the dragged entity. Returns it, or `None` when idle.
///
/// With return-to-origin configured, X and Y tweens are queued from the
/// drop position back to where the drag started and the body stays frozen
/// until [`release_returned`] sees both of them gone.
pub fn pointer_up(world: &mut World) -> Option<EntityId> {
    let DragState::Dragging { id, origin, .. } = world.resource::<Pointer>().state else {
        return None;
    };
    world.resource_mut::<Pointer>().state = DragState::Idle;

    let entity = resolve(world, id)?;
    set_visual_state(world, id, VisualState::Idle);
    let position = world.get::<MapPosition>(entity)?.pos;
    push_event(world, InteractionEvent::DragEnd { id, position });

    let drag_return = world.resource::<SimConfig>().drag_return;
    match drag_return {
        Some(ret) => {
            let handles = {
                let mut driver = world.resource_mut::<TweenDriver>();
                [
                    driver.add(Tween::new(id, TweenProperty::X, position.x, origin.x, ret.duration).with_easing(ret.easing)),
                    driver.add(Tween::new(id, TweenProperty::Y, position.y, origin.y, ret.duration).with_easing(ret.easing)),
                ]
            };
            world.resource_mut::<Pointer>().returning.push((id, handles));
        }
        None => {
            if let Some(mut body) = world.get_mut::<RigidBody>(entity) {
                body.unfreeze();
            }
        }
    }
    debug!("Drag ended on {} at {:?}", id, position);
    Some(id)
}

/// Unfreeze returning entities whose return tweens have finished or were
/// cancelled. Runs after the tween system.
pub fn release_returned(world: &mut World) {
    let finished: Vec<EntityId> = {
        let pointer = world.resource::<Pointer>();
        if pointer.returning.is_empty() {
            return;
        }
        let driver = world.resource::<TweenDriver>();
        pointer
            .returning
            .iter()
            .filter(|(_, handles)| !handles.iter().any(|handle| driver.contains(*handle)))
            .map(|(id, _)| *id)
            .collect()
    };
    for id in finished {
        world
            .resource_mut::<Pointer>()
            .returning
            .retain(|(returning, _)| *returning != id);
        if let Some(entity) = resolve(world, id)
            && let Some(mut body) = world.get_mut::<RigidBody>(entity)
        {
            body.unfreeze();
        }
        trace!("Entity {} back at its drag origin", id);
    }
}
