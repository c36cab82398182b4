//! Collision detection and dispatch.
//!
//! Detection and dispatch are two systems so the detector can work on an
//! immutable snapshot:
//!
//! 1. [`collision_detector`] snapshots active entities in ascending id order,
//!    runs the configured broad phase and the shape narrow phase, and stores
//!    this step's events in [`CollisionState`]. In `Edge` mode a pair is only
//!    reported when it was not overlapping at the previous detection.
//! 2. [`dispatch_collisions`] applies the built-in response (if any) from
//!    pre-mutation velocities, invokes every matching handler once per event,
//!    and renormalizes participants to `target_speed`.
//!
//! Handlers may destroy either participant. Destroyed entities stay in the
//! world until compaction, so later events of the same step still dispatch.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::collider::Shape;
use crate::components::identity::{EntityId, Identity};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::tag::Tag;
use crate::context::SimContext;
use crate::events::collision::CollisionEvent;
use crate::resources::callbacks::CollisionHandlers;
use crate::resources::collisions::CollisionState;
use crate::resources::registry::resolve;
use crate::resources::simconfig::{BroadPhase, CollisionMode, CollisionResponse, SimConfig};
use crate::resources::worldtime::WorldTime;
use crate::systems::broadphase::{brute_force_pairs, grid_pairs};

/// Overlapping pairs in a snapshot sorted by id.
///
/// Pairs come out normalized (lower id first) and in ascending order, each
/// unordered pair at most once.
pub fn detect_pairs(snapshot: &[(EntityId, DVec2, Shape)], broad_phase: BroadPhase) -> Vec<(EntityId, EntityId)> {
    let candidates = match broad_phase {
        BroadPhase::BruteForce => brute_force_pairs(snapshot.len()),
        BroadPhase::Grid { cell_size } => {
            let boxes: Vec<(DVec2, DVec2)> = snapshot
                .iter()
                .map(|(_, position, shape)| shape.aabb(*position))
                .collect();
            grid_pairs(cell_size, &boxes)
        }
    };
    candidates
        .into_iter()
        .filter_map(|(i, j)| {
            let (id_a, pos_a, shape_a) = snapshot[i];
            let (id_b, pos_b, shape_b) = snapshot[j];
            if !shape_a.overlaps(pos_a, &shape_b, pos_b) {
                return None;
            }
            Some(if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) })
        })
        .collect()
}

pub fn collision_detector(
    config: Res<SimConfig>,
    time: Res<WorldTime>,
    mut state: ResMut<CollisionState>,
    query: Query<(&Identity, &MapPosition, &Shape)>,
) {
    let mut snapshot: Vec<(EntityId, DVec2, Shape)> = query
        .iter()
        .filter(|(identity, ..)| identity.active)
        .map(|(identity, position, shape)| (identity.id, position.pos, *shape))
        .collect();
    snapshot.sort_by_key(|(id, ..)| *id);

    let overlapping = detect_pairs(&snapshot, config.broad_phase);
    let reported: Vec<CollisionEvent> = overlapping
        .iter()
        .filter(|pair| config.collision_mode == CollisionMode::Level || !state.previous.contains(*pair))
        .map(|&(a, b)| CollisionEvent::new(a, b, time.elapsed))
        .collect();

    for event in &reported {
        trace!("Collision {} <-> {} at {:.3}", event.a, event.b, event.time);
    }
    state.total += reported.len() as u64;
    state.previous = overlapping.into_iter().collect();
    state.events = reported;
}

/// Equal-mass elastic exchange along `normal` (unit, pointing from a to b).
///
/// Only approaching pairs are changed. An immovable side acts as a wall and
/// the other side reflects off it; two immovable sides are left alone.
pub fn elastic_exchange(
    va: DVec2,
    vb: DVec2,
    normal: DVec2,
    a_fixed: bool,
    b_fixed: bool,
) -> (DVec2, DVec2) {
    let closing = (va - vb).dot(normal);
    if closing <= 0.0 {
        return (va, vb);
    }
    match (a_fixed, b_fixed) {
        (false, false) => (va - normal * closing, vb + normal * closing),
        (false, true) => (va - normal * (2.0 * closing), vb),
        (true, false) => (va, vb + normal * (2.0 * closing)),
        (true, true) => (va, vb),
    }
}

struct BodyState {
    position: DVec2,
    velocity: DVec2,
    shape: Shape,
    fixed: bool,
}

fn body_state(world: &World, id: EntityId) -> Option<BodyState> {
    let entity = resolve(world, id)?;
    let body = world.get::<RigidBody>(entity)?;
    Some(BodyState {
        position: world.get::<MapPosition>(entity)?.pos,
        velocity: body.velocity,
        shape: *world.get::<Shape>(entity)?,
        fixed: body.frozen || world.get::<Tag>(entity) == Some(&Tag::Obstacle),
    })
}

fn apply_elastic(world: &mut World, events: &[CollisionEvent]) {
    // Every delta is computed from the velocities as detected, then summed.
    let mut deltas: FxHashMap<EntityId, DVec2> = FxHashMap::default();
    for event in events {
        let (Some(a), Some(b)) = (body_state(world, event.a), body_state(world, event.b)) else {
            continue;
        };
        let normal = a.shape.contact_normal(a.position, &b.shape, b.position);
        let (va, vb) = elastic_exchange(a.velocity, b.velocity, normal, a.fixed, b.fixed);
        *deltas.entry(event.a).or_insert(DVec2::ZERO) += va - a.velocity;
        *deltas.entry(event.b).or_insert(DVec2::ZERO) += vb - b.velocity;
    }
    for (id, delta) in deltas {
        if delta == DVec2::ZERO {
            continue;
        }
        if let Some(entity) = resolve(world, id)
            && let Some(mut body) = world.get_mut::<RigidBody>(entity)
        {
            body.velocity += delta;
        }
    }
}

fn renormalize(world: &mut World, events: &[CollisionEvent], speed: f64) {
    let participants: FxHashSet<EntityId> = events.iter().flat_map(|e| [e.a, e.b]).collect();
    for id in participants {
        let Some(entity) = resolve(world, id) else {
            continue;
        };
        let is_obstacle = world.get::<Tag>(entity) == Some(&Tag::Obstacle);
        if let Some(mut body) = world.get_mut::<RigidBody>(entity)
            && !body.frozen
            && !is_obstacle
        {
            body.set_speed(speed);
        }
    }
}

pub fn dispatch_collisions(world: &mut World) {
    let events = world.resource::<CollisionState>().events.clone();
    if events.is_empty() {
        return;
    }
    let (response, target_speed) = {
        let config = world.resource::<SimConfig>();
        (config.collision_response, config.target_speed)
    };

    if response == CollisionResponse::Elastic {
        apply_elastic(world, &events);
    }

    // Tags are read before any handler runs so destroying a participant
    // does not change which rules match later events.
    let tagged: Vec<(CollisionEvent, Option<Tag>, Option<Tag>)> = {
        let ctx = SimContext::new(world);
        events
            .iter()
            .map(|event| (*event, ctx.tag(event.a), ctx.tag(event.b)))
            .collect()
    };

    world.resource_scope(|world, mut handlers: Mut<CollisionHandlers>| {
        let mut ctx = SimContext::new(world);
        for (event, tag_a, tag_b) in &tagged {
            for rule in handlers.rules.iter_mut() {
                if let Some((a, b)) = rule.match_and_order(event.a, event.b, *tag_a, *tag_b) {
                    (rule.callback)(&mut ctx, a, b);
                }
            }
        }
    });

    if let Some(speed) = target_speed {
        renormalize(world, &events, speed);
    }
}
