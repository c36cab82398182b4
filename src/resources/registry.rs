//! Entity registry resource and world-level entity operations.
//!
//! The [`EntityRegistry`] maps stable [`EntityId`]s to ECS [`Entity`] slots.
//! Ids are handed out from a monotonically increasing counter and never
//! reused; the ECS slot behind a destroyed id may be recycled by bevy once
//! [`compact_destroyed`](crate::systems::lifecycle::compact_destroyed) has
//! despawned it, but the id itself will always resolve to "not found".
//!
//! Destruction is two-phase:
//!
//! 1. [`destroy_entity`] (or any system calling [`EntityRegistry::retire`])
//!    clears [`Identity::active`]. Every other system skips inactive entities
//!    from that point on.
//! 2. The compaction system despawns inactive entities at the end of the
//!    step and forgets their ids.
//!
//! This keeps destruction from inside a collision handler or a spawn callback
//! safe while other systems still hold snapshots of the step.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::appearance::{Appearance, VisualState};
use crate::components::collider::Shape;
use crate::components::identity::{EntityId, Identity};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::signals::Signals;
use crate::components::tag::Tag;
use crate::components::ttl::Ttl;

/// Owner of the id counter and the id → ECS slot index.
#[derive(Resource, Debug)]
pub struct EntityRegistry {
    next_id: u64,
    index: FxHashMap<EntityId, Entity>,
    max_entities: Option<usize>,
    active: usize,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EntityRegistry {
    pub fn new(max_entities: Option<usize>) -> Self {
        Self {
            next_id: 1,
            index: FxHashMap::default(),
            max_entities,
            active: 0,
        }
    }

    /// Number of live (active) entities.
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Number of entities still holding an ECS slot, including the ones
    /// destroyed this step and not yet compacted.
    pub fn slot_count(&self) -> usize {
        self.index.len()
    }

    pub fn max_entities(&self) -> Option<usize> {
        self.max_entities
    }

    /// True if another entity may be created.
    pub fn has_capacity(&self) -> bool {
        self.max_entities.is_none_or(|max| self.active < max)
    }

    /// ECS slot of an id, whether or not it is still active.
    pub fn lookup(&self, id: EntityId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn register(&mut self, id: EntityId, entity: Entity) {
        self.index.insert(id, entity);
        self.active += 1;
    }

    /// Mark an identity inactive. Returns false if it already was.
    ///
    /// Every destruction path goes through here so the live count stays
    /// exact.
    pub fn retire(&mut self, identity: &mut Identity) -> bool {
        if !identity.active {
            return false;
        }
        identity.active = false;
        self.active = self.active.saturating_sub(1);
        true
    }

    /// Drop the index entry of a compacted entity.
    pub(crate) fn forget(&mut self, id: EntityId) -> Option<Entity> {
        self.index.remove(&id)
    }
}

/// Everything needed to create an entity.
///
/// Deserializable so scenes and spawn rules can describe entities in JSON:
///
/// ```json
/// { "position": [400, 300], "velocity": [120, -80],
///   "shape": { "kind": "circle", "radius": 16 }, "tag": "enemy" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub position: DVec2,
    #[serde(default)]
    pub velocity: DVec2,
    pub shape: Shape,
    #[serde(default)]
    pub tag: Option<Tag>,
    /// Seconds until the entity destroys itself.
    #[serde(default)]
    pub lifespan: Option<f64>,
}

impl EntitySpec {
    pub fn new(position: DVec2, shape: Shape) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            shape,
            tag: None,
            lifespan: None,
        }
    }
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }
    pub fn with_lifespan(mut self, seconds: f64) -> Self {
        self.lifespan = Some(seconds);
        self
    }
}

/// Read-only snapshot of an entity, for renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub shape: Shape,
    pub tag: Option<Tag>,
    pub appearance: Appearance,
    pub visual_state: VisualState,
}

/// Create an entity from a spec.
///
/// Returns `None` when the registry is at capacity or the spec holds a
/// non-finite position or velocity.
pub fn create_entity(world: &mut World, spec: &EntitySpec) -> Option<EntityId> {
    if !world.resource::<EntityRegistry>().has_capacity() {
        debug!("create_entity: capacity reached, spawn ignored");
        return None;
    }
    if !(spec.position.is_finite() && spec.velocity.is_finite()) {
        debug!("create_entity: non-finite position or velocity, spawn ignored");
        return None;
    }

    let id = world.resource_mut::<EntityRegistry>().allocate();
    let mut entity_cmd = world.spawn((
        Identity::new(id),
        MapPosition::from(spec.position),
        RigidBody::with_velocity(spec.velocity),
        spec.shape,
        Appearance::default(),
        VisualState::default(),
        Signals::default(),
    ));
    if let Some(tag) = spec.tag {
        entity_cmd.insert(tag);
    }
    if let Some(seconds) = spec.lifespan {
        entity_cmd.insert(Ttl::new(seconds));
    }
    let entity = entity_cmd.id();

    world.resource_mut::<EntityRegistry>().register(id, entity);
    debug!("Created entity {} at {:?}", id, spec.position);
    Some(id)
}

/// Mark an entity destroyed. It disappears from every query right away and
/// is despawned at the end of the step.
///
/// Returns false for unknown, stale or already destroyed ids.
pub fn destroy_entity(world: &mut World, id: EntityId) -> bool {
    let Some(entity) = world.resource::<EntityRegistry>().lookup(id) else {
        debug!("destroy_entity: unknown id {}", id);
        return false;
    };
    world.resource_scope(|world, mut registry: Mut<EntityRegistry>| {
        match world.get_mut::<Identity>(entity) {
            Some(mut identity) => registry.retire(&mut identity),
            None => false,
        }
    })
}

/// ECS slot of an active entity.
pub fn resolve(world: &World, id: EntityId) -> Option<Entity> {
    let entity = world.resource::<EntityRegistry>().lookup(id)?;
    let identity = world.get::<Identity>(entity)?;
    identity.active.then_some(entity)
}

/// Snapshot of an active entity.
pub fn entity_view(world: &World, id: EntityId) -> Option<EntityView> {
    let entity = resolve(world, id)?;
    Some(EntityView {
        id,
        position: world.get::<MapPosition>(entity)?.pos,
        velocity: world.get::<RigidBody>(entity)?.velocity,
        shape: *world.get::<Shape>(entity)?,
        tag: world.get::<Tag>(entity).copied(),
        appearance: world.get::<Appearance>(entity).copied().unwrap_or_default(),
        visual_state: world.get::<VisualState>(entity).copied().unwrap_or_default(),
    })
}

/// Snapshots of all active entities, in ascending id order.
pub fn active_views(world: &mut World) -> Vec<EntityView> {
    let mut query = world.query::<(
        &Identity,
        &MapPosition,
        &RigidBody,
        &Shape,
        Option<&Tag>,
        &Appearance,
        &VisualState,
    )>();
    let mut views: Vec<EntityView> = query
        .iter(world)
        .filter(|(identity, ..)| identity.active)
        .map(
            |(identity, position, body, shape, tag, appearance, visual_state)| EntityView {
                id: identity.id,
                position: position.pos,
                velocity: body.velocity,
                shape: *shape,
                tag: tag.copied(),
                appearance: *appearance,
                visual_state: *visual_state,
            },
        )
        .collect();
    views.sort_by_key(|view| view.id);
    views
}

/// Visit every active entity in ascending id order.
pub fn for_each_active(world: &mut World, mut f: impl FnMut(&EntityView)) {
    for view in active_views(world) {
        f(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_registry(max: Option<usize>) -> World {
        let mut world = World::new();
        world.insert_resource(EntityRegistry::new(max));
        world
    }

    fn ball(x: f64, y: f64) -> EntitySpec {
        EntitySpec::new(DVec2::new(x, y), Shape::circle(4.0))
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut world = world_with_registry(None);
        let a = create_entity(&mut world, &ball(0.0, 0.0)).unwrap();
        let b = create_entity(&mut world, &ball(1.0, 0.0)).unwrap();
        assert!(a < b);
        assert!(destroy_entity(&mut world, a));
        let c = create_entity(&mut world, &ball(2.0, 0.0)).unwrap();
        assert!(c > b);
        assert_ne!(c, a);
    }

    #[test]
    fn destroyed_entity_is_not_found() {
        let mut world = world_with_registry(None);
        let id = create_entity(&mut world, &ball(5.0, 5.0)).unwrap();
        assert!(entity_view(&world, id).is_some());
        assert!(destroy_entity(&mut world, id));
        assert!(entity_view(&world, id).is_none());
        assert!(!destroy_entity(&mut world, id));
        assert!(!destroy_entity(&mut world, EntityId(999)));
    }

    #[test]
    fn capacity_limits_live_entities() {
        let mut world = world_with_registry(Some(2));
        let a = create_entity(&mut world, &ball(0.0, 0.0)).unwrap();
        assert!(create_entity(&mut world, &ball(0.0, 0.0)).is_some());
        assert!(create_entity(&mut world, &ball(0.0, 0.0)).is_none());
        destroy_entity(&mut world, a);
        assert!(create_entity(&mut world, &ball(0.0, 0.0)).is_some());
        assert_eq!(world.resource::<EntityRegistry>().active_count(), 2);
    }

    #[test]
    fn non_finite_spec_is_rejected() {
        let mut world = world_with_registry(None);
        assert!(create_entity(&mut world, &ball(f64::NAN, 0.0)).is_none());
        assert_eq!(world.resource::<EntityRegistry>().active_count(), 0);
    }

    #[test]
    fn views_are_sorted_and_skip_inactive() {
        let mut world = world_with_registry(None);
        let ids: Vec<EntityId> = (0..5)
            .map(|i| create_entity(&mut world, &ball(i as f64, 0.0)).unwrap())
            .collect();
        destroy_entity(&mut world, ids[2]);

        let mut visited = Vec::new();
        for_each_active(&mut world, |view| visited.push(view.id));
        assert_eq!(visited, vec![ids[0], ids[1], ids[3], ids[4]]);
    }

    #[test]
    fn optional_components_follow_spec() {
        let mut world = world_with_registry(None);
        let spec = ball(1.0, 2.0)
            .with_velocity(DVec2::new(3.0, 4.0))
            .with_tag(Tag::Pickup)
            .with_lifespan(2.0);
        let id = create_entity(&mut world, &spec).unwrap();
        let view = entity_view(&world, id).unwrap();
        assert_eq!(view.tag, Some(Tag::Pickup));
        assert_eq!(view.velocity, DVec2::new(3.0, 4.0));
        assert_eq!(view.visual_state, VisualState::Idle);
        let entity = resolve(&world, id).unwrap();
        assert_eq!(world.get::<Ttl>(entity).map(|t| t.remaining), Some(2.0));
    }

    #[test]
    fn spec_deserializes_from_json() {
        let spec: EntitySpec = serde_json::from_str(
            r#"{ "position": [10, 20], "shape": { "kind": "rect", "half_width": 4, "half_height": 2 }, "tag": "obstacle" }"#,
        )
        .unwrap();
        assert_eq!(spec.position, DVec2::new(10.0, 20.0));
        assert_eq!(spec.velocity, DVec2::ZERO);
        assert_eq!(spec.tag, Some(Tag::Obstacle));
        assert_eq!(spec.shape.half_extents(), DVec2::new(4.0, 2.0));
    }
}
