//! Callback context.
//!
//! [`SimContext`] borrows the ECS world for the duration of one callback and
//! exposes the operations a scene script needs: read and change entities,
//! spawn and destroy them, start tweens and timers, and touch scene signals.
//! Every operation addressing an entity by id tolerates stale ids and
//! reports them as `None` or `false`.
//!
//! The [`Simulation`](crate::simulation::Simulation) facade routes its own
//! entity operations through a context as well, so the rules are the same
//! inside and outside callbacks.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::debug;

use crate::components::appearance::Appearance;
use crate::components::collider::Shape;
use crate::components::identity::EntityId;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::signals::Signals;
use crate::components::tag::Tag;
use crate::components::ttl::Ttl;
use crate::components::tween::{Tween, TweenHandle};
use crate::resources::camera2d::Camera2D;
use crate::resources::collisions::CollisionState;
use crate::resources::registry::{self, EntityRegistry, EntitySpec, EntityView};
use crate::resources::spawner::{SpawnRuleId, SpawnScheduler};
use crate::resources::timers::{TimerId, Timers};
use crate::resources::tweens::TweenDriver;
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;

pub struct SimContext<'w> {
    world: &'w mut World,
}

impl<'w> SimContext<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    // ----- entities -----

    pub fn get(&self, id: EntityId) -> Option<EntityView> {
        registry::entity_view(self.world, id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        registry::resolve(self.world, id).is_some()
    }

    pub fn position(&self, id: EntityId) -> Option<DVec2> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get::<MapPosition>(entity).map(|p| p.pos)
    }

    pub fn velocity(&self, id: EntityId) -> Option<DVec2> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get::<RigidBody>(entity).map(|rb| rb.velocity)
    }

    pub fn tag(&self, id: EntityId) -> Option<Tag> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get::<Tag>(entity).copied()
    }

    pub fn shape(&self, id: EntityId) -> Option<Shape> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get::<Shape>(entity).copied()
    }

    pub fn set_position(&mut self, id: EntityId, position: DVec2) -> bool {
        match self.component_mut::<MapPosition>(id) {
            Some(p) => {
                p.pos = position;
                true
            }
            None => false,
        }
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: DVec2) -> bool {
        match self.component_mut::<RigidBody>(id) {
            Some(rb) => {
                rb.velocity = velocity;
                true
            }
            None => false,
        }
    }

    pub fn appearance_mut(&mut self, id: EntityId) -> Option<&mut Appearance> {
        self.component_mut::<Appearance>(id)
    }

    /// Per-entity side table.
    pub fn entity_signals(&self, id: EntityId) -> Option<&Signals> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get::<Signals>(entity)
    }

    pub fn entity_signals_mut(&mut self, id: EntityId) -> Option<&mut Signals> {
        self.component_mut::<Signals>(id)
    }

    /// Give an entity a lifespan, replacing any previous one.
    pub fn set_lifespan(&mut self, id: EntityId, seconds: f64) -> bool {
        let Some(entity) = registry::resolve(self.world, id) else {
            debug!("set_lifespan: unknown id {}", id);
            return false;
        };
        self.world.entity_mut(entity).insert(Ttl::new(seconds));
        true
    }

    pub fn spawn(&mut self, spec: EntitySpec) -> Option<EntityId> {
        registry::create_entity(self.world, &spec)
    }

    pub fn spawn_entity(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        shape: Shape,
        tag: Option<Tag>,
    ) -> Option<EntityId> {
        let spec = EntitySpec {
            position,
            velocity,
            shape,
            tag,
            lifespan: None,
        };
        self.spawn(spec)
    }

    /// Mark an entity destroyed; it is removed at the end of the step.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        registry::destroy_entity(self.world, id)
    }

    pub fn active_count(&self) -> usize {
        self.world.resource::<EntityRegistry>().active_count()
    }

    fn component_mut<T: Component<Mutability = bevy_ecs::component::Mutable>>(
        &mut self,
        id: EntityId,
    ) -> Option<&mut T> {
        let entity = registry::resolve(self.world, id)?;
        self.world.get_mut::<T>(entity).map(Mut::into_inner)
    }

    // ----- scene state -----

    pub fn signals(&self) -> &WorldSignals {
        self.world.resource::<WorldSignals>()
    }

    pub fn signals_mut(&mut self) -> &mut WorldSignals {
        self.world.resource_mut::<WorldSignals>().into_inner()
    }

    /// Simulated seconds since the start.
    pub fn time(&self) -> f64 {
        self.world.resource::<WorldTime>().elapsed
    }

    /// Scaled duration of the current step.
    pub fn delta(&self) -> f64 {
        self.world.resource::<WorldTime>().delta
    }

    pub fn spawned_count(&self, rule: SpawnRuleId) -> Option<u32> {
        self.world.resource::<SpawnScheduler>().spawned_count(rule)
    }

    pub fn collision_count(&self) -> u64 {
        self.world.resource::<CollisionState>().total
    }

    // ----- tweens, timers, camera -----

    pub fn add_tween(&mut self, tween: Tween) -> TweenHandle {
        self.world.resource_mut::<TweenDriver>().add(tween)
    }

    pub fn cancel_tween(&mut self, handle: TweenHandle) -> bool {
        self.world.resource_mut::<TweenDriver>().cancel(handle)
    }

    pub fn stop_all_tweens(&mut self) -> usize {
        self.world.resource_mut::<TweenDriver>().stop_all()
    }

    pub fn after(&mut self, delay: f64, signal: impl Into<String>) -> TimerId {
        self.world.resource_mut::<Timers>().after(delay, signal)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.world.resource_mut::<Timers>().cancel(id)
    }

    pub fn follow(&mut self, id: EntityId) -> bool {
        let Some(position) = self.position(id) else {
            debug!("follow: unknown id {}", id);
            return false;
        };
        let mut camera = self.world.resource_mut::<Camera2D>();
        camera.follow(id);
        camera.snap_to(position);
        true
    }
}
