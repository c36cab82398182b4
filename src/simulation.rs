//! The simulation facade.
//!
//! [`Simulation`] owns the ECS [`World`] and the [`Schedule`] that advances
//! it. Hosts (a renderer, an input layer, the bundled CLI) only talk to this
//! type: they feed pointer input and a frame delta, register callbacks, and
//! read entity snapshots and the camera position back.
//!
//! # Step order
//!
//! One [`Simulation::tick`] runs, in order:
//!
//! 1. time update (scaled by `time_scale`)
//! 2. timers
//! 3. spawn rules
//! 4. movement
//! 5. boundary policy
//! 6. lifespans
//! 7. collision detection
//! 8. collision dispatch (response, handlers, speed renormalization)
//! 9. camera follow
//! 10. tweens
//! 11. release of bodies whose drag return finished
//! 12. compaction of destroyed entities
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use playfield::components::collider::Shape;
//! use playfield::resources::simconfig::{BoundaryPolicy, Rect, SimConfig};
//! use playfield::simulation::Simulation;
//!
//! let config = SimConfig::new().with_boundary(BoundaryPolicy::Wrap, Rect::from_size(800.0, 600.0));
//! let mut sim = Simulation::new(config).unwrap();
//! let id = sim
//!     .spawn_entity(DVec2::new(799.0, 300.0), DVec2::new(50.0, 0.0), Shape::point(), None)
//!     .unwrap();
//! sim.tick(1.0);
//! assert_eq!(sim.get(id).unwrap().position, DVec2::new(49.0, 300.0));
//! ```

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::DVec2;
use log::{debug, info};

use crate::components::collider::Shape;
use crate::components::identity::EntityId;
use crate::components::tag::Tag;
use crate::components::tween::{Easing, RepeatMode, Tween, TweenHandle, TweenProperty};
use crate::context::SimContext;
use crate::error::SimError;
use crate::events::collision::CollisionEvent;
use crate::events::interaction::InteractionEvent;
use crate::events::spawn::SpawnEvent;
use crate::events::timer::TimerEvent;
use crate::events::tween::TweenCompleteEvent;
use crate::resources::callbacks::{
    CollisionHandlers, CollisionRule, SpawnHandlers, TimerHandlers, TweenHandlers,
};
use crate::resources::camera2d::Camera2D;
use crate::resources::collisions::CollisionState;
use crate::resources::pointer::{DragState, InteractionEvents, Pointer};
use crate::resources::registry::{self, EntityRegistry, EntitySpec, EntityView};
use crate::resources::simconfig::SimConfig;
use crate::resources::spawner::{SpawnRule, SpawnRuleId, SpawnScheduler};
use crate::resources::timers::{TimerId, Timers};
use crate::resources::tweens::TweenDriver;
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;
use crate::systems::boundary::boundary_system;
use crate::systems::camera::camera_follow;
use crate::systems::collision::{collision_detector, dispatch_collisions};
use crate::systems::drag;
use crate::systems::lifecycle::compact_destroyed;
use crate::systems::movement::movement;
use crate::systems::spawn::spawn_system;
use crate::systems::time::update_world_time;
use crate::systems::timer::timer_system;
use crate::systems::ttl::ttl_system;
use crate::systems::tween::{read_property, tween_system};

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Validate the configuration and build the world and schedule.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(WorldSignals::default());
        world.insert_resource(EntityRegistry::new(config.max_entities));
        world.insert_resource(SpawnScheduler::new(config.seed));
        world.insert_resource(CollisionState::default());
        world.insert_resource(Camera2D::from_config(&config));
        world.insert_resource(Pointer::default());
        world.insert_resource(InteractionEvents::default());
        world.insert_resource(TweenDriver::default());
        world.insert_resource(Timers::default());
        world.insert_resource(CollisionHandlers::default());
        world.insert_resource(SpawnHandlers::default());
        world.insert_resource(TweenHandlers::default());
        world.insert_resource(TimerHandlers::default());
        info!(
            "Simulation ready: {} policy over {}x{}, {:?} collisions, {:?} broad phase",
            config.boundary_policy.as_str(),
            config.bounds.width(),
            config.bounds.height(),
            config.collision_mode,
            config.broad_phase
        );
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                timer_system,
                spawn_system,
                movement,
                boundary_system,
                ttl_system,
                collision_detector,
                dispatch_collisions,
                camera_follow,
                tween_system,
                drag::release_returned,
                compact_destroyed,
            )
                .chain(),
        );
        schedule
            .initialize(&mut world)
            .map_err(|e| SimError::Config(format!("Failed to initialize schedule: {e}")))?;

        Ok(Self { world, schedule })
    }

    /// Advance the simulation by `dt` seconds (before time scaling).
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            debug!("tick: ignoring invalid dt {}", dt);
            0.0
        };
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run a closure with a callback context outside of a step.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut SimContext) -> R) -> R {
        let mut ctx = SimContext::new(&mut self.world);
        f(&mut ctx)
    }

    // ----- entities -----

    pub fn spawn(&mut self, spec: EntitySpec) -> Option<EntityId> {
        registry::create_entity(&mut self.world, &spec)
    }

    pub fn spawn_entity(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        shape: Shape,
        tag: Option<Tag>,
    ) -> Option<EntityId> {
        self.with_context(|ctx| ctx.spawn_entity(position, velocity, shape, tag))
    }

    pub fn destroy(&mut self, id: EntityId) -> bool {
        registry::destroy_entity(&mut self.world, id)
    }

    pub fn get(&self, id: EntityId) -> Option<EntityView> {
        registry::entity_view(&self.world, id)
    }

    /// Snapshots of all active entities, in ascending id order.
    pub fn entities(&mut self) -> impl Iterator<Item = EntityView> + use<> {
        registry::active_views(&mut self.world).into_iter()
    }

    pub fn for_each_active(&mut self, f: impl FnMut(&EntityView)) {
        registry::for_each_active(&mut self.world, f);
    }

    pub fn active_count(&self) -> usize {
        self.world.resource::<EntityRegistry>().active_count()
    }

    pub fn set_position(&mut self, id: EntityId, position: DVec2) -> bool {
        self.with_context(|ctx| ctx.set_position(id, position))
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: DVec2) -> bool {
        self.with_context(|ctx| ctx.set_velocity(id, velocity))
    }

    pub fn set_lifespan(&mut self, id: EntityId, seconds: f64) -> bool {
        self.with_context(|ctx| ctx.set_lifespan(id, seconds))
    }

    // ----- callbacks -----

    /// Called once per reported collision with the pair, lower id first.
    pub fn on_collision<F>(&mut self, callback: F)
    where
        F: FnMut(&mut SimContext, EntityId, EntityId) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<CollisionHandlers>()
            .rules
            .push(CollisionRule::any(Box::new(callback)));
    }

    /// Called for collisions between a `tag_a` entity and a `tag_b` entity,
    /// with the ids in that order.
    pub fn on_collision_between<F>(&mut self, tag_a: Tag, tag_b: Tag, callback: F)
    where
        F: FnMut(&mut SimContext, EntityId, EntityId) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<CollisionHandlers>()
            .rules
            .push(CollisionRule::between(tag_a, tag_b, Box::new(callback)));
    }

    pub fn on_spawn<F>(&mut self, callback: F)
    where
        F: FnMut(&mut SimContext, &SpawnEvent) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<SpawnHandlers>()
            .callbacks
            .push(Box::new(callback));
    }

    pub fn on_tween_complete<F>(&mut self, callback: F)
    where
        F: FnMut(&mut SimContext, &TweenCompleteEvent) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<TweenHandlers>()
            .callbacks
            .push(Box::new(callback));
    }

    pub fn on_timer<F>(&mut self, callback: F)
    where
        F: FnMut(&mut SimContext, &TimerEvent) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<TimerHandlers>()
            .callbacks
            .push(Box::new(callback));
    }

    // ----- collisions -----

    /// Collision events reported since the start.
    pub fn collision_count(&self) -> u64 {
        self.world.resource::<CollisionState>().total
    }

    /// Events reported during the last step.
    pub fn last_collisions(&self) -> &[CollisionEvent] {
        &self.world.resource::<CollisionState>().events
    }

    // ----- camera -----

    pub fn camera_position(&self) -> DVec2 {
        self.world.resource::<Camera2D>().position
    }

    pub fn camera(&self) -> &Camera2D {
        self.world.resource::<Camera2D>()
    }

    /// Follow an entity, snapping the camera onto it first.
    pub fn follow(&mut self, id: EntityId) -> bool {
        self.with_context(|ctx| ctx.follow(id))
    }

    pub fn unfollow(&mut self) {
        self.world.resource_mut::<Camera2D>().unfollow();
    }

    pub fn set_camera_offset(&mut self, offset: DVec2) {
        self.world.resource_mut::<Camera2D>().offset = offset;
    }

    // ----- pointer -----

    pub fn pointer_down(&mut self, position: DVec2) -> Option<EntityId> {
        drag::pointer_down(&mut self.world, position)
    }

    pub fn pointer_move(&mut self, position: DVec2) {
        drag::pointer_move(&mut self.world, position);
    }

    pub fn pointer_up(&mut self) -> Option<EntityId> {
        drag::pointer_up(&mut self.world)
    }

    pub fn drag_state(&self) -> DragState {
        self.world.resource::<Pointer>().state
    }

    pub fn drain_interaction_events(&mut self) -> Vec<InteractionEvent> {
        self.world.resource_mut::<InteractionEvents>().drain()
    }

    // ----- spawning -----

    pub fn add_spawn_rule(&mut self, rule: SpawnRule) -> Result<SpawnRuleId, SimError> {
        let id = self.world.resource_mut::<SpawnScheduler>().add(rule)?;
        debug!("Added spawn rule {:?} every {}s", id, rule.interval);
        Ok(id)
    }

    pub fn remove_spawn_rule(&mut self, id: SpawnRuleId) -> bool {
        self.world.resource_mut::<SpawnScheduler>().remove(id)
    }

    pub fn spawned_count(&self, id: SpawnRuleId) -> Option<u32> {
        self.world.resource::<SpawnScheduler>().spawned_count(id)
    }

    // ----- tweens -----

    pub fn add_tween(&mut self, tween: Tween) -> TweenHandle {
        self.world.resource_mut::<TweenDriver>().add(tween)
    }

    /// Tween a property from its current value.
    pub fn tween_to(
        &mut self,
        id: EntityId,
        property: TweenProperty,
        to: f64,
        duration: f64,
        easing: Easing,
        repeat: RepeatMode,
    ) -> Option<TweenHandle> {
        let entity = registry::resolve(&self.world, id)?;
        let from = read_property(&self.world, entity, property)?;
        let tween = Tween::new(id, property, from, to, duration)
            .with_easing(easing)
            .with_repeat(repeat);
        Some(self.add_tween(tween))
    }

    pub fn cancel_tween(&mut self, handle: TweenHandle) -> bool {
        self.world.resource_mut::<TweenDriver>().cancel(handle)
    }

    pub fn stop_all_tweens(&mut self) -> usize {
        self.world.resource_mut::<TweenDriver>().stop_all()
    }

    pub fn tween_count(&self) -> usize {
        self.world.resource::<TweenDriver>().len()
    }

    // ----- timers -----

    pub fn after(&mut self, delay: f64, signal: impl Into<String>) -> TimerId {
        self.world.resource_mut::<Timers>().after(delay, signal)
    }

    pub fn every(&mut self, period: f64, signal: impl Into<String>) -> Result<TimerId, SimError> {
        self.world.resource_mut::<Timers>().every(period, signal)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.world.resource_mut::<Timers>().cancel(id)
    }

    // ----- scene state and time -----

    pub fn signals(&self) -> &WorldSignals {
        self.world.resource::<WorldSignals>()
    }

    pub fn signals_mut(&mut self) -> &mut WorldSignals {
        self.world.resource_mut::<WorldSignals>().into_inner()
    }

    /// Simulated seconds since the start.
    pub fn elapsed(&self) -> f64 {
        self.world.resource::<WorldTime>().elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    pub fn time_scale(&self) -> f64 {
        self.world.resource::<WorldTime>().time_scale
    }

    /// Change the time scale. Negative or non-finite values are rejected.
    pub fn set_time_scale(&mut self, scale: f64) -> bool {
        if !(scale.is_finite() && scale >= 0.0) {
            debug!("set_time_scale: rejecting {}", scale);
            return false;
        }
        self.world.resource_mut::<WorldTime>().time_scale = scale;
        true
    }
}
