//! Spawn scheduler resource.
//!
//! A [`SpawnRule`] describes a stream of entities: how often one appears,
//! how many appear in total, and where and how fast they start. The
//! [`SpawnScheduler`] keeps one accumulator per rule and is advanced by
//! [`spawn_system`](crate::systems::spawn::spawn_system) every step.
//!
//! Accumulation never drops spawns: a step of 3.5 s against a 1 s interval
//! yields three spawns in that step and carries 0.5 s over, up to
//! [`MAX_SPAWNS_PER_STEP`] spawns per rule and step. Once a rule has
//! spawned `max_count` entities it is exhausted and stays inert; it is not
//! removed, so `spawned_count` remains queryable.

use bevy_ecs::prelude::*;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::collider::Shape;
use crate::components::tag::Tag;
use crate::error::SimError;
use crate::resources::registry::EntitySpec;
use crate::resources::simconfig::Rect;

/// Most entities one rule may create in a single step.
pub const MAX_SPAWNS_PER_STEP: u32 = 1024;

/// Handle of a spawn rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnRuleId(pub u64);

/// Where spawned entities appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGen {
    Fixed(DVec2),
    /// Uniformly random point inside the rectangle.
    UniformRect(Rect),
}

/// Initial velocity of spawned entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityGen {
    Fixed(DVec2),
    /// Uniformly random direction at a fixed speed.
    RandomAngle { speed: f64 },
    /// Uniformly random direction with a speed drawn from `[min, max)`.
    RandomAngleRange { min: f64, max: f64 },
}

impl PositionGen {
    pub fn sample(&self, rng: &mut fastrand::Rng) -> DVec2 {
        match *self {
            PositionGen::Fixed(p) => p,
            PositionGen::UniformRect(rect) => DVec2::new(
                rect.min.x + rng.f64() * rect.width(),
                rect.min.y + rng.f64() * rect.height(),
            ),
        }
    }
}

impl VelocityGen {
    pub fn sample(&self, rng: &mut fastrand::Rng) -> DVec2 {
        match *self {
            VelocityGen::Fixed(v) => v,
            VelocityGen::RandomAngle { speed } => random_direction(rng) * speed,
            VelocityGen::RandomAngleRange { min, max } => {
                let speed = min + rng.f64() * (max - min);
                random_direction(rng) * speed
            }
        }
    }
}

fn random_direction(rng: &mut fastrand::Rng) -> DVec2 {
    DVec2::from_angle(rng.f64() * std::f64::consts::TAU)
}

/// Description of a stream of spawned entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Seconds between spawns.
    pub interval: f64,
    /// Total number of entities the rule creates; `None` runs forever.
    #[serde(default)]
    pub max_count: Option<u32>,
    pub position: PositionGen,
    pub velocity: VelocityGen,
    pub shape: Shape,
    #[serde(default)]
    pub tag: Option<Tag>,
    /// Lifespan given to every spawned entity.
    #[serde(default)]
    pub lifespan: Option<f64>,
}

impl SpawnRule {
    pub fn new(interval: f64, position: PositionGen, velocity: VelocityGen, shape: Shape) -> Self {
        Self {
            interval,
            max_count: None,
            position,
            velocity,
            shape,
            tag: None,
            lifespan: None,
        }
    }
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = Some(max_count);
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

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(SimError::Config(format!(
                "spawn interval must be positive, got {}",
                self.interval
            )));
        }
        if let PositionGen::UniformRect(rect) = self.position
            && !(rect.min.is_finite() && rect.max.is_finite() && rect.width() >= 0.0 && rect.height() >= 0.0)
        {
            return Err(SimError::Config("spawn rectangle is inverted or not finite".into()));
        }
        if let VelocityGen::RandomAngleRange { min, max } = self.velocity
            && !(min.is_finite() && max.is_finite() && min <= max)
        {
            return Err(SimError::Config(format!(
                "spawn speed range is invalid: [{min}, {max})"
            )));
        }
        Ok(())
    }

    /// Draw the spec of the next entity.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> EntitySpec {
        EntitySpec {
            position: self.position.sample(rng),
            velocity: self.velocity.sample(rng),
            shape: self.shape,
            tag: self.tag,
            lifespan: self.lifespan,
        }
    }
}

/// A rule plus its runtime state.
#[derive(Debug, Clone)]
pub struct SpawnRuleState {
    pub id: SpawnRuleId,
    pub rule: SpawnRule,
    pub accumulator: f64,
    pub spawned_count: u32,
}

impl SpawnRuleState {
    pub fn new(id: SpawnRuleId, rule: SpawnRule) -> Self {
        Self {
            id,
            rule,
            accumulator: 0.0,
            spawned_count: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.rule.max_count.is_some_and(|max| self.spawned_count >= max)
    }

    /// Accumulate elapsed time. Exhausted rules ignore it.
    pub fn advance(&mut self, elapsed: f64) {
        if self.is_exhausted() {
            return;
        }
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }
    }

    /// Consume every interval that is due and return how many spawns that is.
    ///
    /// The count is capped by the rule's remaining `max_count` and by
    /// [`MAX_SPAWNS_PER_STEP`]; a backlog beyond the per-step cap is dropped.
    /// The accumulator of an exhausted rule is dropped so no backlog survives.
    pub fn take_due(&mut self) -> u32 {
        if self.is_exhausted() {
            self.accumulator = 0.0;
            return 0;
        }
        let limit = match self.rule.max_count {
            Some(max) => (max - self.spawned_count).min(MAX_SPAWNS_PER_STEP),
            None => MAX_SPAWNS_PER_STEP,
        };
        let interval = self.rule.interval;
        let mut due = 0;
        while due < limit && self.accumulator >= interval {
            self.accumulator -= interval;
            due += 1;
        }
        if self.accumulator >= interval {
            self.accumulator = self.accumulator.rem_euclid(interval);
        }
        due
    }

    /// Count a successful spawn and return the new total.
    pub fn record_spawn(&mut self) -> u32 {
        self.spawned_count += 1;
        if self.is_exhausted() {
            self.accumulator = 0.0;
        }
        self.spawned_count
    }
}

/// All spawn rules of a simulation plus the shared random generator.
#[derive(Resource, Debug)]
pub struct SpawnScheduler {
    pub rules: Vec<SpawnRuleState>,
    next_id: u64,
    pub rng: fastrand::Rng,
}

impl SpawnScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn add(&mut self, rule: SpawnRule) -> Result<SpawnRuleId, SimError> {
        rule.validate()?;
        let id = SpawnRuleId(self.next_id);
        self.next_id += 1;
        self.rules.push(SpawnRuleState::new(id, rule));
        Ok(id)
    }

    pub fn remove(&mut self, id: SpawnRuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|state| state.id != id);
        self.rules.len() != before
    }

    pub fn get(&self, id: SpawnRuleId) -> Option<&SpawnRuleState> {
        self.rules.iter().find(|state| state.id == id)
    }

    pub fn get_mut(&mut self, id: SpawnRuleId) -> Option<&mut SpawnRuleState> {
        self.rules.iter_mut().find(|state| state.id == id)
    }

    pub fn spawned_count(&self, id: SpawnRuleId) -> Option<u32> {
        self.get(id).map(|state| state.spawned_count)
    }

    pub fn rule_ids(&self) -> Vec<SpawnRuleId> {
        self.rules.iter().map(|state| state.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(interval: f64) -> SpawnRule {
        SpawnRule::new(
            interval,
            PositionGen::Fixed(DVec2::new(10.0, 10.0)),
            VelocityGen::Fixed(DVec2::ZERO),
            Shape::circle(2.0),
        )
    }

    fn drain(state: &mut SpawnRuleState) -> u32 {
        let due = state.take_due();
        for _ in 0..due {
            state.record_spawn();
        }
        due
    }

    #[test]
    fn large_step_fires_every_interval() {
        let mut state = SpawnRuleState::new(SpawnRuleId(1), rule(1.0));
        state.advance(3.5);
        assert_eq!(drain(&mut state), 3);
        assert!((state.accumulator - 0.5).abs() < 1e-12);
        state.advance(0.5);
        assert_eq!(drain(&mut state), 1);
    }

    #[test]
    fn interval_below_accumulator_precision_is_capped() {
        let mut state = SpawnRuleState::new(SpawnRuleId(1), rule(1e-20));
        state.advance(1.0);
        assert_eq!(state.take_due(), MAX_SPAWNS_PER_STEP);
        assert!(state.accumulator < 1e-20);
        assert_eq!(state.take_due(), 0);
    }

    #[test]
    fn due_count_stops_at_remaining_max_count() {
        let mut state = SpawnRuleState::new(SpawnRuleId(1), rule(1.0).with_max_count(5));
        state.advance(2.5);
        assert_eq!(drain(&mut state), 2);
        state.advance(100.0);
        assert_eq!(state.take_due(), 3);
    }

    #[test]
    fn exhausted_rule_stays_inert() {
        let mut state = SpawnRuleState::new(SpawnRuleId(1), rule(1.0).with_max_count(3));
        state.advance(3.5);
        assert_eq!(drain(&mut state), 3);
        assert!(state.is_exhausted());
        assert_eq!(state.accumulator, 0.0);
        for _ in 0..100 {
            state.advance(1000.0);
            assert_eq!(drain(&mut state), 0);
        }
        assert_eq!(state.spawned_count, 3);
    }

    #[test]
    fn negative_and_nan_elapsed_are_ignored() {
        let mut state = SpawnRuleState::new(SpawnRuleId(1), rule(1.0));
        state.advance(-5.0);
        state.advance(f64::NAN);
        assert_eq!(state.accumulator, 0.0);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut scheduler = SpawnScheduler::new(1);
        assert!(matches!(scheduler.add(rule(0.0)), Err(SimError::Config(_))));
        assert!(scheduler.add(rule(-1.0)).is_err());
        assert!(scheduler.add(rule(0.25)).is_ok());
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        let mut r = rule(1.0);
        r.velocity = VelocityGen::RandomAngleRange { min: 5.0, max: 1.0 };
        assert!(r.validate().is_err());
    }

    #[test]
    fn generators_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        let rect = Rect::new(10.0, 20.0, 110.0, 70.0);
        for _ in 0..1000 {
            let p = PositionGen::UniformRect(rect).sample(&mut rng);
            assert!(p.x >= 10.0 && p.x < 110.0 && p.y >= 20.0 && p.y < 70.0);

            let v = VelocityGen::RandomAngle { speed: 50.0 }.sample(&mut rng);
            assert!((v.length() - 50.0).abs() < 1e-9);

            let v = VelocityGen::RandomAngleRange { min: 20.0, max: 40.0 }.sample(&mut rng);
            assert!(v.length() >= 20.0 - 1e-9 && v.length() < 40.0 + 1e-9);
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let r = SpawnRule::new(
            1.0,
            PositionGen::UniformRect(Rect::from_size(800.0, 600.0)),
            VelocityGen::RandomAngle { speed: 100.0 },
            Shape::circle(3.0),
        );
        let mut a = fastrand::Rng::with_seed(42);
        let mut b = fastrand::Rng::with_seed(42);
        for _ in 0..10 {
            assert_eq!(r.sample(&mut a), r.sample(&mut b));
        }
    }

    #[test]
    fn remove_rule() {
        let mut scheduler = SpawnScheduler::new(1);
        let a = scheduler.add(rule(1.0)).unwrap();
        let b = scheduler.add(rule(2.0)).unwrap();
        assert!(scheduler.remove(a));
        assert!(!scheduler.remove(a));
        assert_eq!(scheduler.rule_ids(), vec![b]);
    }
}
