//! JSON scene descriptions.
//!
//! A scene file lists the entities to create up front, the spawn rules and
//! timers to install, and the tweens to start. Entities are referred to by
//! their index in the `entities` array.
//!
//! ```json
//! {
//!   "entities": [
//!     { "position": [400, 300], "velocity": [120, -80],
//!       "shape": { "kind": "circle", "radius": 16 }, "tag": "player" }
//!   ],
//!   "spawn_rules": [
//!     { "interval": 0.5, "max_count": 20,
//!       "position": { "uniform_rect": { "min": [0, 0], "max": [800, 600] } },
//!       "velocity": { "random_angle": { "speed": 150 } },
//!       "shape": { "kind": "circle", "radius": 8 }, "tag": "enemy" }
//!   ],
//!   "follow": 0,
//!   "timers": [ { "delay": 5.0, "signal": "wave", "repeat": true } ],
//!   "tweens": [ { "entity": 0, "property": "alpha", "to": 0.5, "duration": 1.0,
//!                 "easing": "sine_in_out", "repeat": "yoyo" } ]
//! }
//! ```

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::identity::EntityId;
use crate::components::tween::{Easing, RepeatMode, Tween, TweenHandle, TweenProperty};
use crate::error::SimError;
use crate::resources::registry::EntitySpec;
use crate::resources::spawner::{SpawnRule, SpawnRuleId};
use crate::resources::timers::TimerId;
use crate::simulation::Simulation;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerSpec {
    pub delay: f64,
    pub signal: String,
    /// Fire every `delay` seconds instead of once.
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TweenSpec {
    /// Index into the scene's `entities`.
    pub entity: usize,
    pub property: TweenProperty,
    /// Start value; the property's current value when omitted.
    #[serde(default)]
    pub from: Option<f64>,
    pub to: f64,
    pub duration: f64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub repeat: RepeatMode,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub spawn_rules: Vec<SpawnRule>,
    /// Index into `entities` of the entity the camera follows.
    #[serde(default)]
    pub follow: Option<usize>,
    #[serde(default)]
    pub timers: Vec<TimerSpec>,
    #[serde(default)]
    pub tweens: Vec<TweenSpec>,
}

/// Ids of everything a scene created, in file order.
#[derive(Debug, Clone, Default)]
pub struct LoadedScene {
    /// `None` where an entity could not be created (capacity or invalid values).
    pub entities: Vec<Option<EntityId>>,
    pub spawn_rules: Vec<SpawnRuleId>,
    pub timers: Vec<TimerId>,
    pub tweens: Vec<TweenHandle>,
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check rules and timers before anything is created.
    pub fn validate(&self) -> Result<(), SimError> {
        for rule in &self.spawn_rules {
            rule.validate()?;
        }
        for timer in &self.timers {
            if timer.repeat && !(timer.delay.is_finite() && timer.delay > 0.0) {
                return Err(SimError::Config(format!(
                    "Repeating timer '{}' needs a positive period",
                    timer.signal
                )));
            }
        }
        if let Some(index) = self.follow
            && index >= self.entities.len()
        {
            return Err(SimError::Config(format!(
                "follow index {} out of range ({} entities)",
                index,
                self.entities.len()
            )));
        }
        for tween in &self.tweens {
            if tween.entity >= self.entities.len() {
                return Err(SimError::Config(format!(
                    "tween entity index {} out of range ({} entities)",
                    tween.entity,
                    self.entities.len()
                )));
            }
        }
        Ok(())
    }

    /// Create the scene's contents in `sim`.
    pub fn apply(&self, sim: &mut Simulation) -> Result<LoadedScene, SimError> {
        self.validate()?;
        let mut loaded = LoadedScene::default();

        for spec in &self.entities {
            let id = sim.spawn(*spec);
            if id.is_none() {
                warn!("Scene entity at {:?} was not created", spec.position);
            }
            loaded.entities.push(id);
        }
        for rule in &self.spawn_rules {
            loaded.spawn_rules.push(sim.add_spawn_rule(*rule)?);
        }
        for timer in &self.timers {
            let id = if timer.repeat {
                sim.every(timer.delay, timer.signal.clone())?
            } else {
                sim.after(timer.delay, timer.signal.clone())
            };
            loaded.timers.push(id);
        }
        for spec in &self.tweens {
            let Some(id) = loaded.entities[spec.entity] else {
                continue;
            };
            let handle = match spec.from {
                Some(from) => Some(
                    sim.add_tween(
                        Tween::new(id, spec.property, from, spec.to, spec.duration)
                            .with_easing(spec.easing)
                            .with_repeat(spec.repeat),
                    ),
                ),
                None => sim.tween_to(id, spec.property, spec.to, spec.duration, spec.easing, spec.repeat),
            };
            loaded.tweens.extend(handle);
        }
        if let Some(index) = self.follow
            && let Some(id) = loaded.entities[index]
        {
            sim.follow(id);
        }

        info!(
            "Loaded scene {}: {} entities, {} spawn rules, {} timers, {} tweens",
            self.name.as_deref().unwrap_or("<unnamed>"),
            loaded.entities.iter().flatten().count(),
            loaded.spawn_rules.len(),
            loaded.timers.len(),
            loaded.tweens.len()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::collider::Shape;
    use crate::components::tag::Tag;
    use crate::resources::simconfig::SimConfig;
    use crate::resources::spawner::{PositionGen, VelocityGen};
    use glam::DVec2;

    const SCENE: &str = r#"{
        "name": "test",
        "entities": [
            { "position": [400, 300], "velocity": [120, -80],
              "shape": { "kind": "circle", "radius": 16 }, "tag": "player" },
            { "position": [100, 100], "shape": { "kind": "rect", "half_width": 20, "half_height": 10 },
              "tag": "obstacle" }
        ],
        "spawn_rules": [
            { "interval": 0.5, "max_count": 3,
              "position": { "uniform_rect": { "min": [0, 0], "max": [800, 600] } },
              "velocity": { "random_angle": { "speed": 150 } },
              "shape": { "kind": "circle", "radius": 8 }, "tag": "enemy" }
        ],
        "follow": 0,
        "timers": [ { "delay": 2.0, "signal": "wave", "repeat": true } ],
        "tweens": [ { "entity": 1, "property": "alpha", "to": 0.5, "duration": 1.0,
                      "easing": "sine_in_out", "repeat": "yoyo" } ]
    }"#;

    #[test]
    fn parses_full_scene() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        assert_eq!(scene.name.as_deref(), Some("test"));
        assert_eq!(scene.entities.len(), 2);
        assert_eq!(scene.entities[0].velocity, DVec2::new(120.0, -80.0));
        assert_eq!(scene.entities[1].velocity, DVec2::ZERO);
        assert_eq!(scene.entities[1].shape, Shape::rect(40.0, 20.0));
        let rule = scene.spawn_rules[0];
        assert_eq!(rule.max_count, Some(3));
        assert_eq!(rule.tag, Some(Tag::Enemy));
        assert!(matches!(rule.position, PositionGen::UniformRect(_)));
        assert_eq!(rule.velocity, VelocityGen::RandomAngle { speed: 150.0 });
        assert_eq!(scene.tweens[0].easing, Easing::SineInOut);
        assert_eq!(scene.tweens[0].repeat, RepeatMode::Yoyo);
        assert_eq!(scene.tweens[0].from, None);
    }

    #[test]
    fn empty_object_is_an_empty_scene() {
        let scene = SceneDescription::from_json("{}").unwrap();
        assert_eq!(scene, SceneDescription::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SceneDescription::from_json("{ \"entities\": [ {} ] }").unwrap_err();
        assert!(matches!(err, SimError::Parse(_)));
    }

    #[test]
    fn apply_creates_everything() {
        let scene = SceneDescription::from_json(SCENE).unwrap();
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let loaded = scene.apply(&mut sim).unwrap();
        assert_eq!(loaded.entities.len(), 2);
        assert!(loaded.entities.iter().all(Option::is_some));
        assert_eq!(loaded.spawn_rules.len(), 1);
        assert_eq!(loaded.timers.len(), 1);
        assert_eq!(loaded.tweens.len(), 1);
        assert_eq!(sim.active_count(), 2);
        assert_eq!(sim.camera().target, loaded.entities[0]);
    }

    #[test]
    fn out_of_range_follow_is_rejected() {
        let scene = SceneDescription {
            follow: Some(3),
            ..Default::default()
        };
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert!(matches!(scene.apply(&mut sim), Err(SimError::Config(_))));
        assert_eq!(sim.active_count(), 0);
    }

    #[test]
    fn bad_spawn_rule_is_rejected_before_spawning() {
        let mut scene = SceneDescription::from_json(SCENE).unwrap();
        scene.spawn_rules[0].interval = 0.0;
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        assert!(scene.apply(&mut sim).is_err());
        assert_eq!(sim.active_count(), 0);
    }
}
