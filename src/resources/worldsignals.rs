//! Scene-wide signal storage resource.
//!
//! The [`WorldSignals`] resource holds the named counters, scalars and flags
//! a scene keeps across entities: hit counters, score totals, "game over"
//! flags. Unlike per-entity [`Signals`](crate::components::signals::Signals),
//! these belong to the simulation and are reached from callbacks through
//! [`SimContext`](crate::context::SimContext).
//!
//! Use cases include:
//! - Counting collisions or spawns from a handler
//! - Global flags like "paused" or "player_dead"
//! - Remembering entities of interest by name

use bevy_ecs::prelude::Resource;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::identity::EntityId;

/// Scene-wide signal storage.
#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    /// Floating-point values addressed by string keys.
    pub scalars: FxHashMap<String, f64>,
    /// Integer counters addressed by string keys.
    pub integers: FxHashMap<String, i64>,
    /// String values addressed by string keys.
    pub strings: FxHashMap<String, String>,
    /// Presence-only boolean flags; a key being present means "true".
    pub flags: FxHashSet<String>,
    /// Entities of interest for the current scene.
    pub entities: FxHashMap<String, EntityId>,
}

impl WorldSignals {
    /// Set a floating-point signal value.
    pub fn set_scalar(&mut self, key: impl Into<String>, value: f64) {
        self.scalars.insert(key.into(), value);
    }
    /// Get a floating-point signal by key.
    pub fn get_scalar(&self, key: &str) -> Option<f64> {
        self.scalars.get(key).copied()
    }
    /// Set an integer signal value.
    pub fn set_integer(&mut self, key: impl Into<String>, value: i64) {
        self.integers.insert(key.into(), value);
    }
    /// Get an integer signal by key.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.integers.get(key).copied()
    }
    /// Add `by` to an integer counter (missing keys start at zero) and
    /// return the new value.
    pub fn add_integer(&mut self, key: impl Into<String>, by: i64) -> i64 {
        let slot = self.integers.entry(key.into()).or_insert(0);
        *slot += by;
        *slot
    }
    /// Set a string signal value.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }
    /// Get a string signal by key.
    pub fn get_string(&self, key: &str) -> Option<&String> {
        self.strings.get(key)
    }
    /// Mark a flag as present/true.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    /// Remove a flag (make it false/absent).
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    /// Check whether a flag is present/true.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
    /// Get an entity id by key.
    pub fn get_entity(&self, key: &str) -> Option<EntityId> {
        self.entities.get(key).copied()
    }
    /// Remember an entity id by key.
    pub fn set_entity(&mut self, key: impl Into<String>, id: EntityId) {
        self.entities.insert(key.into(), id);
    }
    /// Forget an entity by key. Returns the id if it existed.
    pub fn remove_entity(&mut self, key: &str) -> Option<EntityId> {
        self.entities.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut signals = WorldSignals::default();
        assert_eq!(signals.add_integer("hits", 1), 1);
        assert_eq!(signals.add_integer("hits", 1), 2);
        assert_eq!(signals.get_integer("hits"), Some(2));
        assert_eq!(signals.get_integer("misses"), None);
    }

    #[test]
    fn flags_strings_and_entities() {
        let mut signals = WorldSignals::default();
        signals.set_flag("paused");
        assert!(signals.has_flag("paused"));
        signals.clear_flag("paused");
        assert!(!signals.has_flag("paused"));

        signals.set_string("scene", "bouncing");
        assert_eq!(signals.get_string("scene").map(String::as_str), Some("bouncing"));

        signals.set_entity("player", EntityId(3));
        assert_eq!(signals.get_entity("player"), Some(EntityId(3)));
        assert_eq!(signals.remove_entity("player"), Some(EntityId(3)));
        assert_eq!(signals.get_entity("player"), None);
    }
}
