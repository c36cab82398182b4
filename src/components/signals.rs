// Per-entity side table for behaviour-specific data (hit points, score
// value, combo counters...). Keyed by name, owned by the entity.

use bevy_ecs::prelude::Component;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default, Component)]
pub struct Signals {
    pub scalars: FxHashMap<String, f64>,
    pub integers: FxHashMap<String, i64>,
    pub flags: FxHashSet<String>,
}

impl Signals {
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.set_flag(key);
        self
    }
    pub fn with_integer(mut self, key: impl Into<String>, value: i64) -> Self {
        self.set_integer(key, value);
        self
    }
    pub fn set_scalar(&mut self, key: impl Into<String>, value: f64) {
        self.scalars.insert(key.into(), value);
    }
    pub fn get_scalar(&self, key: &str) -> Option<f64> {
        self.scalars.get(key).copied()
    }
    pub fn set_integer(&mut self, key: impl Into<String>, value: i64) {
        self.integers.insert(key.into(), value);
    }
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.integers.get(key).copied()
    }
    /// Add `by` to an integer (missing keys start at zero) and return the new value.
    pub fn add_integer(&mut self, key: impl Into<String>, by: i64) -> i64 {
        let slot = self.integers.entry(key.into()).or_insert(0);
        *slot += by;
        *slot
    }
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_integer_starts_from_zero() {
        let mut s = Signals::default();
        assert_eq!(s.add_integer("hp", -1), -1);
        assert_eq!(s.add_integer("hp", 3), 2);
        assert_eq!(s.get_integer("hp"), Some(2));
    }

    #[test]
    fn flags_and_scalars() {
        let mut s = Signals::default().with_flag("armored").with_integer("score", 10);
        assert!(s.has_flag("armored"));
        s.clear_flag("armored");
        assert!(!s.has_flag("armored"));
        s.set_scalar("charge", 0.5);
        assert_eq!(s.get_scalar("charge"), Some(0.5));
        assert_eq!(s.get_integer("score"), Some(10));
    }
}
