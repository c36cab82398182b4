//! Tween driver resource.
//!
//! Holds every running [`Tween`] with its [`TweenHandle`]. The
//! [`tween_system`](crate::systems::tween::tween_system) advances them once
//! per step. Handles are never reused, so cancelling a handle that already
//! finished is a harmless no-op.

use bevy_ecs::prelude::Resource;

use crate::components::identity::EntityId;
use crate::components::tween::{Tween, TweenHandle, TweenProperty};

#[derive(Resource, Debug, Default)]
pub struct TweenDriver {
    next_handle: u64,
    pub(crate) tweens: Vec<(TweenHandle, Tween)>,
}

impl TweenDriver {
    pub fn add(&mut self, tween: Tween) -> TweenHandle {
        self.next_handle += 1;
        let handle = TweenHandle(self.next_handle);
        self.tweens.push((handle, tween));
        handle
    }

    /// Remove a tween without completing it.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(h, _)| *h != handle);
        self.tweens.len() != before
    }

    /// Remove every tween animating one property of `target`. Returns how
    /// many were removed.
    pub fn cancel_property(&mut self, target: EntityId, property: TweenProperty) -> usize {
        let before = self.tweens.len();
        self.tweens
            .retain(|(_, tween)| !(tween.target == target && tween.property == property));
        before - self.tweens.len()
    }

    /// Remove every tween. Returns how many were removed.
    pub fn stop_all(&mut self) -> usize {
        let count = self.tweens.len();
        self.tweens.clear();
        count
    }

    pub fn get(&self, handle: TweenHandle) -> Option<&Tween> {
        self.tweens
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, tween)| tween)
    }

    pub fn contains(&self, handle: TweenHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_leaves_others_running() {
        let mut driver = TweenDriver::default();
        let a = driver.add(Tween::new(EntityId(1), TweenProperty::X, 0.0, 1.0, 1.0));
        let b = driver.add(Tween::new(EntityId(1), TweenProperty::Y, 0.0, 1.0, 1.0));
        assert_ne!(a, b);
        assert!(driver.cancel(a));
        assert!(!driver.contains(a));
        assert!(driver.contains(b));
        assert!(!driver.cancel(a));
    }

    #[test]
    fn cancel_property_and_stop_all() {
        let mut driver = TweenDriver::default();
        driver.add(Tween::new(EntityId(1), TweenProperty::X, 0.0, 1.0, 1.0));
        driver.add(Tween::new(EntityId(1), TweenProperty::X, 5.0, 1.0, 2.0));
        driver.add(Tween::new(EntityId(1), TweenProperty::Y, 0.0, 1.0, 1.0));
        driver.add(Tween::new(EntityId(2), TweenProperty::X, 1.0, 0.0, 1.0));
        assert_eq!(driver.cancel_property(EntityId(1), TweenProperty::X), 2);
        assert_eq!(driver.len(), 2);
        assert_eq!(driver.stop_all(), 2);
        assert!(driver.is_empty());
    }
}
