//! Collision event type.
//!
//! The [`collision_detector`](crate::systems::collision::collision_detector)
//! system records one [`CollisionEvent`] per reported pair and the
//! [`dispatch_collisions`](crate::systems::collision::dispatch_collisions)
//! system hands each of them to the registered handlers.

use crate::components::identity::EntityId;

/// Two entities found overlapping during a step.
///
/// The pair is unordered; it is stored with the lower id in `a` so equal
/// pairs compare equal regardless of detection order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
    /// Simulation time of the step the overlap was detected in.
    pub time: f64,
}

impl CollisionEvent {
    pub fn new(first: EntityId, second: EntityId, time: f64) -> Self {
        let (a, b) = if first <= second { (first, second) } else { (second, first) };
        Self { a, b, time }
    }

    /// The pair as a normalized key.
    pub fn pair(&self) -> (EntityId, EntityId) {
        (self.a, self.b)
    }

    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }

    /// The other participant, if `id` is one of them.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_normalized() {
        let ev = CollisionEvent::new(EntityId(9), EntityId(2), 0.5);
        assert_eq!(ev.pair(), (EntityId(2), EntityId(9)));
        assert_eq!(ev, CollisionEvent::new(EntityId(2), EntityId(9), 0.5));
    }

    #[test]
    fn other_participant() {
        let ev = CollisionEvent::new(EntityId(1), EntityId(2), 0.0);
        assert_eq!(ev.other(EntityId(1)), Some(EntityId(2)));
        assert_eq!(ev.other(EntityId(2)), Some(EntityId(1)));
        assert_eq!(ev.other(EntityId(3)), None);
        assert!(ev.involves(EntityId(2)));
    }
}
