//! Stable entity identity and the active flag.
//!
//! Every simulated entity carries an [`Identity`]. The [`EntityId`] is handed
//! out by the [`EntityRegistry`](crate::resources::registry::EntityRegistry)
//! and is never reused, so a stale id always resolves to "not found" even
//! after the underlying ECS slot has been recycled.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Public handle of a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and lifecycle flag of a simulated entity.
///
/// Destruction only clears `active`; the entity is despawned later by
/// [`compact_destroyed`](crate::systems::lifecycle::compact_destroyed) at the
/// end of the step, so systems holding snapshots never see a dangling slot.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: EntityId,
    pub active: bool,
}

impl Identity {
    pub fn new(id: EntityId) -> Self {
        Self { id, active: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_identity_is_active() {
        let identity = Identity::new(EntityId(7));
        assert_eq!(identity.id, EntityId(7));
        assert!(identity.active);
    }

    #[test]
    fn entity_ids_order_by_value() {
        let mut ids = vec![EntityId(3), EntityId(1), EntityId(2)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(1), EntityId(2), EntityId(3)]);
    }

    #[test]
    fn display_prefixes_hash() {
        assert_eq!(EntityId(42).to_string(), "#42");
    }
}
