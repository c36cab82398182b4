use crate::components::identity::EntityId;
use crate::resources::spawner::SpawnRuleId;

/// Emitted after a spawn rule created an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnEvent {
    pub rule: SpawnRuleId,
    pub id: EntityId,
    /// Entities created by the rule so far, this one included.
    pub spawned_count: u32,
}
