//! Callback registries.
//!
//! Callbacks are plain boxed closures stored in resources. Exclusive systems
//! invoke them synchronously during the step with a
//! [`SimContext`](crate::context::SimContext) borrowing the world, so a
//! callback can read and change entities, destroy them, spawn new ones or
//! update scene signals. Destruction is deferred to the end of the step, so
//! destroying either participant from a collision callback is safe.

use bevy_ecs::prelude::Resource;

use crate::components::identity::EntityId;
use crate::components::tag::Tag;
use crate::context::SimContext;
use crate::events::spawn::SpawnEvent;
use crate::events::timer::TimerEvent;
use crate::events::tween::TweenCompleteEvent;

/// Collision callback, called with the two participants.
pub type CollisionCallback = Box<dyn FnMut(&mut SimContext, EntityId, EntityId) + Send + Sync>;
pub type SpawnCallback = Box<dyn FnMut(&mut SimContext, &SpawnEvent) + Send + Sync>;
pub type TweenCallback = Box<dyn FnMut(&mut SimContext, &TweenCompleteEvent) + Send + Sync>;
pub type TimerCallback = Box<dyn FnMut(&mut SimContext, &TimerEvent) + Send + Sync>;

/// A collision callback, optionally restricted to a pair of tags.
pub struct CollisionRule {
    /// `None` matches every pair.
    pub tags: Option<(Tag, Tag)>,
    pub callback: CollisionCallback,
}

impl CollisionRule {
    pub fn any(callback: CollisionCallback) -> Self {
        Self {
            tags: None,
            callback,
        }
    }

    pub fn between(tag_a: Tag, tag_b: Tag, callback: CollisionCallback) -> Self {
        Self {
            tags: Some((tag_a, tag_b)),
            callback,
        }
    }

    /// Check if this rule matches the pair and return the ids in rule order.
    ///
    /// For a rule between `Player` and `Enemy` the player's id always comes
    /// first, whichever order the pair was detected in. Rules without tags
    /// return the pair unchanged.
    pub fn match_and_order(
        &self,
        a: EntityId,
        b: EntityId,
        tag_a: Option<Tag>,
        tag_b: Option<Tag>,
    ) -> Option<(EntityId, EntityId)> {
        let Some((want_a, want_b)) = self.tags else {
            return Some((a, b));
        };
        if tag_a == Some(want_a) && tag_b == Some(want_b) {
            Some((a, b))
        } else if tag_a == Some(want_b) && tag_b == Some(want_a) {
            Some((b, a))
        } else {
            None
        }
    }
}

#[derive(Resource, Default)]
pub struct CollisionHandlers {
    pub rules: Vec<CollisionRule>,
}

#[derive(Resource, Default)]
pub struct SpawnHandlers {
    pub callbacks: Vec<SpawnCallback>,
}

#[derive(Resource, Default)]
pub struct TweenHandlers {
    pub callbacks: Vec<TweenCallback>,
}

#[derive(Resource, Default)]
pub struct TimerHandlers {
    pub callbacks: Vec<TimerCallback>,
}
