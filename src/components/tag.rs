use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Role of an entity in a scene.
///
/// The set is closed on purpose: behaviour-specific data goes in the
/// per-entity [`Signals`](super::signals::Signals) table instead of new tags.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Player,
    Enemy,
    Projectile,
    Obstacle,
    Pickup,
    Particle,
    /// Can be picked up and moved by the pointer.
    Draggable,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Player,
        Tag::Enemy,
        Tag::Projectile,
        Tag::Obstacle,
        Tag::Pickup,
        Tag::Particle,
        Tag::Draggable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Enemy => "enemy",
            Tag::Projectile => "projectile",
            Tag::Obstacle => "obstacle",
            Tag::Pickup => "pickup",
            Tag::Particle => "particle",
            Tag::Draggable => "draggable",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Tag::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}
