use crate::components::identity::EntityId;
use crate::components::tween::{TweenHandle, TweenProperty};

/// Emitted when a `Once` tween reaches its end value.
///
/// Cancelled tweens, repeating tweens and tweens whose target is gone never
/// produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenCompleteEvent {
    pub handle: TweenHandle,
    pub target: EntityId,
    pub property: TweenProperty,
}
