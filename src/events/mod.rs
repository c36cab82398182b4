//! Event types produced during a step.
//!
//! Events are plain data handed synchronously to the callbacks registered on
//! the [`Simulation`](crate::simulation::Simulation) (see
//! [`crate::resources::callbacks`]). Nothing is queued across steps except
//! pointer interaction events, which the host drains.
//!
//! Submodules:
//! - [`collision`] – overlapping pairs reported by the collision system
//! - [`interaction`] – hover and drag notifications from the pointer
//! - [`spawn`] – entities created by spawn rules
//! - [`timer`] – expired timers and their signal names
//! - [`tween`] – completion of one-shot tweens
pub mod collision;
pub mod interaction;
pub mod spawn;
pub mod timer;
pub mod tween;
