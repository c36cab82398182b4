//! ECS components for simulated entities.
//!
//! Every entity created through the
//! [`EntityRegistry`](crate::resources::registry::EntityRegistry) carries an
//! [`identity::Identity`], a [`mapposition::MapPosition`], a
//! [`rigidbody::RigidBody`], a [`collider::Shape`], an
//! [`appearance::Appearance`], a [`appearance::VisualState`] and a
//! [`signals::Signals`] table. [`tag::Tag`] and [`ttl::Ttl`] are optional.
//!
//! Submodules overview:
//! - [`appearance`] – scale/alpha/rotation and pointer highlight state
//! - [`collider`] – circle or box shape used for collisions, boundaries and picking
//! - [`identity`] – stable [`identity::EntityId`] and the active flag
//! - [`mapposition`] – world-space position of the entity's center
//! - [`rigidbody`] – velocity and the frozen flag
//! - [`signals`] – per-entity side table for behaviour-specific data
//! - [`tag`] – fixed set of entity roles
//! - [`ttl`] – lifespan countdown
//! - [`tween`] – tween data (easing, repeat mode, target property)

pub mod appearance;
pub mod collider;
pub mod identity;
pub mod mapposition;
pub mod rigidbody;
pub mod signals;
pub mod tag;
pub mod ttl;
pub mod tween;
