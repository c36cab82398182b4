//! Playfield simulation library.
//!
//! A fixed-step 2D entity simulation built on an ECS world. This module
//! exposes the components, resources, systems and events, plus the
//! [`simulation::Simulation`] facade hosts drive and the JSON
//! [`scene`] loader, for use by the bundled runner and integration tests.

pub mod components;
pub mod context;
pub mod error;
pub mod events;
pub mod resources;
pub mod scene;
pub mod simulation;
pub mod systems;
