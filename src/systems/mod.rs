//! Simulation systems.
//!
//! This module groups all ECS systems that advance the simulation, in the
//! order the [`Simulation`](crate::simulation::Simulation) schedule chains
//! them:
//!
//! - [`timer`] – fire expired scene timers
//! - [`spawn`] – run spawn rules
//! - [`movement`] – integrate positions from rigid body velocities and time
//! - [`boundary`] – clamp, wrap, bounce or retire entities at the playfield edge
//! - [`ttl`] – count lifespans down and retire expired entities
//! - [`collision`] – detect overlapping pairs and dispatch collision handlers
//! - [`camera`] – smoothed camera follow
//! - [`tween`] – animate entity properties over time
//! - [`lifecycle`] – despawn entities destroyed during the step
//!
//! Outside the schedule:
//!
//! - [`time`] – update simulation time and delta before the schedule runs
//! - [`drag`] – pointer state machine, applied when the host feeds input
//! - [`broadphase`] – candidate pair generation used by [`collision`]

pub mod boundary;
pub mod broadphase;
pub mod camera;
pub mod collision;
pub mod drag;
pub mod lifecycle;
pub mod movement;
pub mod spawn;
pub mod time;
pub mod timer;
pub mod ttl;
pub mod tween;
