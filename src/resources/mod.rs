//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a step: configuration, timing, the entity
//! index, schedulers and callback registries. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `callbacks` – collision, spawn, tween and timer handlers
//! - `camera2d` – smoothed follow camera
//! - `collisions` – previous overlap set and this step's collision events
//! - `pointer` – drag state machine and pending interaction events
//! - `registry` – stable entity ids, creation and deferred destruction
//! - `simconfig` – simulation configuration loaded from INI
//! - `spawner` – spawn rules and their accumulators
//! - `timers` – scene-level delayed and repeating signals
//! - `tweens` – running tweens
//! - `worldsignals` – scene-wide counters, scalars and flags
//! - `worldtime` – simulation time and delta
pub mod callbacks;
pub mod camera2d;
pub mod collisions;
pub mod pointer;
pub mod registry;
pub mod simconfig;
pub mod spawner;
pub mod timers;
pub mod tweens;
pub mod worldsignals;
pub mod worldtime;
