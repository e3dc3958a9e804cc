//! Engine systems.
//!
//! This module groups all ECS systems that advance simulation and rendering.
//!
//! Submodules overview
//! - [`loader`] – background loader thread and the per-frame result poll
//! - [`movement`] – integrate positions from rigid body velocities
//! - [`render`] – debug markers and the end-of-frame queue flush
//! - [`sprite`] – per-tick sprite snapshots and per-frame sprite drawing
//! - [`time`] – advance the fixed-timestep clock

pub mod loader;
pub mod movement;
pub mod render;
pub mod sprite;
pub mod time;
