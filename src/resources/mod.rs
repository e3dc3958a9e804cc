//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: services, timing, rendering
//! handles, and configuration. Each submodule documents the semantics and
//! intended usage of its resource(s).
//!
//! Overview
//! - `camera2d` – shared 2D camera used for world/screen transforms
//! - `debugmode` – presence toggles optional debug overlays
//! - `eventbus` – topic-keyed publish/subscribe service
//! - `gameconfig` – settings loaded from `config.ini`
//! - `renderbackend` – seam between the render queue and the actual drawing
//! - `renderqueue` – draw commands collected during one frame
//! - `resourcecache` – asynchronous, deduplicated asset store
//! - `worldtime` – fixed-timestep clock and interpolation factor
pub mod camera2d;
pub mod debugmode;
pub mod eventbus;
pub mod gameconfig;
pub mod renderbackend;
pub mod renderqueue;
pub mod resourcecache;
pub mod worldtime;
