//! Time update system.
//!
//! Advances the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Feed one frame of `dt` unscaled seconds into `WorldTime`.
///
/// Returns how many simulation ticks the caller must run before rendering;
/// the render pass then reads `WorldTime::alpha`.
pub fn update_world_time(world: &mut World, dt: f32) -> u32 {
    world.resource_mut::<WorldTime>().advance(dt)
}
