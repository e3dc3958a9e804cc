//! End-of-frame rendering systems.
//!
//! [`debug_marker_system`] queues pivot markers when
//! [`DebugMode`](crate::resources::debugmode::DebugMode) is present.
//! [`flush_render_queue`] must be the last system of the render schedule:
//! it hands the frame's commands to the backend and empties the queue.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::resources::camera2d::{Camera2DRes, ScreenProjection};
use crate::resources::debugmode::DebugMode;
use crate::resources::renderbackend::RenderBackendRes;
use crate::resources::renderqueue::{DrawData, DrawKind, RenderQueue};

/// Resource name carried by debug marker commands.
pub const DEBUG_MARKER: &str = "debug-marker";

/// Queue a marker at every positioned entity while debug mode is on.
pub fn debug_marker_system(
    debug: Option<Res<DebugMode>>,
    camera: Res<Camera2DRes>,
    mut queue: ResMut<RenderQueue>,
    positions: Query<&MapPosition>,
) {
    if debug.is_none() {
        return;
    }
    for position in positions.iter() {
        let data = DrawData {
            source: None,
            position: camera.to_screen_space(position.x(), position.y()),
            scale: 1.0,
        };
        queue.add_to_queue(data, DrawKind::DebugMarker, DEBUG_MARKER);
    }
}

/// Drain the render queue into the active backend.
pub fn flush_render_queue(mut queue: ResMut<RenderQueue>, mut backend: ResMut<RenderBackendRes>) {
    queue.flush(backend.0.as_mut());
}
