//! Rendering backend seam.
//!
//! The engine core never rasterizes anything itself. Once per frame the
//! [`RenderQueue`](crate::resources::renderqueue::RenderQueue) hands its
//! grouped commands to whatever [`RenderBackend`] sits in the world's
//! [`RenderBackendRes`].

use bevy_ecs::prelude::Resource;
use log::{debug, trace};

use crate::resources::renderqueue::{DrawCommand, DrawKind};

/// Receives the grouped draw commands of one frame.
pub trait RenderBackend {
    /// Called before the first batch of `frame`.
    fn begin_frame(&mut self, _frame: u64) {}

    /// Draw every command of one kind, in the given order.
    fn draw_batch(&mut self, kind: DrawKind, commands: &[DrawCommand]);

    /// Called after the last batch of `frame`.
    fn end_frame(&mut self, _frame: u64) {}
}

/// ECS resource holding the active backend.
#[derive(Resource)]
pub struct RenderBackendRes(pub Box<dyn RenderBackend + Send + Sync>);

impl RenderBackendRes {
    pub fn new(backend: impl RenderBackend + Send + Sync + 'static) -> Self {
        Self(Box::new(backend))
    }
}

/// Headless backend that only reports what it was asked to draw.
#[derive(Debug, Default, Clone)]
pub struct LogBackend {
    /// Commands drawn over the backend's lifetime.
    pub total_commands: u64,
    /// Frames seen.
    pub frames: u64,
    current: usize,
}

impl RenderBackend for LogBackend {
    fn begin_frame(&mut self, _frame: u64) {
        self.current = 0;
    }

    fn draw_batch(&mut self, kind: DrawKind, commands: &[DrawCommand]) {
        for cmd in commands {
            trace!(
                "draw {:?} '{}' at ({:.1}, {:.1}) scale={} src={:?}",
                kind, cmd.resource_name, cmd.position.x, cmd.position.y, cmd.scale, cmd.source
            );
        }
        self.current += commands.len();
    }

    fn end_frame(&mut self, frame: u64) {
        self.frames += 1;
        self.total_commands += self.current as u64;
        debug!("frame {} drew {} command(s)", frame, self.current);
    }
}
