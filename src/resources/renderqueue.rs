//! Per-frame render queue.
//!
//! Components append [`DrawCommand`]s during the render phase through
//! [`RenderQueue::add_to_queue`]. Commands are grouped by [`DrawKind`]; inside
//! a group insertion order is kept so the backend can paint back to front.
//! Groups are handed over in the order their kind first appeared in the frame.
//!
//! [`RenderQueue::flush`] drains everything into a
//! [`RenderBackend`] exactly once per frame and leaves the queue empty, so a
//! command never survives into the next frame.

use bevy_ecs::prelude::Resource;
use log::trace;

use crate::math::Vector2;
use crate::resources::renderbackend::RenderBackend;

/// Category of a draw command; the backend batches by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// Blit (part of) an image resource.
    Image,
    /// Small cross marking an entity pivot, queued in debug mode.
    DebugMarker,
}

/// Sub-rectangle of a source image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SourceRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Geometry of one draw, as produced by a component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawData {
    /// Part of the image to draw; `None` draws the whole image.
    pub source: Option<SourceRect>,
    /// Destination in screen pixels.
    pub position: Vector2,
    pub scale: f32,
}

/// One frame-scoped draw instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub kind: DrawKind,
    pub resource_name: String,
    pub source: Option<SourceRect>,
    pub position: Vector2,
    pub scale: f32,
}

/// Draw commands collected for the current frame.
#[derive(Resource, Debug, Default)]
pub struct RenderQueue {
    groups: Vec<(DrawKind, Vec<DrawCommand>)>,
    frame: u64,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command to the current frame.
    pub fn add_to_queue(&mut self, data: DrawData, kind: DrawKind, resource_name: impl Into<String>) {
        let command = DrawCommand {
            kind,
            resource_name: resource_name.into(),
            source: data.source,
            position: data.position,
            scale: data.scale,
        };
        match self.groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, commands)) => commands.push(command),
            None => self.groups.push((kind, vec![command])),
        }
    }

    /// Total number of queued commands.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, c)| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queued commands of one kind, in insertion order.
    pub fn commands(&self, kind: DrawKind) -> &[DrawCommand] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, c)| c.as_slice())
            .unwrap_or(&[])
    }

    /// Kinds present this frame, in first-seen order.
    pub fn kinds(&self) -> impl Iterator<Item = DrawKind> + '_ {
        self.groups.iter().map(|(k, _)| *k)
    }

    /// Number of frames flushed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Hand every group to `backend` and empty the queue.
    ///
    /// Returns the number of commands drawn.
    pub fn flush(&mut self, backend: &mut dyn RenderBackend) -> usize {
        backend.begin_frame(self.frame);
        let mut drawn = 0;
        for (kind, commands) in self.groups.drain(..) {
            drawn += commands.len();
            backend.draw_batch(kind, &commands);
        }
        backend.end_frame(self.frame);
        trace!("frame {}: flushed {} draw command(s)", self.frame, drawn);
        self.frame += 1;
        drawn
    }

    /// Drop queued commands without drawing them.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
