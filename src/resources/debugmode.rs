//! Debug toggle resource.
//!
//! The mere presence of this resource indicates that debug overlays should be
//! queued. Remove it to disable them.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, systems may queue overlays or log extra detail.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode {}
