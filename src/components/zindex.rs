//! Z-index component for render ordering.
//!
//! Sprites are queued in ascending [`ZIndex`]; within one draw kind the
//! backend paints in queue order, so higher values end up on top.

use bevy_ecs::prelude::Component;

/// Rendering order hint for 2D drawing. Entities without one count as `ZIndex(0)`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
