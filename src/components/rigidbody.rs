//! Kinematic body component.
//!
//! The [`RigidBody`] stores a velocity that the
//! [`movement`](crate::systems::movement::movement) system integrates into
//! [`MapPosition`](super::mapposition::MapPosition) every simulation tick.

use bevy_ecs::prelude::Component;

use crate::math::Vector2;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RigidBody {
    /// Velocity in world units per second.
    pub velocity: Vector2,
}

impl RigidBody {
    pub fn with_velocity(x: f32, y: f32) -> Self {
        Self {
            velocity: Vector2::new(x, y),
        }
    }
}
