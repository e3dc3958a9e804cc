//! World-space position component.
//!
//! [`MapPosition`] is the authoritative position of an entity in world units.
//! The simulation writes it; sprites snapshot it once per tick.

use bevy_ecs::prelude::Component;

use crate::math::Vector2;

/// World-space position (pivot) for an entity.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    /// Move by a delta in world units.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_getters() {
        let pos = MapPosition::new(3.0, -4.0);
        assert_eq!(pos.x(), 3.0);
        assert_eq!(pos.y(), -4.0);
        assert_eq!(MapPosition::default().pos, Vector2::ZERO);
    }

    #[test]
    fn test_translate() {
        let mut pos = MapPosition::new(10.0, 20.0);
        pos.translate(5.0, -3.0);
        assert_eq!(pos.pos, Vector2::new(15.0, 17.0));
    }
}
