//! Shared 2D camera resource.
//!
//! [`Camera2DRes`] converts world units into screen pixels. Components do not
//! depend on the camera type itself, only on the [`ScreenProjection`]
//! capability, so they can be driven by a stub projection in tests.

use bevy_ecs::prelude::Resource;

use crate::math::Vector2;

/// World → screen conversion.
pub trait ScreenProjection {
    fn to_screen_space(&self, world_x: f32, world_y: f32) -> Vector2;
}

/// ECS resource that holds the active 2D camera parameters.
///
/// A world point equal to `target` lands on `offset` (usually the screen
/// center). One world unit spans `pixels_per_unit * zoom` pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Camera2DRes {
    /// World point the camera looks at.
    pub target: Vector2,
    /// Screen point, in pixels, where `target` is drawn.
    pub offset: Vector2,
    pub zoom: f32,
    pub pixels_per_unit: f32,
}

impl Default for Camera2DRes {
    fn default() -> Self {
        Self {
            target: Vector2::ZERO,
            offset: Vector2::ZERO,
            zoom: 1.0,
            pixels_per_unit: 1.0,
        }
    }
}

impl Camera2DRes {
    /// Camera centered on the world origin for a screen of `width` x `height` pixels.
    pub fn centered(width: u32, height: u32, pixels_per_unit: f32) -> Self {
        Self {
            offset: Vector2::new(width as f32 * 0.5, height as f32 * 0.5),
            pixels_per_unit,
            ..Self::default()
        }
    }

    pub fn look_at(&mut self, target: Vector2) {
        self.target = target;
    }
}

impl ScreenProjection for Camera2DRes {
    fn to_screen_space(&self, world_x: f32, world_y: f32) -> Vector2 {
        let scale = self.pixels_per_unit * self.zoom;
        (Vector2::new(world_x, world_y) - self.target) * scale + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_is_identity() {
        let cam = Camera2DRes::default();
        let p = cam.to_screen_space(12.5, -3.0);
        assert!(approx_eq(p.x, 12.5));
        assert!(approx_eq(p.y, -3.0));
    }

    #[test]
    fn test_centered_maps_origin_to_screen_center() {
        let cam = Camera2DRes::centered(640, 360, 16.0);
        let p = cam.to_screen_space(0.0, 0.0);
        assert!(approx_eq(p.x, 320.0));
        assert!(approx_eq(p.y, 180.0));

        let p = cam.to_screen_space(1.0, 2.0);
        assert!(approx_eq(p.x, 336.0));
        assert!(approx_eq(p.y, 212.0));
    }

    #[test]
    fn test_target_and_zoom() {
        let mut cam = Camera2DRes::centered(100, 100, 10.0);
        cam.zoom = 2.0;
        cam.look_at(Vector2::new(5.0, 5.0));
        let p = cam.to_screen_space(6.0, 5.0);
        assert!(approx_eq(p.x, 70.0));
        assert!(approx_eq(p.y, 50.0));
    }
}
