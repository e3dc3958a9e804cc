//! Minimal 2D vector type and interpolation helpers.
//!
//! Positions are kept in world units by components and converted to screen
//! pixels through a [`ScreenProjection`](crate::resources::camera2d::ScreenProjection).

use std::ops::{Add, Mul, Sub};

/// 2D vector used for world and screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Multiply both components by `factor`.
    pub fn scale_by(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f32) -> Vector2 {
        self.scale_by(rhs)
    }
}

/// Linear interpolation `a + (b - a) * t`.
///
/// `t` is not clamped; callers keep it in `[0, 1]`. The endpoints are exact:
/// `t == 0` returns `a` and `t == 1` returns `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t == 1.0 {
        return b;
    }
    a + (b - a) * t
}

/// Component-wise [`lerp`] for vectors.
pub fn lerp_vec(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    Vector2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}
