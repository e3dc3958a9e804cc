//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world.
//!
//! Submodules overview:
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`sprite`] – interpolated sprite drawing one cached image
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod mapposition;
pub mod rigidbody;
pub mod sprite;
pub mod zindex;
