//! Event and message types used by the engine.
//!
//! Submodules:
//! - [`loader`] – commands and messages for the background loader thread
//! - [`resource`] – resource kinds and the readiness topics published on the event bus
pub mod loader;
pub mod resource;
