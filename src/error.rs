//! Error types surfaced by the engine core.
//!
//! - [`SpriteConfigError`] – invalid construction parameters, fatal at build time
//! - [`LoadError`] – asynchronous fetch/decode failure, kept local to the cache

use thiserror::Error;

/// Invalid parameters passed when building a sprite.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpriteConfigError {
    #[error("source rectangle field `{field}` must be non-negative, got {value}")]
    NegativeSourceRect { field: &'static str, value: f32 },
    #[error("source rectangle field `{field}` must be finite, got {value}")]
    NonFiniteSourceRect { field: &'static str, value: f32 },
    #[error("scale must be positive and finite, got {0}")]
    NonPositiveScale(f32),
    #[error("resource name must not be empty")]
    EmptyResourceName,
}

/// Failure while fetching or decoding a resource on the loader thread.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image `{path}`: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse json `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{path}` is not valid UTF-8")]
    Utf8 { path: String },
    #[error("loader thread is not running")]
    LoaderGone,
}
