//! Resource readiness topics.
//!
//! When the [`ResourceCache`](crate::resources::resourcecache::ResourceCache)
//! finishes loading a resource it publishes `resource-<kind>-<name>` on the
//! [`EventBus`](crate::resources::eventbus::EventBus) without payload.
//! Anything waiting for a named asset subscribes to exactly this string and
//! calls `request` again once notified.

use std::fmt;
use std::path::Path;

/// Asset category, derived from the source file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Json,
    Text,
    Audio,
    Binary,
}

impl ResourceKind {
    /// Guess the kind of a source location from its extension.
    ///
    /// A `?query` or `#fragment` suffix is ignored. Unknown or missing
    /// extensions map to [`ResourceKind::Binary`].
    pub fn from_source(source: &str) -> Self {
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png" | "jpg" | "jpeg" | "bmp") => ResourceKind::Image,
            Some("json") => ResourceKind::Json,
            Some("txt" | "ini" | "csv" | "glsl" | "fs" | "vs") => ResourceKind::Text,
            Some("wav" | "ogg" | "mp3" | "flac") => ResourceKind::Audio,
            _ => ResourceKind::Binary,
        }
    }

    /// Lowercase name used inside readiness topics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Json => "json",
            ResourceKind::Text => "text",
            ResourceKind::Audio => "audio",
            ResourceKind::Binary => "binary",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness topic for a named resource: `resource-<kind>-<name>`.
pub fn resource_topic(kind: ResourceKind, name: &str) -> String {
    format!("resource-{}-{}", kind.as_str(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ResourceKind::from_source("hero.png"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_source("tiles/Ground.JPG"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_source("levels/1.json"), ResourceKind::Json);
        assert_eq!(ResourceKind::from_source("intro.txt"), ResourceKind::Text);
        assert_eq!(ResourceKind::from_source("jump.ogg"), ResourceKind::Audio);
        assert_eq!(ResourceKind::from_source("blob"), ResourceKind::Binary);
        assert_eq!(ResourceKind::from_source("data.bin"), ResourceKind::Binary);
        assert_eq!(
            ResourceKind::from_source("https://cdn.example/hero.png?v=2"),
            ResourceKind::Image
        );
        assert_eq!(ResourceKind::from_source("levels/1.json#intro"), ResourceKind::Json);
        assert_eq!(ResourceKind::from_source("hero.webp"), ResourceKind::Binary);
    }

    #[test]
    fn test_topic_format() {
        assert_eq!(resource_topic(ResourceKind::Image, "hero"), "resource-image-hero");
        assert_eq!(resource_topic(ResourceKind::Json, "level1"), "resource-json-level1");
    }
}
