//! Interpolated, load-gated sprite component.
//!
//! A [`SpriteRenderer`] draws one image resource at its entity's position.
//! It never owns the image: it keeps the resource name and asks the
//! [`ResourceCache`] for it. While the image is still loading the sprite is
//! present but invisible.
//!
//! Life cycle:
//! - on construction the sprite checks the cache. If the image is not ready
//!   it asks the cache to load it as an image and subscribes to the
//!   readiness topic the cache will publish (`resource-image-<name>`).
//! - when the readiness event fires the sprite becomes ready and cancels the
//!   very subscription it registered.
//! - [`SpriteRenderer::update`] runs every simulation tick and shifts the
//!   current position into the previous one, ready or not.
//! - [`SpriteRenderer::draw`] runs every render tick, interpolates between
//!   the two snapshots, projects the result to screen space, and queues one
//!   draw command if the image is ready.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::error::SpriteConfigError;
use crate::events::resource::{ResourceKind, resource_topic};
use crate::math::{Vector2, lerp_vec};
use crate::resources::camera2d::ScreenProjection;
use crate::resources::eventbus::{EventBus, Subscription};
use crate::resources::renderqueue::{DrawData, DrawKind, RenderQueue, SourceRect};
use crate::resources::resourcecache::ResourceCache;

/// Construction parameters for a [`SpriteRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteParams {
    /// Logical name the image is cached under.
    pub resource_name: String,
    /// Where to load the image from if nobody preloaded it.
    pub source: String,
    /// Part of the image to draw; `None` draws all of it.
    pub source_rect: Option<SourceRect>,
    /// Draw scale; `None` draws at native size.
    pub scale: Option<f32>,
}

impl SpriteParams {
    pub fn new(resource_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            source: source.into(),
            source_rect: None,
            scale: None,
        }
    }

    pub fn with_source_rect(mut self, rect: SourceRect) -> Self {
        self.source_rect = Some(rect);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Reject negative or non-finite rectangles and non-positive scales.
    pub fn validate(&self) -> Result<(), SpriteConfigError> {
        if self.resource_name.is_empty() {
            return Err(SpriteConfigError::EmptyResourceName);
        }
        if let Some(rect) = self.source_rect {
            let fields = [
                ("x", rect.x),
                ("y", rect.y),
                ("width", rect.width),
                ("height", rect.height),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(SpriteConfigError::NonFiniteSourceRect { field, value });
                }
                if value < 0.0 {
                    return Err(SpriteConfigError::NegativeSourceRect { field, value });
                }
            }
        }
        if let Some(scale) = self.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(SpriteConfigError::NonPositiveScale(scale));
            }
        }
        Ok(())
    }
}

/// Whether a sprite can draw yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteState {
    Loading,
    Ready,
}

type SubscriptionSlot = Arc<Mutex<Option<Subscription>>>;

fn lock_slot(slot: &Mutex<Option<Subscription>>) -> MutexGuard<'_, Option<Subscription>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Renderable component drawing one image resource.
#[derive(Component)]
pub struct SpriteRenderer {
    resource_name: String,
    source: String,
    source_rect: Option<SourceRect>,
    scale: f32,
    previous: Vector2,
    current: Vector2,
    screen: Vector2,
    ready: Arc<AtomicBool>,
    subscription: SubscriptionSlot,
    bus: EventBus,
}

impl SpriteRenderer {
    /// Validate `params` and hook the sprite up to the cache.
    ///
    /// If the image is not cached yet this subscribes to its readiness topic
    /// and starts the load.
    pub fn new(
        params: SpriteParams,
        cache: &mut ResourceCache,
        bus: &EventBus,
    ) -> Result<Self, SpriteConfigError> {
        params.validate()?;
        let mut sprite = Self {
            resource_name: params.resource_name,
            source: params.source,
            source_rect: params.source_rect,
            scale: params.scale.unwrap_or(1.0),
            previous: Vector2::ZERO,
            current: Vector2::ZERO,
            screen: Vector2::ZERO,
            ready: Arc::new(AtomicBool::new(false)),
            subscription: Arc::new(Mutex::new(None)),
            bus: bus.clone(),
        };
        sprite.check_asset_loaded(cache);
        Ok(sprite)
    }

    fn check_asset_loaded(&mut self, cache: &mut ResourceCache) {
        if cache.request(&self.resource_name).is_some() {
            self.ready.store(true, Ordering::Release);
            return;
        }

        debug!(
            "sprite '{}': resource not preloaded, loading it now",
            self.resource_name
        );
        cache.add_resource_as(
            self.resource_name.clone(),
            self.source.clone(),
            ResourceKind::Image,
        );
        // Someone else may have requested the name first under another kind;
        // the cache publishes on the kind it recorded.
        let kind = cache.kind(&self.resource_name).unwrap_or(ResourceKind::Image);

        let ready = Arc::clone(&self.ready);
        let slot = Arc::clone(&self.subscription);
        let name = self.resource_name.clone();
        let topic = resource_topic(kind, &self.resource_name);
        let subscription = self.bus.subscribe_fn(topic, move |bus, _event| {
            ready.store(true, Ordering::Release);
            let registered = lock_slot(&slot).take();
            if let Some(subscription) = registered {
                bus.cancel(&subscription);
            }
            debug!("sprite '{}': resource ready", name);
        });
        *lock_slot(&self.subscription) = Some(subscription);
    }

    /// Put the sprite at `pos` without interpolating from its old position.
    pub fn place(&mut self, pos: Vector2) {
        self.previous = pos;
        self.current = pos;
    }

    /// Builder-style [`place`](Self::place).
    pub fn placed_at(mut self, pos: Vector2) -> Self {
        self.place(pos);
        self
    }

    /// Snapshot the entity position. Call once per simulation tick.
    pub fn update(&mut self, source: &MapPosition) {
        self.previous = self.current;
        self.current = source.pos;
    }

    /// Project the interpolated position and queue a draw if ready.
    ///
    /// `alpha` is the position of this render tick between the previous
    /// (0) and current (1) simulation tick. It is not clamped. Returns
    /// whether a command was queued.
    pub fn draw(
        &mut self,
        alpha: f32,
        projection: &dyn ScreenProjection,
        queue: &mut RenderQueue,
    ) -> bool {
        let world = lerp_vec(self.previous, self.current, alpha);
        self.screen = projection.to_screen_space(world.x, world.y);

        if !self.is_ready() {
            return false;
        }
        let data = DrawData {
            source: self.source_rect,
            position: self.screen,
            scale: self.scale,
        };
        queue.add_to_queue(data, DrawKind::Image, self.resource_name.clone());
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SpriteState {
        if self.is_ready() {
            SpriteState::Ready
        } else {
            SpriteState::Loading
        }
    }

    /// Screen x computed by the last [`draw`](Self::draw).
    pub fn x(&self) -> f32 {
        self.screen.x
    }

    /// Screen y computed by the last [`draw`](Self::draw).
    pub fn y(&self) -> f32 {
        self.screen.y
    }

    pub fn screen_position(&self) -> Vector2 {
        self.screen
    }

    pub fn previous(&self) -> Vector2 {
        self.previous
    }

    pub fn current(&self) -> Vector2 {
        self.current
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn source_rect(&self) -> Option<SourceRect> {
        self.source_rect
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Drop for SpriteRenderer {
    fn drop(&mut self) {
        let registered = lock_slot(&self.subscription).take();
        if let Some(subscription) = registered {
            self.bus.cancel(&subscription);
        }
    }
}
