//! Sprite snapshot and draw systems.
//!
//! [`sprite_update_system`] belongs to the simulation schedule and runs once
//! per fixed tick. [`sprite_draw_system`] belongs to the render schedule and
//! runs once per frame, after every tick of that frame, using
//! `WorldTime::alpha` to interpolate.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::sprite::SpriteRenderer;
use crate::components::zindex::ZIndex;
use crate::resources::camera2d::Camera2DRes;
use crate::resources::renderqueue::RenderQueue;
use crate::resources::worldtime::WorldTime;

/// Copy each entity's [`MapPosition`] into its sprite's transform snapshot.
pub fn sprite_update_system(mut query: Query<(&MapPosition, &mut SpriteRenderer)>) {
    for (position, mut sprite) in query.iter_mut() {
        sprite.update(position);
    }
}

/// Interpolate, project and queue every sprite.
///
/// Sprites are queued in ascending [`ZIndex`] so later ones paint on top;
/// equal z values keep a stable order by entity.
pub fn sprite_draw_system(
    time: Res<WorldTime>,
    camera: Res<Camera2DRes>,
    mut queue: ResMut<RenderQueue>,
    mut query: Query<(Entity, &mut SpriteRenderer, Option<&ZIndex>)>,
) {
    let mut sprites: Vec<_> = query.iter_mut().collect();
    sprites.sort_by_key(|(entity, _, z)| (z.copied().unwrap_or_default(), *entity));

    for (_, mut sprite, _) in sprites {
        sprite.draw(time.alpha, &*camera, &mut queue);
    }
}
