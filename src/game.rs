//! Demo scene setup.
//!
//! Spawns a hero sprite drawn at double size and a handful of coins cut out of
//! a shared spritesheet. Every sprite names its image and where to load it
//! from; whatever the preload manifest did not cover is requested on the fly
//! and shows up once the loader thread has it.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::{SpriteParams, SpriteRenderer};
use crate::components::zindex::ZIndex;
use crate::math::Vector2;
use crate::resources::eventbus::EventBus;
use crate::resources::renderqueue::SourceRect;
use crate::resources::resourcecache::ResourceCache;

pub const HERO_IMAGE: &str = "hero";
pub const HERO_SOURCE: &str = "sprites/hero.png";
pub const COINS_IMAGE: &str = "coins";
pub const COINS_SOURCE: &str = "sprites/coins.png";

/// Size of one coin frame in the spritesheet, in pixels.
const COIN_FRAME: f32 = 16.0;
const COIN_FRAMES: u32 = 4;
const COIN_COUNT: usize = 6;

/// Spawn the demo entities.
pub fn setup(mut commands: Commands, mut cache: ResMut<ResourceCache>, bus: Res<EventBus>) {
    let hero = SpriteParams::new(HERO_IMAGE, HERO_SOURCE).with_scale(2.0);
    match SpriteRenderer::new(hero, &mut cache, &bus) {
        Ok(sprite) => {
            commands.spawn((
                MapPosition::new(0.0, 0.0),
                RigidBody::with_velocity(1.5, 0.0),
                sprite.placed_at(Vector2::ZERO),
                ZIndex(10),
            ));
        }
        Err(e) => error!("hero sprite rejected: {}", e),
    }

    let mut rng = fastrand::Rng::new();
    let mut spawned = 0;
    for i in 0..COIN_COUNT {
        let frame = i as u32 % COIN_FRAMES;
        let params = SpriteParams::new(COINS_IMAGE, COINS_SOURCE).with_source_rect(
            SourceRect::new(frame as f32 * COIN_FRAME, 0.0, COIN_FRAME, COIN_FRAME),
        );
        let sprite = match SpriteRenderer::new(params, &mut cache, &bus) {
            Ok(sprite) => sprite,
            Err(e) => {
                error!("coin sprite rejected: {}", e);
                continue;
            }
        };

        let position = MapPosition::new(rng.f32() * 16.0 - 8.0, rng.f32() * 8.0 - 4.0);
        let velocity = RigidBody::with_velocity(rng.f32() - 0.5, rng.f32() * 0.5);
        commands.spawn((position, velocity, sprite.placed_at(position.pos), ZIndex(0)));
        spawned += 1;
    }

    info!("Demo scene: hero + {} coin(s)", spawned);
}
