//! Frost Engine demo entry point.
//!
//! A headless 2D engine core written in Rust using:
//! - **bevy_ecs** for entity-component-system architecture
//! - a background thread plus **crossbeam-channel** for resource loading
//! - a pluggable render backend fed by a per-frame render queue
//!
//! # Main Loop
//!
//! 1. Load `config.ini`, start the resource loader, queue the preload manifest
//! 2. Spawn the demo scene
//! 3. Every frame:
//!    - advance the fixed-timestep clock
//!    - run the simulation schedule once per due tick
//!    - run the render schedule once, interpolating with the clock's alpha
//! 4. Stop the loader thread on exit
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --frames 300 --debug
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use bevy_ecs::prelude::*;
use clap::Parser;

use frostengine::game;
use frostengine::resources::camera2d::Camera2DRes;
use frostengine::resources::debugmode::DebugMode;
use frostengine::resources::eventbus::EventBus;
use frostengine::resources::gameconfig::GameConfig;
use frostengine::resources::renderbackend::{LogBackend, RenderBackendRes};
use frostengine::resources::renderqueue::RenderQueue;
use frostengine::resources::resourcecache::ResourceCache;
use frostengine::resources::worldtime::WorldTime;
use frostengine::systems::loader::{poll_resource_loads, shutdown_resource_loader};
use frostengine::systems::movement::movement;
use frostengine::systems::render::{debug_marker_system, flush_render_queue};
use frostengine::systems::sprite::{sprite_draw_system, sprite_update_system};
use frostengine::systems::time::update_world_time;

/// How long startup waits for the preload manifest.
const PRELOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Frost Engine 2D
#[derive(Parser)]
#[command(version, about = "Headless demo of the Frost Engine 2D core")]
struct Cli {
    /// Configuration file to read.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to run before exiting.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Queue debug markers for every positioned entity.
    #[arg(long)]
    debug: bool,

    /// Sleep between frames to hold the configured frame rate.
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("Hello, world! This is the Frost Engine!");

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    // --------------- Services ---------------
    let bus = EventBus::new();
    let mut cache = ResourceCache::with_root(bus.clone(), config.assets_root.clone());
    if let Some(manifest) = config.manifest_path() {
        match cache.load_manifest(&manifest) {
            Ok(_) => {
                let applied = cache.wait_for_loads(PRELOAD_TIMEOUT);
                log::info!(
                    "Preloaded {} resource(s), {} still pending",
                    applied,
                    cache.pending_count()
                );
            }
            Err(e) => log::error!("{}", e),
        }
    }

    let mut world = World::new();
    world.insert_resource(
        WorldTime::default()
            .with_tick_rate(config.tick_rate)
            .with_max_ticks_per_frame(config.max_ticks_per_frame),
    );
    world.insert_resource(bus);
    world.insert_resource(cache);
    world.insert_resource(RenderQueue::new());
    let (render_width, render_height) = config.render_size();
    world.insert_resource(Camera2DRes::centered(
        render_width,
        render_height,
        config.pixels_per_unit,
    ));
    world.insert_resource(RenderBackendRes::new(LogBackend::default()));
    if cli.debug || config.debug {
        world.insert_resource(DebugMode {});
    }
    let frame_delta = config.frame_delta();
    world.insert_resource(config);

    // --------------- Scene ---------------
    let mut startup = Schedule::default();
    startup.add_systems(game::setup);
    startup.run(&mut world);

    // --------------- Schedules ---------------
    let mut simulation = Schedule::default();
    simulation.add_systems((movement, sprite_update_system).chain());

    let mut render = Schedule::default();
    render.add_systems(
        (
            poll_resource_loads,
            sprite_draw_system,
            debug_marker_system,
            flush_render_queue, // Must stay last: empties the queue
        )
            .chain(),
    );

    // --------------- Main loop ---------------
    let mut last = Instant::now();
    for _ in 0..cli.frames {
        let dt = if cli.realtime {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            dt
        } else {
            frame_delta
        };

        let ticks = update_world_time(&mut world, dt);
        for _ in 0..ticks {
            simulation.run(&mut world);
        }
        render.run(&mut world);

        world.clear_trackers();

        if cli.realtime {
            let spent = last.elapsed().as_secs_f32();
            if spent < frame_delta {
                std::thread::sleep(Duration::from_secs_f32(frame_delta - spent));
            }
        }
    }

    let time = world.resource::<WorldTime>();
    log::info!(
        "Ran {} frame(s), {} tick(s), {:.2}s simulated",
        time.frame_count,
        time.tick_count,
        time.elapsed
    );
    shutdown_resource_loader(&mut world);
}
