//! Frame and simulation time.
//!
//! The simulation advances in fixed steps of `fixed_delta` seconds while
//! frames arrive at whatever rate the display allows. [`WorldTime::advance`]
//! accumulates frame time, reports how many simulation ticks to run, and
//! leaves the interpolation factor `alpha` for the render pass.

use bevy_ecs::prelude::Resource;
use log::warn;

const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds since start.
    pub elapsed: f32,
    /// Scaled duration of the last frame.
    pub delta: f32,
    pub time_scale: f32,
    /// Length of one simulation tick in seconds.
    pub fixed_delta: f32,
    /// Time not yet consumed by simulation ticks.
    pub accumulator: f32,
    /// Position of the render tick between the last two simulation ticks, in `[0, 1)`.
    pub alpha: f32,
    /// Upper bound of simulation ticks run for a single frame.
    pub max_ticks_per_frame: u32,
    pub tick_count: u64,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            fixed_delta: 1.0 / DEFAULT_TICK_RATE as f32,
            accumulator: 0.0,
            alpha: 0.0,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            tick_count: 0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Simulation running at `hz` ticks per second. Zero falls back to the default rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        let hz = if hz == 0 { DEFAULT_TICK_RATE } else { hz };
        self.fixed_delta = 1.0 / hz as f32;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    /// Account for a frame of `dt` unscaled seconds.
    ///
    /// Returns the number of simulation ticks to run before rendering. When a
    /// frame would need more than `max_ticks_per_frame` ticks the backlog is
    /// dropped so the simulation cannot fall further and further behind.
    /// A negative or non-finite `dt` counts as an empty frame.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let scaled = dt * self.time_scale;
        self.elapsed += scaled;
        self.delta = scaled;
        self.frame_count += 1;
        self.accumulator += scaled;

        let mut ticks = (self.accumulator / self.fixed_delta).floor() as u32;
        if ticks > self.max_ticks_per_frame {
            warn!(
                "simulation behind by {} tick(s), dropping backlog",
                ticks - self.max_ticks_per_frame
            );
            ticks = self.max_ticks_per_frame;
            self.accumulator %= self.fixed_delta;
        } else {
            self.accumulator -= ticks as f32 * self.fixed_delta;
        }
        // Float drift can leave the remainder a hair outside [0, fixed_delta).
        self.accumulator = self.accumulator.clamp(0.0, self.fixed_delta);
        if self.accumulator >= self.fixed_delta {
            self.accumulator = 0.0;
        }

        self.tick_count += ticks as u64;
        self.alpha = self.accumulator / self.fixed_delta;
        ticks
    }
}
