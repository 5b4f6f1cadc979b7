//! Fixed-rate tick scheduler with bounded catch-up.
//!
//! Logic advances in fixed steps of `1 / tick_rate` seconds regardless of how
//! often the host calls in. After a stall, at most `max_frame_skip` steps run
//! per call, so a long pause degrades to slow motion instead of a freeze.

use std::time::{Duration, Instant};

use crate::game::constants::timing;

/// Something the scheduler can advance and draw
pub trait Simulation {
    /// Advance the world by one fixed tick
    fn step(&mut self);
    /// Present the current world
    fn render(&mut self);
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    skip: Duration,
    max_frame_skip: u32,
    next_tick: Instant,
}

impl TickScheduler {
    pub fn new(tick_rate: u32, max_frame_skip: u32, now: Instant) -> Self {
        debug_assert!(tick_rate > 0, "tick rate must be positive");
        Self {
            skip: Duration::from_secs_f64(1.0 / f64::from(tick_rate.max(1))),
            max_frame_skip,
            next_tick: now,
        }
    }

    pub fn with_defaults(now: Instant) -> Self {
        Self::new(timing::TICK_RATE, timing::MAX_FRAME_SKIP, now)
    }

    pub fn tick_duration(&self) -> Duration {
        self.skip
    }

    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Run every step that is due at `now`, up to the frame-skip cap, then
    /// render once if anything ran. Returns the number of steps taken.
    pub fn run<S: Simulation + ?Sized>(&mut self, now: Instant, sim: &mut S) -> u32 {
        let mut loops = 0;
        while now > self.next_tick && loops < self.max_frame_skip {
            sim.step();
            self.next_tick += self.skip;
            loops += 1;
        }

        if loops > 0 {
            sim.render();
        }
        loops
    }

    /// Forget owed time, e.g. when resuming from a pause
    pub fn reset(&mut self, now: Instant) {
        self.next_tick = now;
    }
}
