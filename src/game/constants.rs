//! Tuning constants, grouped per concern.
//!
//! Distances are in world units, speeds in units per tick, times in ticks
//! unless the name says otherwise.

use std::f32::consts::PI;

/// Scheduler defaults
pub mod timing {
    /// Logic ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Upper bound on catch-up steps per scheduler invocation
    pub const MAX_FRAME_SKIP: u32 = 10;
}

/// Toroidal world extents and default viewport
pub mod world {
    pub const LEFT: f32 = -2000.0;
    pub const TOP: f32 = -2000.0;
    pub const RIGHT: f32 = 2000.0;
    pub const BOTTOM: f32 = 2000.0;
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Motion model
pub mod motion {
    /// Floor for the damping radicand once an entity is at or past its cap
    pub const MIN_DAMPING_RADICAND: f32 = 1e-10;
    /// Separations below this (squared) have no meaningful bearing
    pub const MIN_BEARING_DISTANCE_SQ: f32 = 1e-6;
    /// Lightest movable body. Anything this light barely moves what it hits.
    pub const MIN_MASS: f32 = 1e-6;
}

/// Player ship
pub mod player {
    use super::PI;

    pub const MASS: f32 = 10.0;
    pub const RADIUS: f32 = 12.0;
    pub const ACCELERATION: f32 = 0.1;
    pub const MAX_SPEED: f32 = 12.0;
    /// Initial and post-death heading (nose up)
    pub const START_ANGLE: f32 = PI / 2.0;
    pub const ROTATION_STEP: f32 = 2.0 * PI / 32.0;
    /// Minimum ticks between rotation steps in one direction
    pub const TICKS_PER_ROTATION: u32 = 3;
    /// Minimum ticks between photon shots
    pub const TICKS_PER_SHOT: u32 = 13;
    pub const LIVES: u32 = 3;
    pub const MAX_HEALTH: i32 = 100;
    /// How long "N lives left" stays on screen
    pub const RESPAWN_MESSAGE_TICKS: u32 = 300;
    pub const WIDTH: f32 = 42.0;
    pub const HEIGHT: f32 = 37.0;
}

/// Health lost by the player per contact
pub mod damage {
    pub const ASTEROID: i32 = 30;
    pub const SLUDGER_MINE: i32 = 5;
    pub const QUAD_BLASTER_SHOT: i32 = 5;
    pub const PUFFER_SHOT: i32 = 20;
}

/// Points awarded for projectile kills
pub mod score {
    pub const SLUDGER: u64 = 50;
    pub const SLUDGER_MINE: u64 = 2;
    pub const QUAD_BLASTER: u64 = 50;
}

pub mod projectile {
    /// Ticks before a shot expires
    pub const LIFETIME: u32 = 50;
    /// Muzzle speed added to the shooter's velocity
    pub const SPEED: f32 = 10.0;
    /// Shots bounce off what they hit without shoving it
    pub const MASS: f32 = super::motion::MIN_MASS;
    pub const PHOTON_RADIUS: f32 = 4.0;
    pub const PUFFER_SHOT_RADIUS: f32 = 10.0;
    pub const QUAD_SHOT_RADIUS: f32 = 4.0;
}

pub mod asteroid {
    pub const PEBBLES_MASS: f32 = 100.0;
    pub const PEBBLES_RADIUS: f32 = 13.0;
    /// Initial velocity components are drawn from (-1, 1) times this
    pub const PEBBLES_DRIFT: f32 = 6.0;
    pub const ROCKO_MASS: f32 = 500.0;
    pub const ROCKO_RADIUS: f32 = 18.0;
    pub const ROCKO_DRIFT: f32 = 2.0;
}

pub mod sludger {
    pub const MASS: f32 = 8.0;
    pub const RADIUS: f32 = 16.0;
    pub const DRIFT: f32 = 3.0;
    /// Sludgers never accelerate; heading tracks the player only
    pub const ACCELERATION: f32 = 0.0;
    pub const MAX_SPEED: f32 = 3.0;
    pub const TICKS_PER_MINE: u32 = 300;
}

pub mod sludger_mine {
    pub const MASS: f32 = 4.0;
    pub const RADIUS: f32 = 11.0;
    pub const ACCELERATION: f32 = 0.1;
    pub const MAX_SPEED: f32 = 4.0;
}

pub mod puffer {
    pub const MASS: f32 = 10.0;
    pub const RADIUS: f32 = 14.0;
    pub const DRIFT: f32 = 1.0;
    pub const ACCELERATION: f32 = 0.1;
    pub const MAX_SPEED: f32 = 1.0;
    /// Radians turned per tick toward the player
    pub const TURN_RATE: f32 = 0.015;
    /// Fire only when the heading error is inside this cone
    pub const FIRE_CONE: f32 = 0.85;
    pub const MIN_RELOAD_TICKS: f32 = 18.0;
    /// Width of the random reload window above the minimum
    pub const RELOAD_SPREAD_TICKS: f32 = 180.0;
}

pub mod quad_blaster {
    use super::PI;

    pub const MASS: f32 = 8.0;
    pub const RADIUS: f32 = 16.0;
    pub const DRIFT: f32 = 1.0;
    /// Barrel directions relative to the body angle
    pub const BARREL_OFFSETS: [f32; 4] = [0.0, 1.55, -1.55, 3.15];
    pub const ROTATION_STEP: f32 = 2.0 * PI / 32.0;
    pub const TICKS_PER_ROTATION: u32 = 10;
    /// Accepted band for bearing / barrel angle
    pub const AIM_RATIO_MIN: f32 = 0.85;
    pub const AIM_RATIO_MAX: f32 = 1.15;
    pub const MIN_RELOAD_TICKS: f32 = 18.0;
    pub const RELOAD_SPREAD_TICKS: f32 = 180.0;
}

pub mod enemy_base {
    pub const RADIUS: f32 = 28.0;
    pub const X: f32 = -1000.0;
    pub const Y: f32 = -1000.0;
    pub const SPAWN_CYCLE_TICKS: u32 = 600;
}

pub mod home_base {
    pub const RADIUS: f32 = 30.0;
}

/// Default population of a new game
pub mod population {
    pub const STARS: usize = 600;
    pub const PEBBLES: usize = 6;
    pub const ROCKOS: usize = 3;
    pub const SLUDGERS: usize = 4;
    pub const QUAD_BLASTERS: usize = 5;
    pub const PUFFERS: usize = 4;
}

/// Fixed on-screen message durations
pub mod messages {
    /// Effectively permanent
    pub const END_OF_GAME_TICKS: u32 = 99_999_999;
}
