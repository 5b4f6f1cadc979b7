use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::bounds::{Viewport, WorldBounds};
use crate::game::constants::{player, population, timing};

/// How many of each archetype a new game starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub stars: usize,
    pub pebbles: usize,
    pub rockos: usize,
    pub sludgers: usize,
    pub quad_blasters: usize,
    pub puffers: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            stars: population::STARS,
            pebbles: population::PEBBLES,
            rockos: population::ROCKOS,
            sludgers: population::SLUDGERS,
            quad_blasters: population::QUAD_BLASTERS,
            puffers: population::PUFFERS,
        }
    }
}

impl PopulationConfig {
    /// A world with nothing in it but the player
    pub fn empty() -> Self {
        Self {
            stars: 0,
            pebbles: 0,
            rockos: 0,
            sludgers: 0,
            quad_blasters: 0,
            puffers: 0,
        }
    }

    pub fn enemies(&self) -> usize {
        self.sludgers + self.quad_blasters + self.puffers
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Logic ticks per second
    pub tick_rate: u32,
    /// Maximum catch-up ticks per scheduler call
    pub max_frame_skip: u32,
    /// Seed for all simulation randomness
    pub seed: u64,
    pub lives: u32,
    pub bounds: WorldBounds,
    pub viewport: Viewport,
    pub population: PopulationConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: timing::TICK_RATE,
            max_frame_skip: timing::MAX_FRAME_SKIP,
            seed: 0x5EED_F00D,
            lives: player::LIVES,
            bounds: WorldBounds::default(),
            viewport: Viewport::default(),
            population: PopulationConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("tick rate must be between 1 and 1000, got {0}")]
    TickRate(u32),
    #[error("max frame skip must be at least 1")]
    FrameSkip,
    #[error("viewport must have a positive size, got {0}x{1}")]
    Viewport(f32, f32),
    #[error("world bounds are empty or inverted")]
    Bounds,
    #[error("player needs at least one life")]
    Lives,
}

/// Read `key` from the environment and parse it, keeping `current` when the
/// variable is missing, unparsable or rejected by `accept`
fn env_override<T>(key: &str, current: T, accept: impl Fn(&T) -> bool) -> T
where
    T: FromStr,
{
    let Ok(raw) = std::env::var(key) else {
        return current;
    };
    match raw.parse::<T>() {
        Ok(parsed) if accept(&parsed) => parsed,
        Ok(_) => {
            tracing::warn!("{} '{}' out of range, using default", key, raw);
            current
        }
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            current
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        config.tick_rate = env_override("FRINGE_TICK_RATE", config.tick_rate, |v| {
            (1..=1000).contains(v)
        });
        config.max_frame_skip =
            env_override("FRINGE_MAX_FRAME_SKIP", config.max_frame_skip, |v| *v > 0);
        config.seed = env_override("FRINGE_SEED", config.seed, |_| true);
        config.lives = env_override("FRINGE_LIVES", config.lives, |v| *v > 0);
        config.viewport.width =
            env_override("FRINGE_VIEWPORT_WIDTH", config.viewport.width, |v| *v > 0.0);
        config.viewport.height =
            env_override("FRINGE_VIEWPORT_HEIGHT", config.viewport.height, |v| *v > 0.0);

        let pop = &mut config.population;
        pop.stars = env_override("FRINGE_STARS", pop.stars, |_| true);
        pop.pebbles = env_override("FRINGE_PEBBLES", pop.pebbles, |_| true);
        pop.rockos = env_override("FRINGE_ROCKOS", pop.rockos, |_| true);
        pop.sludgers = env_override("FRINGE_SLUDGERS", pop.sludgers, |_| true);
        pop.quad_blasters = env_override("FRINGE_QUAD_BLASTERS", pop.quad_blasters, |_| true);
        pop.puffers = env_override("FRINGE_PUFFERS", pop.puffers, |_| true);

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 || self.tick_rate > 1000 {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        if self.max_frame_skip == 0 {
            return Err(ConfigError::FrameSkip);
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Viewport(self.viewport.width, self.viewport.height));
        }
        if !(self.bounds.width() > 0.0 && self.bounds.height() > 0.0) {
            return Err(ConfigError::Bounds);
        }
        if self.lives == 0 {
            return Err(ConfigError::Lives);
        }
        Ok(())
    }
}
