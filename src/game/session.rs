//! Per-game scoring and player vitals.

use serde::{Deserialize, Serialize};

use crate::game::constants::player;

/// How a game is currently progressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Victory,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    score: u64,
    kills: u32,
    lives: u32,
    health: i32,
    max_health: i32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(player::LIVES, player::MAX_HEALTH)
    }
}

impl SessionState {
    pub fn new(lives: u32, max_health: i32) -> Self {
        Self {
            score: 0,
            kills: 0,
            lives,
            health: max_health,
            max_health,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Credit a kill worth `points`
    pub fn award_kill(&mut self, points: u64) {
        self.kills += 1;
        self.score += points;
    }

    /// Apply damage, clamped at zero. Returns true when health is exhausted.
    pub fn damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).clamp(0, self.max_health);
        self.health == 0
    }

    pub fn restore_health(&mut self) {
        self.health = self.max_health;
    }

    /// Remove one life and return how many remain
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }
}

/// Final result reported by the host when a game ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub phase: GamePhase,
    pub score: u64,
    pub kills: u32,
    pub lives: u32,
    pub ticks: u64,
}
