//! Host collaborator contracts.
//!
//! The simulation never touches a keyboard, speaker or canvas directly.
//! Hosts implement these traits and hand them to [`crate::game::game_loop::Game`].

use serde::{Deserialize, Serialize};

use crate::game::entity::{EntityId, EntityKind};
use crate::game::session::GamePhase;
use crate::util::vec2::Vec2;

/// Logical controls the player ship reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Left,
    Right,
    Space,
}

pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;

    /// Called once before every logic tick
    fn begin_tick(&mut self, _tick: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    StartUp,
    PhotonSmall,
    CollisionGeneral,
    CollisionQuad,
    SludgerMinePop,
    SludgerDeath,
    PlayerDeath,
}

#[derive(Debug, thiserror::Error)]
pub enum EffectsError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("sound {0:?} is not loaded")]
    NotLoaded(Sound),
}

/// Fire-and-forget sound cues. Failures never affect the simulation.
pub trait Effects {
    fn play(&mut self, sound: Sound) -> Result<(), EffectsError>;
}

pub trait Display {
    fn display_message(&mut self, text: &str, duration_ticks: u32);
    fn set_health(&mut self, health: i32);
}

/// Axis-aligned bounding box in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub angle: f32,
    pub bounds: Rect,
    /// Culling hint: false when the bounds miss the viewport entirely
    pub on_screen: bool,
}

/// Everything a renderer needs for one frame, in draw order
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: u64,
    pub width: f32,
    pub height: f32,
    pub score: u64,
    pub lives: u32,
    pub health: i32,
    pub phase: GamePhase,
    pub items: Vec<RenderItem>,
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

/// Notifications produced during a tick and delivered to collaborators after it
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(Sound),
    Message { text: String, duration_ticks: u32 },
    HealthChanged(i32),
}
