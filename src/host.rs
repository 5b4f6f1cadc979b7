//! Headless collaborators: a key-state table, a scripted pilot, and
//! tracing-backed effects, display and renderer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashSet;
use tracing::{debug, info, trace};

use crate::game::interfaces::{
    Display, Effects, EffectsError, Frame, InputSource, Key, Renderer, Sound,
};

/// Set of currently held keys
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Scripted input for unattended runs: keeps firing, sweeps the nose around
/// and takes short bursts of thrust
#[derive(Debug, Default)]
pub struct Autopilot {
    keys: KeyboardState,
}

impl Autopilot {
    /// Ticks per full script cycle
    const CYCLE: u64 = 240;
}

impl InputSource for Autopilot {
    fn is_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }

    fn begin_tick(&mut self, tick: u64) {
        let phase = tick % Self::CYCLE;
        self.keys.release_all();
        self.keys.press(Key::Space);
        if phase < 90 {
            self.keys.press(Key::Right);
        } else if phase < 120 {
            self.keys.press(Key::Up);
        } else if phase < 200 {
            self.keys.press(Key::Left);
        }
    }
}

/// Logs sound cues instead of playing them
#[derive(Debug, Default)]
pub struct TracingEffects;

impl Effects for TracingEffects {
    fn play(&mut self, sound: Sound) -> Result<(), EffectsError> {
        trace!(?sound, "Sound");
        Ok(())
    }
}

/// Logs on-screen messages and health changes
#[derive(Debug, Default)]
pub struct TracingDisplay {
    last_health: Option<i32>,
}

impl Display for TracingDisplay {
    fn display_message(&mut self, text: &str, duration_ticks: u32) {
        info!(duration_ticks, "{}", text);
    }

    fn set_health(&mut self, health: i32) {
        if self.last_health != Some(health) {
            debug!(health, "Health");
            self.last_health = Some(health);
        }
    }
}

/// Frame counters shared with whoever is reporting progress
#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: AtomicU64,
    pub items_drawn: AtomicU64,
}

/// Counts frames and visible items instead of drawing them
#[derive(Debug, Default)]
pub struct CountingRenderer {
    stats: Arc<RenderStats>,
}

impl CountingRenderer {
    pub fn new(stats: Arc<RenderStats>) -> Self {
        Self { stats }
    }
}

impl Renderer for CountingRenderer {
    fn render(&mut self, frame: &Frame) {
        let visible = frame.items.iter().filter(|item| item.on_screen).count() as u64;
        self.stats.frames.fetch_add(1, Ordering::Relaxed);
        self.stats.items_drawn.fetch_add(visible, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::GamePhase;

    #[test]
    fn test_keyboard_state() {
        let mut keys = KeyboardState::default();
        assert!(!keys.is_down(Key::Up));
        keys.press(Key::Up);
        keys.press(Key::Space);
        assert!(keys.is_down(Key::Up));
        keys.release(Key::Up);
        assert!(!keys.is_down(Key::Up));
        assert!(keys.is_down(Key::Space));
        keys.release_all();
        assert!(!keys.is_down(Key::Space));
    }

    #[test]
    fn test_autopilot_script() {
        let mut pilot = Autopilot::default();
        pilot.begin_tick(0);
        assert!(pilot.is_down(Key::Space));
        assert!(pilot.is_down(Key::Right));
        assert!(!pilot.is_down(Key::Up));

        pilot.begin_tick(100);
        assert!(pilot.is_down(Key::Up));
        assert!(!pilot.is_down(Key::Right));

        pilot.begin_tick(210);
        assert!(!pilot.is_down(Key::Left));
        assert!(!pilot.is_down(Key::Up));
    }

    #[test]
    fn test_counting_renderer() {
        let stats = Arc::new(RenderStats::default());
        let mut renderer = CountingRenderer::new(stats.clone());
        let frame = Frame {
            tick: 1,
            width: 10.0,
            height: 10.0,
            score: 0,
            lives: 3,
            health: 100,
            phase: GamePhase::Playing,
            items: Vec::new(),
        };
        renderer.render(&frame);
        renderer.render(&frame);
        assert_eq!(stats.frames.load(Ordering::Relaxed), 2);
        assert_eq!(stats.items_drawn.load(Ordering::Relaxed), 0);
    }
}
