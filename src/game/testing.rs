//! Recording collaborators for tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::game::game_loop::Host;
use crate::game::interfaces::{Display, Effects, EffectsError, Frame, Renderer, Sound};
use crate::host::KeyboardState;

#[derive(Debug, Default)]
struct Log {
    sounds: Vec<Sound>,
    messages: Vec<String>,
    health: Vec<i32>,
    frames: usize,
}

/// Shared view of everything the recording host received
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().messages.clone()
    }

    pub fn sounds_of(&self, sound: Sound) -> usize {
        self.log.borrow().sounds.iter().filter(|&&s| s == sound).count()
    }

    pub fn health_updates(&self) -> Vec<i32> {
        self.log.borrow().health.clone()
    }

    pub fn frames(&self) -> usize {
        self.log.borrow().frames
    }
}

struct RecordingEffects(Recorder);

impl Effects for RecordingEffects {
    fn play(&mut self, sound: Sound) -> Result<(), EffectsError> {
        self.0.log.borrow_mut().sounds.push(sound);
        Ok(())
    }
}

/// Records the cue, then fails: first with a missing asset, later with no
/// output device at all
struct FailingEffects(Recorder);

impl Effects for FailingEffects {
    fn play(&mut self, sound: Sound) -> Result<(), EffectsError> {
        let mut log = self.0.log.borrow_mut();
        log.sounds.push(sound);
        if log.sounds.len() == 1 {
            Err(EffectsError::NotLoaded(sound))
        } else {
            Err(EffectsError::Unavailable)
        }
    }
}

struct RecordingDisplay(Recorder);

impl Display for RecordingDisplay {
    fn display_message(&mut self, text: &str, _duration_ticks: u32) {
        self.0.log.borrow_mut().messages.push(text.to_string());
    }

    fn set_health(&mut self, health: i32) {
        self.0.log.borrow_mut().health.push(health);
    }
}

struct RecordingRenderer(Recorder);

impl Renderer for RecordingRenderer {
    fn render(&mut self, _frame: &Frame) {
        self.0.log.borrow_mut().frames += 1;
    }
}

pub struct RecordingHost;

impl RecordingHost {
    /// A host with no keys held that records every notification
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Recorder, Host) {
        let recorder = Recorder::default();
        let host = Host::new(
            KeyboardState::default(),
            RecordingEffects(recorder.clone()),
            RecordingDisplay(recorder.clone()),
            RecordingRenderer(recorder.clone()),
        );
        (recorder, host)
    }

    /// Like [`RecordingHost::new`], but every sound fails to play
    pub fn with_failing_effects() -> (Recorder, Host) {
        let recorder = Recorder::default();
        let host = Host::new(
            KeyboardState::default(),
            FailingEffects(recorder.clone()),
            RecordingDisplay(recorder.clone()),
            RecordingRenderer(recorder.clone()),
        );
        (recorder, host)
    }
}
