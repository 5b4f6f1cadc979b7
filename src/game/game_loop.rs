//! Per-tick control flow and the host-facing game handle.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::bounds::Viewport;
use crate::game::entity::EntityKind;
use crate::game::interfaces::{
    Display, Effects, Frame, GameEvent, InputSource, RenderItem, Renderer, Sound,
};
use crate::game::scheduler::{Simulation, TickScheduler};
use crate::game::session::{GamePhase, SessionSummary};
use crate::game::setup;
use crate::game::state::GameState;
use crate::game::systems::{ai, collision, motion, player, projectile};

/// Counters from one logic tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub updated: usize,
    pub contacts: usize,
}

/// Advance the world by one tick.
///
/// Entities are visited in insertion order: the player handles input,
/// everything else is shifted for the camera, then runs its behaviour and
/// integrates. The collision pass follows, then queued changes are applied.
pub fn tick(state: &mut GameState, input: &dyn InputSource) -> TickReport {
    let mut report = TickReport::default();
    if !state.is_playing() {
        return report;
    }

    let player_index = state.player_id().and_then(|id| state.index_of(id));
    let bounds = state.bounds;
    let viewport = state.viewport;

    for i in 0..state.entities.len() {
        if !state.entities[i].alive {
            continue;
        }
        report.updated += 1;

        if Some(i) == player_index {
            let pilot = player::process_input(
                &mut state.entities[i],
                input,
                &mut state.pending_spawns,
            );
            if pilot.fired {
                state.play(Sound::PhotonSmall);
            }
            if state.enemies_remaining() == 0 {
                state.declare_victory();
            }
            continue;
        }

        let shift = state.camera_shift();
        let target = state.player().filter(|p| p.alive).map(|p| p.position);

        let entity = &mut state.entities[i];
        entity.position = bounds.wrap(entity.position - shift);

        match entity.kind {
            EntityKind::Projectile(_) => {
                projectile::age(entity);
            }
            kind if kind.is_ai_controlled() => {
                let mut ctx = ai::AiContext {
                    target,
                    viewport,
                    rng: &mut state.rng,
                    spawns: &mut state.pending_spawns,
                };
                ai::update(entity, &mut ctx);
            }
            _ => {}
        }

        if entity.kind.is_mobile() {
            motion::integrate(entity);
            entity.position = bounds.wrap(entity.position);
        }
    }

    report.contacts = collision::run(state).len();
    state.settle();
    state.sanitize();
    state.advance_tick();
    report
}

impl GameState {
    /// Snapshot for the renderer, in draw order
    pub fn frame(&self) -> Frame {
        let viewport = self.viewport;
        let items = self
            .entities()
            .map(|e| RenderItem {
                id: e.id(),
                kind: e.kind,
                position: e.position,
                angle: e.angle,
                bounds: Viewport::bounds_of(e.position, e.size),
                on_screen: viewport.is_visible(e.position, e.size),
            })
            .collect();

        Frame {
            tick: self.tick_count(),
            width: viewport.width,
            height: viewport.height,
            score: self.session().score(),
            lives: self.session().lives(),
            health: self.session().health(),
            phase: self.phase(),
            items,
        }
    }
}

/// Collaborators supplied by the embedding host
pub struct Host {
    pub input: Box<dyn InputSource>,
    pub effects: Box<dyn Effects>,
    pub display: Box<dyn Display>,
    pub renderer: Box<dyn Renderer>,
}

impl Host {
    pub fn new(
        input: impl InputSource + 'static,
        effects: impl Effects + 'static,
        display: impl Display + 'static,
        renderer: impl Renderer + 'static,
    ) -> Self {
        Self {
            input: Box::new(input),
            effects: Box::new(effects),
            display: Box::new(display),
            renderer: Box::new(renderer),
        }
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Sound(sound) => {
                    if let Err(e) = self.effects.play(sound) {
                        debug!(?sound, error = %e, "Sound effect failed");
                    }
                }
                GameEvent::Message {
                    text,
                    duration_ticks,
                } => self.display.display_message(&text, duration_ticks),
                GameEvent::HealthChanged(health) => self.display.set_health(health),
            }
        }
    }
}

/// Borrowed pairing of world and host for one scheduler call
struct Driver<'a> {
    state: &'a mut GameState,
    host: &'a mut Host,
}

impl Simulation for Driver<'_> {
    fn step(&mut self) {
        step_with(self.state, self.host);
    }

    fn render(&mut self) {
        let frame = self.state.frame();
        self.host.renderer.render(&frame);
    }
}

fn step_with(state: &mut GameState, host: &mut Host) -> TickReport {
    host.input.begin_tick(state.tick_count());
    let report = tick(state, host.input.as_ref());
    host.dispatch(state.drain_events());
    report
}

/// A running game: world, scheduler and host collaborators
pub struct Game {
    state: GameState,
    scheduler: TickScheduler,
    host: Host,
    paused: bool,
}

impl Game {
    /// Build and populate a new game
    pub fn new(config: &GameConfig, host: Host, now: Instant) -> Self {
        let mut state = GameState::from_config(config);
        setup::populate(&mut state, &config.population);
        Self::with_state(state, config, host, now)
    }

    /// Wrap an already prepared world
    pub fn with_state(
        mut state: GameState,
        config: &GameConfig,
        mut host: Host,
        now: Instant,
    ) -> Self {
        host.display.set_health(state.session().health());
        host.dispatch(state.drain_events());
        info!(
            tick_rate = config.tick_rate,
            max_frame_skip = config.max_frame_skip,
            seed = config.seed,
            "Game ready"
        );
        Self {
            state,
            scheduler: TickScheduler::new(config.tick_rate, config.max_frame_skip, now),
            host,
            paused: false,
        }
    }

    /// Host frame callback. Runs whatever ticks are due and renders once if
    /// any ran. Returns the number of ticks.
    pub fn advance(&mut self, now: Instant) -> u32 {
        if self.paused {
            return 0;
        }
        let mut driver = Driver {
            state: &mut self.state,
            host: &mut self.host,
        };
        let loops = self.scheduler.run(now, &mut driver);
        self.pause_if_finished();
        loops
    }

    /// Run exactly one tick outside the scheduler
    pub fn step(&mut self) -> TickReport {
        let report = step_with(&mut self.state, &mut self.host);
        self.pause_if_finished();
        report
    }

    fn pause_if_finished(&mut self) {
        if !self.state.is_playing() && !self.paused {
            self.paused = true;
            info!(summary = ?self.state.summary(), "Simulation paused at end of game");
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause. Time spent paused is not caught up.
    pub fn resume(&mut self, now: Instant) {
        if !self.state.is_playing() {
            return;
        }
        self.paused = false;
        self.scheduler.reset(now);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn score(&self) -> u64 {
        self.state.session().score()
    }

    pub fn kills(&self) -> u32 {
        self.state.session().kills()
    }

    pub fn lives(&self) -> u32 {
        self.state.session().lives()
    }

    pub fn health(&self) -> i32 {
        self.state.session().health()
    }

    pub fn enemies_remaining(&self) -> usize {
        self.state.enemies_remaining()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn summary(&self) -> SessionSummary {
        self.state.summary()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
