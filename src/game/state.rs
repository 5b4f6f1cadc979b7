//! World state and entity management.
//!
//! Holds every entity in insertion order, the ordered collidable subset,
//! session counters, and the queues a tick fills before they are applied.

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::game::bounds::{Viewport, WorldBounds};
use crate::game::constants::{messages, player};
use crate::game::entity::{Entity, EntityId, EntityKind};
use crate::game::interfaces::{GameEvent, Sound};
use crate::game::session::{GamePhase, SessionState, SessionSummary};
use crate::util::vec2::Vec2;

/// Entities created mid-tick, added once the tick settles
pub type SpawnQueue = SmallVec<[Entity; 4]>;

pub struct GameState {
    /// All entities, player last
    pub(crate) entities: Vec<Entity>,
    /// Collision candidates in insertion order, player last
    collidable: Vec<EntityId>,
    index: HashMap<EntityId, usize>,
    next_id: u64,
    player: Option<EntityId>,
    pub bounds: WorldBounds,
    pub viewport: Viewport,
    pub(crate) session: SessionState,
    phase: GamePhase,
    tick: u64,
    pub(crate) rng: StdRng,
    pub(crate) pending_spawns: SpawnQueue,
    pending_recenter: Option<Vec2>,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(bounds: WorldBounds, viewport: Viewport, session: SessionState, seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            collidable: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            player: None,
            bounds,
            viewport,
            session,
            phase: GamePhase::Playing,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
            pending_spawns: SpawnQueue::new(),
            pending_recenter: None,
            events: Vec::new(),
        }
    }

    /// Empty world sized and seeded from config
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.bounds,
            config.viewport,
            SessionState::new(config.lives, player::MAX_HEALTH),
            config.seed,
        )
    }

    // ---- spawn / despawn ----

    /// Add an entity to the world, and to the collidable set when asked.
    ///
    /// The player ship is always appended; everything else goes in front of
    /// it so the player stays last in both orders.
    pub fn spawn(&mut self, mut entity: Entity, collidable: bool) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;

        let is_player = entity.kind == EntityKind::PlayerShip;
        let collidable = collidable && entity.collision_radius > 0.0;

        if is_player {
            debug_assert!(self.player.is_none(), "a second player ship was spawned");
            self.player = Some(id);
            self.entities.push(entity);
            if collidable {
                self.collidable.push(id);
            }
        } else {
            let player = self.player;
            let at = match self.entities.last() {
                Some(last) if Some(last.id) == player => self.entities.len() - 1,
                _ => self.entities.len(),
            };
            self.entities.insert(at, entity);
            if collidable {
                let at = match self.collidable.last() {
                    Some(&last) if Some(last) == player => self.collidable.len() - 1,
                    _ => self.collidable.len(),
                };
                self.collidable.insert(at, id);
            }
        }

        self.rebuild_index();
        id
    }

    /// Mark an entity for removal. Returns false if it was already gone.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.alive => {
                entity.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Drop every dead entity from both sets
    pub fn purge_dead(&mut self) {
        if self.entities.iter().all(|e| e.alive) {
            return;
        }
        let entities = &self.entities;
        let index = &self.index;
        self.collidable
            .retain(|id| index.get(id).is_some_and(|&i| entities[i].alive));
        self.entities.retain(|e| e.alive);

        if let Some(player) = self.player {
            if !self.entities.iter().any(|e| e.id == player) {
                self.player = None;
            }
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, e) in self.entities.iter().enumerate() {
            self.index.insert(e.id, i);
        }
    }

    // ---- lookup ----

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index.get(&id).map(|&i| &mut self.entities[i])
    }

    pub(crate) fn index_of(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Live entities in draw order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn collidable_ids(&self) -> &[EntityId] {
        &self.collidable
    }

    /// Indices of live collidables, in collidable order
    pub(crate) fn collidable_indices(&self) -> Vec<usize> {
        self.collidable
            .iter()
            .filter_map(|id| self.index_of(*id))
            .filter(|&i| self.entities[i].alive)
            .collect()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.get(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.and_then(move |id| self.get_mut(id))
    }

    // ---- world geometry ----

    /// Offset applied to the world each tick so the player stays centred
    pub fn camera_shift(&self) -> Vec2 {
        self.player()
            .filter(|p| p.alive)
            .map(|p| p.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    /// Fold an entity that left the world back in from the opposite edge
    pub fn wrap_to_bounds(&mut self, id: EntityId) {
        let bounds = self.bounds;
        if let Some(entity) = self.get_mut(id) {
            entity.position = bounds.wrap(entity.position);
        }
    }

    /// Move a non-player entity against the player's velocity, then wrap
    pub fn translate_for_camera(&mut self, id: EntityId) {
        if Some(id) == self.player {
            return;
        }
        let shift = self.camera_shift();
        if let Some(entity) = self.get_mut(id) {
            entity.position -= shift;
        }
        self.wrap_to_bounds(id);
    }

    /// Shift every non-player entity by `-target`, so the player appears
    /// to have jumped to `target`
    pub fn recenter_on(&mut self, target: Vec2) {
        let bounds = self.bounds;
        let player = self.player;
        for entity in self.entities.iter_mut().filter(|e| Some(e.id) != player) {
            entity.position = bounds.wrap(entity.position - target);
        }
    }

    /// Follow a viewport resize, keeping everything placed relative to the
    /// screen centre
    pub fn resize(&mut self, width: f32, height: f32) {
        let old_center = self.viewport.center();
        self.viewport = Viewport::new(width, height);
        let delta = self.viewport.center() - old_center;

        let bounds = self.bounds;
        for entity in &mut self.entities {
            entity.position = bounds.wrap(entity.position + delta);
        }
    }

    pub fn random_point(&mut self) -> Vec2 {
        let b = self.bounds;
        Vec2::new(
            self.rng.gen_range(b.left..=b.right),
            self.rng.gen_range(b.top..=b.bottom),
        )
    }

    // ---- session ----

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Live hostiles that still have to be destroyed
    pub fn enemies_remaining(&self) -> usize {
        self.entities().filter(|e| e.kind.is_enemy()).count()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            phase: self.phase,
            score: self.session.score(),
            kills: self.session.kills(),
            lives: self.session.lives(),
            ticks: self.tick,
        }
    }

    // ---- events ----

    pub(crate) fn play(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }

    pub(crate) fn message(&mut self, text: String, duration_ticks: u32) {
        self.events.push(GameEvent::Message {
            text,
            duration_ticks,
        });
    }

    /// Take the notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- player lifecycle ----

    pub(crate) fn damage_player(&mut self, amount: i32) {
        let exhausted = self.session.damage(amount);
        self.events
            .push(GameEvent::HealthChanged(self.session.health()));
        if exhausted {
            self.kill_player();
        }
    }

    fn kill_player(&mut self) {
        self.play(Sound::PlayerDeath);
        if let Some(ship) = self.player_mut() {
            ship.velocity = Vec2::ZERO;
            ship.angle = player::START_ANGLE;
        }

        let lives = self.session.lose_life();
        info!(lives, score = self.session.score(), "Player ship destroyed");

        if lives == 0 {
            self.end_game();
            return;
        }

        let text = if lives == 1 {
            "1 life left".to_string()
        } else {
            format!("{} lives left", lives)
        };
        self.message(text, player::RESPAWN_MESSAGE_TICKS);

        let target = self.random_point();
        self.pending_recenter = Some(target);
        self.session.restore_health();
        self.events
            .push(GameEvent::HealthChanged(self.session.health()));
    }

    /// Finish the game in defeat. Only the first call has any effect.
    pub fn end_game(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        let score = self.session.score();
        self.message(
            format!("You achieved a score of {} before the fringe took you", score),
            messages::END_OF_GAME_TICKS,
        );
        if let Some(id) = self.player {
            self.despawn(id);
        }
        info!(score, ticks = self.tick, "Game over");
        true
    }

    /// Finish the game in victory, stopping the player in place
    pub(crate) fn declare_victory(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.phase = GamePhase::Victory;
        if let Some(ship) = self.player_mut() {
            ship.velocity = Vec2::ZERO;
        }
        let score = self.session.score();
        self.message(
            format!("You conquered the fringe with a score of {}", score),
            messages::END_OF_GAME_TICKS,
        );
        info!(score, ticks = self.tick, "All enemies destroyed");
    }

    // ---- end of tick ----

    /// Apply everything queued during the tick: removals, new entities and
    /// a respawn jump
    pub(crate) fn settle(&mut self) {
        self.purge_dead();

        let spawns = std::mem::take(&mut self.pending_spawns);
        for entity in spawns {
            if entity.kind == EntityKind::Star {
                self.spawn(entity, false);
            } else {
                self.spawn(entity, true);
            }
        }

        if let Some(target) = self.pending_recenter.take() {
            if self.is_playing() {
                debug!(x = target.x, y = target.y, "Respawning player");
                self.recenter_on(target);
            }
        }
    }

    /// Reset any entity whose motion went non-finite
    pub fn sanitize(&mut self) {
        for entity in &mut self.entities {
            if !entity.position.is_finite() {
                warn!(id = entity.id.0, kind = ?entity.kind, "Non-finite position, resetting");
                entity.position = Vec2::ZERO;
            }
            if !entity.velocity.is_finite() {
                warn!(id = entity.id.0, kind = ?entity.kind, "Non-finite velocity, resetting");
                entity.velocity = Vec2::ZERO;
            }
            if !entity.angle.is_finite() {
                entity.angle = 0.0;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::entity::AsteroidKind;

    pub(crate) fn test_state() -> GameState {
        GameState::new(
            WorldBounds::default(),
            Viewport::new(800.0, 600.0),
            SessionState::default(),
            42,
        )
    }

    #[test]
    fn test_player_stays_last() {
        let mut state = test_state();
        state.spawn(Entity::star(Vec2::ZERO), false);
        let player = state.spawn(Entity::player_ship(Vec2::new(400.0, 300.0)), true);
        let rock = state.spawn(
            Entity::asteroid(AsteroidKind::Rocko, Vec2::new(10.0, 0.0), Vec2::ZERO),
            true,
        );
        let star = state.spawn(Entity::star(Vec2::ZERO), true);

        assert_eq!(state.entities.last().map(|e| e.id), Some(player));
        assert_eq!(state.collidable_ids(), &[rock, player]);
        // Stars have no radius and never join the collidable set
        assert!(!state.collidable_ids().contains(&star));
        assert_eq!(
            state.get(rock).map(|e| e.kind),
            Some(EntityKind::Asteroid(AsteroidKind::Rocko))
        );
    }

    #[test]
    fn test_despawn_is_idempotent() {
        let mut state = test_state();
        let mine = state.spawn(Entity::sludger_mine(Vec2::ZERO), true);
        state.spawn(Entity::player_ship(Vec2::ZERO), true);

        assert!(state.despawn(mine));
        assert!(!state.despawn(mine));
        state.purge_dead();
        assert!(!state.despawn(mine));
        assert!(state.get(mine).is_none());
        assert_eq!(state.collidable_ids().len(), 1);
        assert!(state.player().is_some());
    }

    #[test]
    fn test_enemies_remaining_ignores_dead_and_base() {
        let mut state = test_state();
        state.spawn(Entity::enemy_base(), true);
        let s = state.spawn(Entity::sludger(Vec2::ZERO, Vec2::ZERO), true);
        state.spawn(Entity::puffer(Vec2::ZERO, Vec2::ZERO), true);
        state.spawn(Entity::asteroid(AsteroidKind::Pebbles, Vec2::ZERO, Vec2::ZERO), true);
        assert_eq!(state.enemies_remaining(), 2);

        state.despawn(s);
        assert_eq!(state.enemies_remaining(), 1);
    }

    #[test]
    fn test_recenter_moves_world_not_player() {
        let mut state = test_state();
        let rock = state.spawn(
            Entity::asteroid(AsteroidKind::Pebbles, Vec2::new(100.0, 100.0), Vec2::ZERO),
            true,
        );
        let player = state.spawn(Entity::player_ship(Vec2::new(400.0, 300.0)), true);

        state.recenter_on(Vec2::new(1950.0, -50.0));
        assert_eq!(state.get(rock).unwrap().position, Vec2::new(-1850.0, 150.0));
        assert_eq!(state.get(player).unwrap().position, Vec2::new(400.0, 300.0));

        // Far jump wraps back into the world
        state.recenter_on(Vec2::new(1000.0, 0.0));
        let p = state.get(rock).unwrap().position;
        assert!(state.bounds.contains(p));
        assert_eq!(p, Vec2::new(1150.0, 150.0));
    }

    #[test]
    fn test_translate_for_camera() {
        let mut state = test_state();
        let rock = state.spawn(
            Entity::asteroid(AsteroidKind::Pebbles, Vec2::new(-1999.0, 0.0), Vec2::ZERO),
            true,
        );
        let player = state.spawn(Entity::player_ship(Vec2::ZERO), true);
        state.get_mut(player).unwrap().velocity = Vec2::new(3.0, 0.0);

        state.translate_for_camera(rock);
        state.translate_for_camera(player);
        assert_eq!(state.get(rock).unwrap().position, Vec2::new(1998.0, 0.0));
        assert_eq!(state.get(player).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn test_wrap_to_bounds_single_overshoot() {
        let mut state = test_state();
        let rock = state.spawn(
            Entity::asteroid(AsteroidKind::Pebbles, Vec2::new(2010.0, -2005.0), Vec2::ZERO),
            true,
        );
        state.wrap_to_bounds(rock);
        assert_eq!(state.get(rock).unwrap().position, Vec2::new(-1990.0, 1995.0));

        // Already inside: untouched
        state.wrap_to_bounds(rock);
        assert_eq!(state.get(rock).unwrap().position, Vec2::new(-1990.0, 1995.0));
    }

    #[test]
    fn test_resize_shifts_by_center_delta() {
        let mut state = test_state();
        let player = state.spawn(Entity::player_ship(Vec2::new(400.0, 300.0)), true);
        state.resize(1000.0, 700.0);
        assert_eq!(state.get(player).unwrap().position, Vec2::new(500.0, 350.0));
        assert_eq!(state.viewport.center(), Vec2::new(500.0, 350.0));
    }

    #[test]
    fn test_end_game_runs_once() {
        let mut state = test_state();
        state.spawn(Entity::player_ship(Vec2::ZERO), true);
        assert!(state.end_game());
        assert!(!state.end_game());
        assert_eq!(state.phase(), GamePhase::GameOver);

        let messages = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Message { .. }))
            .count();
        assert_eq!(messages, 1);

        state.purge_dead();
        assert!(state.player().is_none());
    }

    #[test]
    fn test_death_with_lives_left_respawns() {
        let mut state = test_state();
        let rock = state.spawn(
            Entity::asteroid(AsteroidKind::Pebbles, Vec2::new(100.0, 100.0), Vec2::ZERO),
            true,
        );
        state.spawn(Entity::player_ship(Vec2::ZERO), true);
        state.player_mut().unwrap().velocity = Vec2::new(4.0, 4.0);

        state.damage_player(150);
        assert_eq!(state.session().lives(), 2);
        assert_eq!(state.session().health(), 100);
        assert_eq!(state.phase(), GamePhase::Playing);

        let ship = state.player().unwrap();
        assert_eq!(ship.velocity, Vec2::ZERO);
        assert_eq!(ship.angle, player::START_ANGLE);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(Sound::PlayerDeath)));
        assert!(events.contains(&GameEvent::Message {
            text: "2 lives left".to_string(),
            duration_ticks: 300,
        }));

        // The jump is deferred to the end of the tick
        assert_eq!(state.get(rock).unwrap().position, Vec2::new(100.0, 100.0));
        state.settle();
        assert_ne!(state.get(rock).unwrap().position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_settle_adds_spawns_before_player() {
        let mut state = test_state();
        let player = state.spawn(Entity::player_ship(Vec2::ZERO), true);
        state
            .pending_spawns
            .push(Entity::sludger_mine(Vec2::new(5.0, 5.0)));
        state.settle();

        assert_eq!(state.entity_count(), 2);
        assert_eq!(state.entities.last().map(|e| e.id), Some(player));
        assert_eq!(state.collidable_ids().last(), Some(&player));
        assert_eq!(state.enemies_remaining(), 1);
    }

    #[test]
    fn test_sanitize_resets_non_finite() {
        let mut state = test_state();
        let id = state.spawn(Entity::sludger(Vec2::ZERO, Vec2::ZERO), true);
        state.get_mut(id).unwrap().velocity = Vec2::new(f32::NAN, 1.0);
        state.sanitize();
        assert_eq!(state.get(id).unwrap().velocity, Vec2::ZERO);
    }
}
