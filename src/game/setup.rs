//! Initial population of a new game.

use rand::Rng;
use tracing::info;

use crate::config::PopulationConfig;
use crate::game::constants::{asteroid, puffer, quad_blaster, sludger};
use crate::game::entity::{AsteroidKind, Entity};
use crate::game::interfaces::Sound;
use crate::game::state::GameState;
use crate::util::vec2::Vec2;

/// Uniform drift with components in (-scale, scale)
fn drift(state: &mut GameState, scale: f32) -> Vec2 {
    let rng = &mut state.rng;
    Vec2::new(
        (rng.gen::<f32>() - rng.gen::<f32>()) * scale,
        (rng.gen::<f32>() - rng.gen::<f32>()) * scale,
    )
}

/// Fill an empty world: scenery first, then hostiles, the player last
pub fn populate(state: &mut GameState, population: &PopulationConfig) {
    for _ in 0..population.stars {
        let at = state.random_point();
        state.spawn(Entity::star(at), false);
    }

    let center = state.viewport.center();
    state.spawn(Entity::home_base(center), true);
    state.spawn(Entity::enemy_base(), true);

    for _ in 0..population.pebbles {
        let at = state.random_point();
        let v = drift(state, asteroid::PEBBLES_DRIFT);
        state.spawn(Entity::asteroid(AsteroidKind::Pebbles, at, v), true);
    }
    for _ in 0..population.rockos {
        let at = state.random_point();
        let v = drift(state, asteroid::ROCKO_DRIFT);
        state.spawn(Entity::asteroid(AsteroidKind::Rocko, at, v), true);
    }
    for _ in 0..population.sludgers {
        let at = state.random_point();
        let v = drift(state, sludger::DRIFT);
        state.spawn(Entity::sludger(at, v), true);
    }
    for _ in 0..population.quad_blasters {
        let at = state.random_point();
        let v = drift(state, quad_blaster::DRIFT);
        state.spawn(Entity::quad_blaster(at, v), true);
    }
    for _ in 0..population.puffers {
        let at = state.random_point();
        let v = drift(state, puffer::DRIFT);
        state.spawn(Entity::puffer(at, v), true);
    }

    state.spawn(Entity::player_ship(center), true);
    state.play(Sound::StartUp);

    info!(
        entities = state.entity_count(),
        collidable = state.collidable_ids().len(),
        enemies = state.enemies_remaining(),
        "World populated"
    );
}
