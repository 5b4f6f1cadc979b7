//! Circle hit testing, one-sided elastic response and per-kind reactions.
//!
//! Each contact is resolved twice, once from each side, with the second
//! side seeing the first side's updated velocity.

#[cfg(feature = "parallel_collision")]
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use crate::game::constants::{damage, score};
use crate::game::entity::{Entity, EntityId, EntityKind, ProjectileKind};
use crate::game::interfaces::Sound;
use crate::game::state::GameState;
use crate::util::vec2::Vec2;

/// Below this many collidables the scan stays on the calling thread
#[cfg(feature = "parallel_collision")]
const PARALLEL_THRESHOLD: usize = 256;

type PairBuf = SmallVec<[(usize, usize); 4]>;

/// Read-only view of the other party in a reaction
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

impl Body {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            position: entity.position,
            velocity: entity.velocity,
            mass: entity.mass,
        }
    }
}

/// Side effects a reaction asks the world to apply
#[derive(Debug, Default, PartialEq)]
pub struct ReactionOutcome {
    /// Points for a kill credited to the player
    pub kill_points: Option<u64>,
    /// Health the reacting player loses
    pub damage: i32,
    pub sounds: SmallVec<[Sound; 2]>,
}

pub type ReactionFn = fn(&mut Entity, &Body, &mut ReactionOutcome);

/// One-sided elastic response along the contact normal.
///
/// `normal_angle` points from the other body toward this one. The
/// tangential component of `self_velocity` is kept; the normal component
/// becomes `((m1 - m2) v1n + 2 m2 v2n) / (m1 + m2)`.
pub fn resolve(
    self_velocity: Vec2,
    self_mass: f32,
    other_velocity: Vec2,
    other_mass: f32,
    normal_angle: f32,
) -> Vec2 {
    debug_assert!(self_mass > 0.0, "resolve called for an immovable body");
    let other_mass = other_mass.max(0.0);

    let normal = Vec2::from_angle(normal_angle);
    let tangent = normal.perpendicular();

    let self_n = self_velocity.dot(normal);
    let self_t = self_velocity.dot(tangent);
    let other_n = other_velocity.dot(normal);

    let final_n = ((self_mass - other_mass) * self_n + 2.0 * other_mass * other_n)
        / (self_mass + other_mass);

    normal * final_n + tangent * self_t
}

/// Pairs that ignore each other entirely, seen from `me`
pub fn passes_through(me: EntityKind, other: EntityKind) -> bool {
    use EntityKind::*;
    use ProjectileKind::*;

    matches!(
        (me, other),
        (SludgerMine, Sludger | SludgerMine)
            | (Sludger, SludgerMine | PlayerShip)
            | (Puffer, Projectile(PufferShot))
            | (Projectile(PufferShot), Puffer | Projectile(PufferShot))
            | (QuadBlaster, Projectile(QuadBlasterShot))
            | (PlayerShip, Projectile(PhotonSmall))
            | (Projectile(PhotonSmall), PlayerShip)
    )
}

/// Overlapping pairs among `shapes` (position, radius), each once, `i < j`,
/// in scan order. Zero-radius shapes never match.
pub fn find_contacts(shapes: &[(Vec2, f32)]) -> Vec<(usize, usize)> {
    let scan = |i: usize| -> PairBuf {
        let (pi, ri) = shapes[i];
        if ri <= 0.0 {
            return PairBuf::new();
        }
        shapes[i + 1..]
            .iter()
            .enumerate()
            .filter_map(|(k, &(pj, rj))| {
                let reach = ri + rj;
                (rj > 0.0 && pi.distance_sq_to(pj) <= reach * reach).then_some((i, i + 1 + k))
            })
            .collect()
    };
    scan_all(shapes.len(), scan)
}

#[cfg(feature = "parallel_collision")]
fn scan_all<F>(n: usize, scan: F) -> Vec<(usize, usize)>
where
    F: Fn(usize) -> PairBuf + Sync + Send,
{
    if n >= PARALLEL_THRESHOLD {
        // Order-preserving collect keeps the pass deterministic
        (0..n).into_par_iter().flat_map_iter(scan).collect()
    } else {
        (0..n).flat_map(scan).collect()
    }
}

#[cfg(not(feature = "parallel_collision"))]
fn scan_all<F>(n: usize, scan: F) -> Vec<(usize, usize)>
where
    F: Fn(usize) -> PairBuf,
{
    (0..n).flat_map(scan).collect()
}

/// Run the collision pass. Returns the contacts that were resolved.
pub fn run(state: &mut GameState) -> Vec<(EntityId, EntityId)> {
    let snapshot = state.collidable_indices();
    let shapes: Vec<(Vec2, f32)> = snapshot
        .iter()
        .map(|&i| {
            let e = &state.entities[i];
            (e.position, e.collision_radius)
        })
        .collect();

    let mut resolved = Vec::new();
    for (a, b) in find_contacts(&shapes) {
        let (ia, ib) = (snapshot[a], snapshot[b]);
        if !state.entities[ia].alive || !state.entities[ib].alive {
            continue;
        }
        resolved.push((state.entities[ia].id, state.entities[ib].id));
        react(state, ia, ib);
        react(state, ib, ia);
    }
    resolved
}

fn react(state: &mut GameState, me: usize, other: usize) {
    let other = Body::of(&state.entities[other]);
    let entity = &mut state.entities[me];
    if passes_through(entity.kind, other.kind) {
        return;
    }

    let mut outcome = ReactionOutcome::default();
    reaction_for(entity.kind)(entity, &other, &mut outcome);
    state.apply_reaction(me, outcome);
}

/// Reaction table, keyed by the reacting entity's kind
pub fn reaction_for(kind: EntityKind) -> ReactionFn {
    match kind {
        EntityKind::PlayerShip => react_player,
        EntityKind::Projectile(ProjectileKind::PhotonSmall) => react_photon,
        EntityKind::Projectile(ProjectileKind::PufferShot) => react_puffer_shot,
        EntityKind::Projectile(ProjectileKind::QuadBlasterShot) => react_quad_shot,
        EntityKind::Sludger => react_sludger,
        EntityKind::SludgerMine => react_mine,
        EntityKind::Puffer => react_puffer,
        EntityKind::QuadBlaster => react_quad_blaster,
        EntityKind::Asteroid(_) | EntityKind::EnemyBase | EntityKind::Base | EntityKind::Star => {
            react_bounce
        }
    }
}

/// Elastic response for movable bodies; immovable ones keep their velocity
fn bounce(me: &mut Entity, other: &Body) {
    if me.is_immovable() {
        return;
    }
    let normal_angle =
        (me.position.y - other.position.y).atan2(me.position.x - other.position.x);
    me.velocity = resolve(me.velocity, me.mass, other.velocity, other.mass, normal_angle);
}

fn react_bounce(me: &mut Entity, other: &Body, _out: &mut ReactionOutcome) {
    bounce(me, other);
}

fn react_player(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    bounce(me, other);
    match other.kind {
        EntityKind::Asteroid(_) => {
            out.sounds.push(Sound::CollisionGeneral);
            out.damage += damage::ASTEROID;
        }
        EntityKind::SludgerMine => out.damage += damage::SLUDGER_MINE,
        EntityKind::Projectile(ProjectileKind::QuadBlasterShot) => {
            out.damage += damage::QUAD_BLASTER_SHOT
        }
        EntityKind::Projectile(ProjectileKind::PufferShot) => out.damage += damage::PUFFER_SHOT,
        _ => {}
    }
}

fn react_photon(me: &mut Entity, other: &Body, _out: &mut ReactionOutcome) {
    bounce(me, other);
    if other.kind.is_ai_controlled() {
        me.alive = false;
    }
}

fn react_puffer_shot(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    if other.kind == EntityKind::PlayerShip {
        out.sounds.push(Sound::CollisionGeneral);
        me.alive = false;
    }
}

fn react_quad_shot(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    if other.kind == EntityKind::PlayerShip {
        out.sounds.push(Sound::CollisionQuad);
        me.alive = false;
    }
}

/// Shared ending for enemies destroyed on contact
fn destroy(
    me: &mut Entity,
    other: &Body,
    points: Option<u64>,
    sound: Sound,
    out: &mut ReactionOutcome,
) {
    bounce(me, other);
    if other.kind.is_projectile() {
        out.kill_points = points;
    }
    out.sounds.push(sound);
    me.alive = false;
}

fn react_sludger(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    destroy(me, other, Some(score::SLUDGER), Sound::SludgerDeath, out);
}

fn react_mine(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    destroy(me, other, Some(score::SLUDGER_MINE), Sound::SludgerMinePop, out);
}

fn react_puffer(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    if other.kind == EntityKind::PlayerShip {
        out.sounds.push(Sound::CollisionGeneral);
    }
    // Puffers are not worth anything
    destroy(me, other, None, Sound::SludgerMinePop, out);
}

fn react_quad_blaster(me: &mut Entity, other: &Body, out: &mut ReactionOutcome) {
    destroy(me, other, Some(score::QUAD_BLASTER), Sound::SludgerDeath, out);
}

impl GameState {
    /// Apply the session side of a reaction by the entity at `index`
    pub(crate) fn apply_reaction(&mut self, index: usize, outcome: ReactionOutcome) {
        for sound in outcome.sounds {
            self.play(sound);
        }

        if !self.is_playing() {
            return;
        }

        let kind = self.entities[index].kind;
        if let Some(points) = outcome.kill_points {
            self.session.award_kill(points);
            debug!(
                kind = ?kind,
                points,
                score = self.session.score(),
                "Enemy destroyed"
            );
        }

        if outcome.damage > 0 && kind == EntityKind::PlayerShip {
            self.damage_player(outcome.damage);
        }
    }
}
