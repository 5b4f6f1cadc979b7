//! Steering and fire controllers for hostile archetypes.

use std::f32::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::trace;

use crate::game::bounds::Viewport;
use crate::game::constants::motion::MIN_BEARING_DISTANCE_SQ;
use crate::game::constants::{enemy_base, projectile, puffer, quad_blaster, sludger};
use crate::game::entity::{Brain, Entity, EntityKind, ProjectileKind};
use crate::game::state::SpawnQueue;
use crate::game::systems::motion;
use crate::util::vec2::Vec2;

/// Shared inputs for one controller update
pub struct AiContext<'a> {
    /// Player position, if a player is present
    pub target: Option<Vec2>,
    pub viewport: Viewport,
    pub rng: &'a mut StdRng,
    pub spawns: &'a mut SpawnQueue,
}

/// Normalize an angle into (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Absolute direction from `from` to `to`, or None when they coincide
pub fn bearing(from: Vec2, to: Vec2) -> Option<f32> {
    let delta = to - from;
    if delta.length_sq() < MIN_BEARING_DISTANCE_SQ {
        None
    } else {
        Some(delta.angle())
    }
}

/// Signed turn from `facing` to `bearing`, in (-π, π]
#[inline]
pub fn angular_error(facing: f32, bearing: f32) -> f32 {
    wrap_angle(bearing - facing)
}

/// Run the controller for an AI-driven entity. Other kinds are untouched.
pub fn update(entity: &mut Entity, ctx: &mut AiContext<'_>) {
    match entity.kind {
        EntityKind::Sludger => update_sludger(entity, ctx),
        EntityKind::SludgerMine => update_mine(entity, ctx),
        EntityKind::Puffer => update_puffer(entity, ctx),
        EntityKind::QuadBlaster => update_quad_blaster(entity, ctx),
        EntityKind::EnemyBase => update_enemy_base(entity),
        _ => {}
    }
}

/// Snap the heading straight onto the player, if there is a bearing
fn face_target(entity: &mut Entity, target: Option<Vec2>) {
    if let Some(b) = target.and_then(|t| bearing(entity.position, t)) {
        entity.angle = b;
    }
}

fn update_sludger(entity: &mut Entity, ctx: &mut AiContext<'_>) {
    face_target(entity, ctx.target);
    motion::thrust(entity);

    if let Brain::Sludger { ticks_to_mine } = &mut entity.brain {
        *ticks_to_mine += 1;
        if *ticks_to_mine >= sludger::TICKS_PER_MINE {
            *ticks_to_mine = 0;
            ctx.spawns.push(Entity::sludger_mine(entity.position));
        }
    }
}

fn update_mine(entity: &mut Entity, ctx: &mut AiContext<'_>) {
    face_target(entity, ctx.target);
    motion::thrust(entity);
}

fn reload_ticks(rng: &mut StdRng, min: f32, spread: f32) -> f32 {
    rng.gen_range(min..min + spread)
}

fn update_puffer(entity: &mut Entity, ctx: &mut AiContext<'_>) {
    let Brain::Puffer { mut fire_timer } = entity.brain else {
        return;
    };

    let error = ctx
        .target
        .and_then(|t| bearing(entity.position, t))
        .map(|b| angular_error(entity.angle, b));

    if let Some(error) = error {
        if error > 0.0 {
            entity.angle = wrap_angle(entity.angle + puffer::TURN_RATE);
        } else if error < 0.0 {
            entity.angle = wrap_angle(entity.angle - puffer::TURN_RATE);
        }
    }

    motion::thrust(entity);

    if let Some(error) = error {
        if fire_timer <= 0.0 && error.abs() < puffer::FIRE_CONE {
            // Shots leave from the tail and fly out through the puffer
            let facing = Vec2::from_angle(entity.angle);
            ctx.spawns.push(Entity::projectile(
                ProjectileKind::PufferShot,
                entity.position - facing * entity.collision_radius,
                entity.velocity + facing * projectile::SPEED,
            ));
            fire_timer = reload_ticks(
                ctx.rng,
                puffer::MIN_RELOAD_TICKS,
                puffer::RELOAD_SPREAD_TICKS,
            );
        }
    }

    entity.brain = Brain::Puffer {
        fire_timer: fire_timer - 1.0,
    };
}

/// Absolute barrel angle closest to `bearing`
pub fn closest_barrel(body_angle: f32, bearing: f32) -> f32 {
    quad_blaster::BARREL_OFFSETS
        .iter()
        .map(|offset| wrap_angle(body_angle + offset))
        .fold(None, |best: Option<f32>, barrel| match best {
            Some(b) if (b - bearing).abs() <= (barrel - bearing).abs() => Some(b),
            _ => Some(barrel),
        })
        .unwrap_or(body_angle)
}

/// Fire gate: bearing / barrel inside the accepted band
pub fn barrel_on_target(bearing: f32, barrel: f32) -> bool {
    if barrel.abs() <= f32::EPSILON {
        return false;
    }
    let ratio = bearing / barrel;
    (quad_blaster::AIM_RATIO_MIN..=quad_blaster::AIM_RATIO_MAX).contains(&ratio)
}

fn update_quad_blaster(entity: &mut Entity, ctx: &mut AiContext<'_>) {
    let Brain::QuadBlaster {
        mut fire_timer,
        mut ticks_to_rotate,
    } = entity.brain
    else {
        return;
    };

    // Turrets idle while off screen
    if !ctx.viewport.is_visible(entity.position, entity.size) {
        return;
    }

    ticks_to_rotate += 1;
    if ticks_to_rotate >= quad_blaster::TICKS_PER_ROTATION {
        ticks_to_rotate = 0;
        entity.angle = wrap_angle(entity.angle + quad_blaster::ROTATION_STEP);
    }

    if fire_timer <= 0.0 {
        if let Some(b) = ctx.target.and_then(|t| bearing(entity.position, t)) {
            let barrel = closest_barrel(entity.angle, b);
            if barrel_on_target(b, barrel) {
                ctx.spawns.push(Entity::projectile(
                    ProjectileKind::QuadBlasterShot,
                    entity.position,
                    entity.velocity + Vec2::from_angle(barrel) * projectile::SPEED,
                ));
                fire_timer = reload_ticks(
                    ctx.rng,
                    quad_blaster::MIN_RELOAD_TICKS,
                    quad_blaster::RELOAD_SPREAD_TICKS,
                );
            }
        }
    }

    entity.brain = Brain::QuadBlaster {
        fire_timer: fire_timer - 1.0,
        ticks_to_rotate,
    };
}

fn update_enemy_base(entity: &mut Entity) {
    if let Brain::EnemyBase { spawn_ticks } = &mut entity.brain {
        *spawn_ticks += 1;
        if *spawn_ticks >= enemy_base::SPAWN_CYCLE_TICKS {
            *spawn_ticks = 0;
            trace!(id = entity.id.0, "Enemy base spawn cycle elapsed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    struct Harness {
        rng: StdRng,
        spawns: SpawnQueue,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: StdRng::seed_from_u64(7),
                spawns: SpawnQueue::new(),
            }
        }

        fn ctx(&mut self, target: Option<Vec2>) -> AiContext<'_> {
            AiContext {
                target,
                viewport: Viewport::new(800.0, 600.0),
                rng: &mut self.rng,
                spawns: &mut self.spawns,
            }
        }
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(PI) - PI).abs() < EPSILON);
        assert!((wrap_angle(-PI) - PI).abs() < EPSILON);
        assert!((wrap_angle(3.0 * PI / 2.0) + FRAC_PI_2).abs() < EPSILON);
        assert!((wrap_angle(-5.0 * PI / 2.0) + FRAC_PI_2).abs() < 1e-4);
        assert!((wrap_angle(0.3) - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_angular_error_takes_short_way_round() {
        // Facing just below +π, target just above -π: a small positive turn
        let err = angular_error(PI - 0.1, -PI + 0.1);
        assert!((err - 0.2).abs() < 1e-4);

        let err = angular_error(-PI + 0.1, PI - 0.1);
        assert!((err + 0.2).abs() < 1e-4);

        for facing in [-3.0_f32, -1.0, 0.0, 2.5, 3.1] {
            for target in [-3.1_f32, -0.5, 0.0, 1.7, 3.14] {
                let err = angular_error(facing, target);
                assert!(err > -PI - EPSILON && err <= PI + EPSILON);
            }
        }
    }

    #[test]
    fn test_bearing_guards_coincident_points() {
        assert!(bearing(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)).is_none());
        let b = bearing(Vec2::ZERO, Vec2::new(0.0, 10.0)).unwrap();
        assert!((b - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_mine_homes_on_player() {
        let mut h = Harness::new();
        let mut mine = Entity::sludger_mine(Vec2::new(100.0, 0.0));
        update(&mut mine, &mut h.ctx(Some(Vec2::ZERO)));

        assert!((mine.angle - PI).abs() < EPSILON);
        assert!(mine.velocity.x < 0.0);
        assert!(mine.velocity.y.abs() < EPSILON);
    }

    #[test]
    fn test_mine_holds_heading_on_top_of_player() {
        let mut h = Harness::new();
        let mut mine = Entity::sludger_mine(Vec2::new(3.0, 4.0));
        mine.angle = 1.0;
        update(&mut mine, &mut h.ctx(Some(Vec2::new(3.0, 4.0))));
        assert_eq!(mine.angle, 1.0);
        assert!(mine.velocity.is_finite());
    }

    #[test]
    fn test_sludger_drifts_and_lays_mines() {
        let mut h = Harness::new();
        let start = Vec2::new(1.5, -0.5);
        let mut sludger = Entity::sludger(Vec2::new(50.0, 50.0), start);

        for _ in 0..299 {
            update(&mut sludger, &mut h.ctx(Some(Vec2::ZERO)));
        }
        assert!(h.spawns.is_empty());
        assert!(sludger.velocity.approx_eq(start, 1e-4));

        update(&mut sludger, &mut h.ctx(Some(Vec2::ZERO)));
        assert_eq!(h.spawns.len(), 1);
        assert_eq!(h.spawns[0].kind, EntityKind::SludgerMine);
        assert_eq!(h.spawns[0].position, sludger.position);
    }

    #[test]
    fn test_puffer_fires_when_aligned() {
        let mut h = Harness::new();
        // Player straight ahead along +x
        let mut puffer = Entity::puffer(Vec2::new(100.0, 100.0), Vec2::ZERO);
        puffer.angle = 0.0;
        update(&mut puffer, &mut h.ctx(Some(Vec2::new(400.0, 100.0))));

        assert_eq!(h.spawns.len(), 1);
        let shot = &h.spawns[0];
        assert_eq!(shot.kind, EntityKind::Projectile(ProjectileKind::PufferShot));
        let expected = puffer.velocity + Vec2::from_angle(puffer.angle) * 10.0;
        assert!(shot.velocity.approx_eq(expected, 1e-4));
        assert!(shot.position.approx_eq(Vec2::new(86.0, 100.0), 1e-4));

        match puffer.brain {
            Brain::Puffer { fire_timer } => assert!(fire_timer >= 17.0 && fire_timer < 197.0),
            _ => panic!("brain changed"),
        }
    }

    #[test]
    fn test_puffer_holds_fire_outside_cone() {
        let mut h = Harness::new();
        let mut puffer = Entity::puffer(Vec2::ZERO, Vec2::ZERO);
        puffer.angle = 0.0;
        update(&mut puffer, &mut h.ctx(Some(Vec2::new(-300.0, 0.0))));
        assert!(h.spawns.is_empty());
    }

    #[test]
    fn test_puffer_turns_toward_player_and_respects_speed_cap() {
        let mut h = Harness::new();
        let mut puffer = Entity::puffer(Vec2::ZERO, Vec2::new(0.5, 0.0));
        puffer.angle = 0.0;
        update(&mut puffer, &mut h.ctx(Some(Vec2::new(0.0, 500.0))));
        assert!((puffer.angle - 0.015).abs() < EPSILON);

        for _ in 0..500 {
            update(&mut puffer, &mut h.ctx(Some(Vec2::new(0.0, 500.0))));
        }
        assert!(puffer.velocity.length() <= 1.0 + 0.01);
    }

    #[test]
    fn test_closest_barrel() {
        let barrel = closest_barrel(0.0, 1.4);
        assert!((barrel - 1.55).abs() < EPSILON);

        let barrel = closest_barrel(0.0, -1.5);
        assert!((barrel + 1.55).abs() < EPSILON);

        // 3.15 wraps just past -π
        let barrel = closest_barrel(0.0, -3.1);
        assert!((barrel - wrap_angle(3.15)).abs() < EPSILON);
    }

    #[test]
    fn test_barrel_ratio_gate() {
        assert!(barrel_on_target(1.5, 1.55));
        assert!(!barrel_on_target(1.0, 1.55));
        assert!(!barrel_on_target(0.01, 0.0));
        assert!(!barrel_on_target(-1.5, 1.55));
    }

    #[test]
    fn test_quad_blaster_idle_off_screen() {
        let mut h = Harness::new();
        let mut quad = Entity::quad_blaster(Vec2::new(-500.0, -500.0), Vec2::ZERO);
        for _ in 0..50 {
            update(&mut quad, &mut h.ctx(Some(Vec2::new(-500.0, -400.0))));
        }
        assert_eq!(quad.angle, 0.0);
        assert!(h.spawns.is_empty());
    }

    #[test]
    fn test_quad_blaster_rotates_and_fires_on_screen() {
        let mut h = Harness::new();
        let mut quad = Entity::quad_blaster(Vec2::new(400.0, 300.0), Vec2::ZERO);
        // Player below: bearing π/2, barrel 1.55 within band
        update(&mut quad, &mut h.ctx(Some(Vec2::new(400.0, 500.0))));
        assert_eq!(h.spawns.len(), 1);
        let shot = &h.spawns[0];
        assert_eq!(shot.kind, EntityKind::Projectile(ProjectileKind::QuadBlasterShot));
        assert_eq!(shot.position, quad.position);
        assert!(shot.velocity.approx_eq(Vec2::from_angle(1.55) * 10.0, 1e-4));

        for _ in 0..9 {
            update(&mut quad, &mut h.ctx(None));
        }
        assert!((quad.angle - quad_blaster::ROTATION_STEP).abs() < EPSILON);
    }

    #[test]
    fn test_enemy_base_only_counts() {
        let mut h = Harness::new();
        let mut base = Entity::enemy_base();
        for _ in 0..650 {
            update(&mut base, &mut h.ctx(Some(Vec2::ZERO)));
        }
        assert!(h.spawns.is_empty());
        assert_eq!(base.brain, Brain::EnemyBase { spawn_ticks: 50 });
    }
}
