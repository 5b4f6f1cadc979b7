use crate::game::constants::motion::MIN_DAMPING_RADICAND;
use crate::game::entity::{Entity, EntityKind};
use crate::util::vec2::Vec2;

/// Speed-capped acceleration.
///
/// Acceleration that would speed the body up is scaled by
/// `sqrt(1 - |v|²/max²)`, so speed approaches `max_speed` asymptotically.
/// The returned velocity points along the undamped candidate and carries the
/// damped magnitude. Thrust that slows the body is never damped.
pub fn accelerate(velocity: Vec2, direction: Vec2, acceleration: f32, max_speed: f32) -> Vec2 {
    let mut accel = direction * acceleration;
    let candidate = velocity + accel;

    if candidate.length() > velocity.length() {
        let radicand = 1.0 - velocity.length_sq() / (max_speed * max_speed);
        let radicand = if radicand > 0.0 {
            radicand
        } else {
            MIN_DAMPING_RADICAND
        };
        accel *= radicand.sqrt();
    }

    let damped = velocity + accel;
    let speed = damped.length();
    if speed > 0.0 {
        candidate.with_length(speed)
    } else {
        damped
    }
}

/// Direction an entity pushes toward when it thrusts.
///
/// The player sprite's nose points opposite to its stored angle.
#[inline]
pub fn thrust_direction(entity: &Entity) -> Vec2 {
    let facing = Vec2::from_angle(entity.angle);
    if entity.kind == EntityKind::PlayerShip {
        -facing
    } else {
        facing
    }
}

/// Apply one tick of the entity's own thrust
pub fn thrust(entity: &mut Entity) {
    entity.velocity = accelerate(
        entity.velocity,
        thrust_direction(entity),
        entity.acceleration,
        entity.max_speed,
    );
}

/// Advance position by one tick of velocity
#[inline]
pub fn integrate(entity: &mut Entity) {
    entity.position += entity.velocity;
}
