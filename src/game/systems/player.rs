use crate::game::constants::{player, projectile};
use crate::game::entity::{Brain, Entity, ProjectileKind};
use crate::game::interfaces::{InputSource, Key};
use crate::game::state::SpawnQueue;
use crate::game::systems::{ai::wrap_angle, motion};

/// What the ship did this tick that the world has to act on
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PilotReport {
    pub fired: bool,
}

/// Apply held keys to the player ship.
///
/// Thrust is applied every tick UP is held. Rotation and firing are rate
/// limited by per-action tick counters.
pub fn process_input(
    ship: &mut Entity,
    input: &dyn InputSource,
    spawns: &mut SpawnQueue,
) -> PilotReport {
    let Brain::Pilot {
        mut ticks_since_left,
        mut ticks_since_right,
        mut ticks_since_shot,
    } = ship.brain
    else {
        return PilotReport::default();
    };

    ticks_since_left += 1;
    ticks_since_right += 1;
    ticks_since_shot += 1;

    if input.is_down(Key::Up) {
        motion::thrust(ship);
    }

    if input.is_down(Key::Left) && ticks_since_left >= player::TICKS_PER_ROTATION {
        ticks_since_left = 0;
        ship.angle = wrap_angle(ship.angle - player::ROTATION_STEP);
    }

    if input.is_down(Key::Right) && ticks_since_right >= player::TICKS_PER_ROTATION {
        ticks_since_right = 0;
        ship.angle = wrap_angle(ship.angle + player::ROTATION_STEP);
    }

    let mut report = PilotReport::default();
    if input.is_down(Key::Space) && ticks_since_shot >= player::TICKS_PER_SHOT {
        ticks_since_shot = 0;
        let nose = motion::thrust_direction(ship);
        spawns.push(Entity::projectile(
            ProjectileKind::PhotonSmall,
            ship.position + nose * ship.collision_radius,
            ship.velocity + nose * projectile::SPEED,
        ));
        report.fired = true;
    }

    ship.brain = Brain::Pilot {
        ticks_since_left,
        ticks_since_right,
        ticks_since_shot,
    };
    report
}
