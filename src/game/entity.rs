//! Entity record and archetype constructors.
//!
//! Every object in the world shares one flat record. Archetype-specific
//! timers and counters live in [`Brain`], and behaviour is selected by
//! [`EntityKind`].

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    asteroid, enemy_base, home_base, player, projectile, puffer, quad_blaster, sludger,
    sludger_mine,
};
use crate::util::vec2::Vec2;

/// Unique entity identifier, allocated by the world on spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Player photon
    PhotonSmall,
    PufferShot,
    QuadBlasterShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    Pebbles,
    Rocko,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    PlayerShip,
    Projectile(ProjectileKind),
    Asteroid(AsteroidKind),
    Sludger,
    SludgerMine,
    Puffer,
    QuadBlaster,
    EnemyBase,
    Star,
    Base,
}

impl EntityKind {
    pub fn is_projectile(self) -> bool {
        matches!(self, EntityKind::Projectile(_))
    }

    /// Hostile ships and structures driven by an AI controller
    pub fn is_ai_controlled(self) -> bool {
        matches!(
            self,
            EntityKind::Sludger
                | EntityKind::SludgerMine
                | EntityKind::Puffer
                | EntityKind::QuadBlaster
                | EntityKind::EnemyBase
        )
    }

    /// Counted toward the victory condition
    pub fn is_enemy(self) -> bool {
        self.is_ai_controlled() && self != EntityKind::EnemyBase
    }

    /// Whether the entity integrates its own velocity each tick
    pub fn is_mobile(self) -> bool {
        matches!(
            self,
            EntityKind::Projectile(_)
                | EntityKind::Asteroid(_)
                | EntityKind::Sludger
                | EntityKind::SludgerMine
                | EntityKind::Puffer
                | EntityKind::QuadBlaster
        )
    }
}

/// Per-archetype mutable behaviour state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brain {
    Inert,
    Pilot {
        ticks_since_left: u32,
        ticks_since_right: u32,
        ticks_since_shot: u32,
    },
    Projectile {
        age: u32,
        lifetime: u32,
    },
    Sludger {
        ticks_to_mine: u32,
    },
    Homing,
    Puffer {
        fire_timer: f32,
    },
    QuadBlaster {
        fire_timer: f32,
        ticks_to_rotate: u32,
    },
    EnemyBase {
        spawn_ticks: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians
    pub angle: f32,
    /// Zero means immovable in collision response
    pub mass: f32,
    /// Zero disables hit testing
    pub collision_radius: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Sprite extents, used for culling
    pub size: Vec2,
    pub alive: bool,
    pub brain: Brain,
}

impl Entity {
    fn base(kind: EntityKind, position: Vec2, velocity: Vec2, mass: f32, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "collision radius must be non-negative");
        Self {
            id: EntityId(0),
            kind,
            position,
            velocity,
            angle: 0.0,
            mass,
            collision_radius: radius,
            max_speed: 0.0,
            acceleration: 0.0,
            size: Vec2::new(radius * 2.0, radius * 2.0),
            alive: true,
            brain: Brain::Inert,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn player_ship(position: Vec2) -> Self {
        Self {
            angle: player::START_ANGLE,
            max_speed: player::MAX_SPEED,
            acceleration: player::ACCELERATION,
            size: Vec2::new(player::WIDTH, player::HEIGHT),
            brain: Brain::Pilot {
                ticks_since_left: 0,
                ticks_since_right: 0,
                ticks_since_shot: 0,
            },
            ..Self::base(
                EntityKind::PlayerShip,
                position,
                Vec2::ZERO,
                player::MASS,
                player::RADIUS,
            )
        }
    }

    pub fn projectile(kind: ProjectileKind, position: Vec2, velocity: Vec2) -> Self {
        let radius = match kind {
            ProjectileKind::PhotonSmall => projectile::PHOTON_RADIUS,
            ProjectileKind::PufferShot => projectile::PUFFER_SHOT_RADIUS,
            ProjectileKind::QuadBlasterShot => projectile::QUAD_SHOT_RADIUS,
        };
        Self {
            angle: velocity.angle(),
            brain: Brain::Projectile {
                age: 0,
                lifetime: projectile::LIFETIME,
            },
            ..Self::base(
                EntityKind::Projectile(kind),
                position,
                velocity,
                projectile::MASS,
                radius,
            )
        }
    }

    pub fn asteroid(kind: AsteroidKind, position: Vec2, velocity: Vec2) -> Self {
        let (mass, radius) = match kind {
            AsteroidKind::Pebbles => (asteroid::PEBBLES_MASS, asteroid::PEBBLES_RADIUS),
            AsteroidKind::Rocko => (asteroid::ROCKO_MASS, asteroid::ROCKO_RADIUS),
        };
        Self::base(EntityKind::Asteroid(kind), position, velocity, mass, radius)
    }

    pub fn sludger(position: Vec2, velocity: Vec2) -> Self {
        Self {
            max_speed: sludger::MAX_SPEED,
            acceleration: sludger::ACCELERATION,
            brain: Brain::Sludger { ticks_to_mine: 0 },
            ..Self::base(
                EntityKind::Sludger,
                position,
                velocity,
                sludger::MASS,
                sludger::RADIUS,
            )
        }
    }

    pub fn sludger_mine(position: Vec2) -> Self {
        Self {
            max_speed: sludger_mine::MAX_SPEED,
            acceleration: sludger_mine::ACCELERATION,
            brain: Brain::Homing,
            ..Self::base(
                EntityKind::SludgerMine,
                position,
                Vec2::ZERO,
                sludger_mine::MASS,
                sludger_mine::RADIUS,
            )
        }
    }

    pub fn puffer(position: Vec2, velocity: Vec2) -> Self {
        Self {
            max_speed: puffer::MAX_SPEED,
            acceleration: puffer::ACCELERATION,
            brain: Brain::Puffer { fire_timer: 0.0 },
            ..Self::base(
                EntityKind::Puffer,
                position,
                velocity,
                puffer::MASS,
                puffer::RADIUS,
            )
        }
    }

    pub fn quad_blaster(position: Vec2, velocity: Vec2) -> Self {
        Self {
            brain: Brain::QuadBlaster {
                fire_timer: 0.0,
                ticks_to_rotate: 0,
            },
            ..Self::base(
                EntityKind::QuadBlaster,
                position,
                velocity,
                quad_blaster::MASS,
                quad_blaster::RADIUS,
            )
        }
    }

    pub fn enemy_base() -> Self {
        Self {
            brain: Brain::EnemyBase { spawn_ticks: 0 },
            ..Self::base(
                EntityKind::EnemyBase,
                Vec2::new(enemy_base::X, enemy_base::Y),
                Vec2::ZERO,
                0.0,
                enemy_base::RADIUS,
            )
        }
    }

    pub fn home_base(position: Vec2) -> Self {
        Self::base(
            EntityKind::Base,
            position,
            Vec2::ZERO,
            0.0,
            home_base::RADIUS,
        )
    }

    /// Background star; never collidable
    pub fn star(position: Vec2) -> Self {
        Self {
            size: Vec2::new(3.0, 3.0),
            ..Self::base(EntityKind::Star, position, Vec2::ZERO, 0.0, 0.0)
        }
    }

    /// Immovable entities keep their velocity through collisions
    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.mass <= 0.0
    }
}
