use crate::game::entity::{Brain, Entity};

/// Age a projectile by one tick, expiring it once its lifetime is used up.
/// Returns true if the projectile expired this tick.
pub fn age(entity: &mut Entity) -> bool {
    let Brain::Projectile { age, lifetime } = &mut entity.brain else {
        return false;
    };

    *age += 1;
    if *age >= *lifetime {
        entity.alive = false;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::projectile::LIFETIME;
    use crate::game::entity::ProjectileKind;
    use crate::util::vec2::Vec2;

    #[test]
    fn test_projectile_expires_after_lifetime() {
        let mut shot =
            Entity::projectile(ProjectileKind::PhotonSmall, Vec2::ZERO, Vec2::new(10.0, 0.0));
        for _ in 0..LIFETIME - 1 {
            assert!(!age(&mut shot));
        }
        assert!(shot.alive);
        assert!(age(&mut shot));
        assert!(!shot.alive);
    }

    #[test]
    fn test_non_projectiles_do_not_age() {
        let mut mine = Entity::sludger_mine(Vec2::ZERO);
        for _ in 0..100 {
            assert!(!age(&mut mine));
        }
        assert!(mine.alive);
    }
}
