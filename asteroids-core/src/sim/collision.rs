use crate::entities::{Asteroid, Bullet, Ship, Ufo};
use crate::geometry::{circles_overlap, point_in_circle};

/// Player bullets test against the asteroid radius alone.
#[inline]
pub(super) fn bullet_hits_asteroid(bullet: &Bullet, asteroid: &Asteroid) -> bool {
    point_in_circle(bullet.pos(), asteroid.pos(), asteroid.radius())
}

#[inline]
pub(super) fn ship_hits_asteroid(ship: &Ship, asteroid: &Asteroid) -> bool {
    circles_overlap(ship.pos(), ship.radius(), asteroid.pos(), asteroid.radius())
}

#[inline]
pub(super) fn ship_hits_ufo(ship: &Ship, ufo: &Ufo) -> bool {
    circles_overlap(ship.pos(), ship.radius(), ufo.pos(), ufo.radius())
}

#[inline]
pub(super) fn ship_hits_bullet(ship: &Ship, bullet: &Bullet) -> bool {
    circles_overlap(ship.pos(), ship.radius(), bullet.pos(), bullet.radius())
}

#[inline]
pub(super) fn bullet_hits_ufo(bullet: &Bullet, ufo: &Ufo) -> bool {
    circles_overlap(bullet.pos(), bullet.radius(), ufo.pos(), ufo.radius())
}

#[inline]
pub(super) fn ufo_hits_asteroid(ufo: &Ufo, asteroid: &Asteroid) -> bool {
    circles_overlap(ufo.pos(), ufo.radius(), asteroid.pos(), asteroid.radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::entities::AsteroidSize;
    use crate::geometry::Bounds;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn asteroid_at(pos: Vec2, size: AsteroidSize) -> Asteroid {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        Asteroid::new(pos, Vec2::ZERO, size, &mut rng)
    }

    #[test]
    fn bullet_vs_asteroid_ignores_bullet_radius() {
        let asteroid = asteroid_at(Vec2::new(100.0, 100.0), AsteroidSize::Large);
        let radius = AsteroidSize::Large.radius();

        let inside = Bullet::new(Vec2::new(100.0 + radius - 0.5, 100.0), Vec2::ZERO);
        let on_rim = Bullet::new(Vec2::new(100.0 + radius, 100.0), Vec2::ZERO);
        // Would touch if the bullet's own radius counted.
        let grazing = Bullet::new(Vec2::new(100.0 + radius + 1.0, 100.0), Vec2::ZERO);

        assert!(bullet_hits_asteroid(&inside, &asteroid));
        assert!(!bullet_hits_asteroid(&on_rim, &asteroid));
        assert!(!bullet_hits_asteroid(&grazing, &asteroid));
    }

    #[test]
    fn ship_pairs_use_sum_of_radii() {
        let ship = Ship::new(Vec2::new(200.0, 200.0));
        let reach = ship.radius() + AsteroidSize::Small.radius();

        let touching = asteroid_at(Vec2::new(200.0 + reach - 0.25, 200.0), AsteroidSize::Small);
        let apart = asteroid_at(Vec2::new(200.0 + reach, 200.0), AsteroidSize::Small);
        assert!(ship_hits_asteroid(&ship, &touching));
        assert!(!ship_hits_asteroid(&ship, &apart));

        let bullet = Bullet::new(Vec2::new(200.0, 200.0 + ship.radius() + 1.0), Vec2::ZERO);
        assert!(ship_hits_bullet(&ship, &bullet));
    }

    #[test]
    fn ufo_pairs_use_sum_of_radii() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut audio = NullAudio::default();
        let ufo = Ufo::new(
            Vec2::new(300.0, 300.0),
            false,
            None,
            Bounds::new(960.0, 720.0),
            &mut rng,
            &mut audio,
        );

        let bullet = Bullet::new(Vec2::new(300.0 + ufo.radius() + 1.0, 300.0), Vec2::ZERO);
        assert!(bullet_hits_ufo(&bullet, &ufo));

        let reach = ufo.radius() + AsteroidSize::Medium.radius();
        let near = asteroid_at(Vec2::new(300.0, 300.0 + reach - 1.0), AsteroidSize::Medium);
        let far = asteroid_at(Vec2::new(300.0, 300.0 + reach + 1.0), AsteroidSize::Medium);
        assert!(ufo_hits_asteroid(&ufo, &near));
        assert!(!ufo_hits_asteroid(&ufo, &far));

        let ship = Ship::new(Vec2::new(300.0 + ufo.radius(), 300.0));
        assert!(ship_hits_ufo(&ship, &ufo));
    }
}
