use glam::Vec2;
use rand::Rng;

use crate::constants::{
    SHIP_BULLET_SPEED, SHIP_FIRE_RATE, SHIP_FRICTION, SHIP_HYPERSPACE_INVULNERABLE,
    SHIP_MUZZLE_GAP, SHIP_RADIUS, SHIP_SHIELD_GAP, SHIP_START_ANGLE, SHIP_THRUST,
    SHIP_TURN_SPEED,
};
use crate::entities::Bullet;
use crate::geometry::{angle_to_direction, wrap, Bounds};
use crate::input::FrameInput;

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) angle: f32,
    pub(crate) cooldown: f32,
    pub(crate) invulnerable: f32,
    pub(crate) alive: bool,
    pub(crate) radius: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: SHIP_START_ANGLE,
            cooldown: 0.0,
            invulnerable: 0.0,
            alive: true,
            radius: SHIP_RADIUS,
        }
    }

    /// Steering and thrust for one frame. Drag applies whether or not the
    /// engine is lit.
    pub fn control(&mut self, input: &FrameInput, dt: f32) {
        if input.left {
            self.angle -= SHIP_TURN_SPEED * dt;
        }
        if input.right {
            self.angle += SHIP_TURN_SPEED * dt;
        }
        if input.thrust {
            self.vel += self.heading() * SHIP_THRUST * dt;
        }
        self.vel *= SHIP_FRICTION;
    }

    /// A bullet from just ahead of the nose, or `None` while the gun cools.
    pub fn fire(&mut self) -> Option<Bullet> {
        if self.cooldown > 0.0 {
            return None;
        }

        let direction = self.heading();
        let pos = self.pos + direction * (self.radius + SHIP_MUZZLE_GAP);
        let vel = self.vel + direction * SHIP_BULLET_SPEED;
        self.cooldown = SHIP_FIRE_RATE;
        Some(Bullet::new(pos, vel))
    }

    pub fn hyperspace<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Bounds) {
        self.pos = bounds.random_point(rng);
        self.vel = Vec2::ZERO;
        self.invulnerable = SHIP_HYPERSPACE_INVULNERABLE;
    }

    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.pos = wrap(self.pos + self.vel * dt, bounds);
    }

    pub(crate) fn respawn(&mut self, pos: Vec2, invulnerable: f32) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.angle = SHIP_START_ANGLE;
        self.invulnerable = invulnerable;
        self.alive = true;
    }

    #[inline]
    pub fn heading(&self) -> Vec2 {
        angle_to_direction(self.angle)
    }

    /// Nose, left and right corners of the hull triangle.
    pub fn hull(&self) -> [Vec2; 3] {
        let nose = self.pos + self.heading() * self.radius;
        let left = self.pos + angle_to_direction(self.angle + 140.0) * (self.radius * 0.9);
        let right = self.pos + angle_to_direction(self.angle - 140.0) * (self.radius * 0.9);
        [nose, left, right]
    }

    /// Whether the blinking shield ring is lit this frame.
    #[inline]
    pub fn shield_visible(&self) -> bool {
        self.invulnerable > 0.0 && (self.invulnerable * 10.0) as i32 % 2 == 0
    }

    #[inline]
    pub fn shield_radius(&self) -> f32 {
        self.radius + SHIP_SHIELD_GAP
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    #[inline]
    pub fn invulnerable(&self) -> f32 {
        self.invulnerable
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ARENA: Bounds = Bounds::new(960.0, 720.0);

    fn ship_at_center() -> Ship {
        Ship::new(ARENA.center())
    }

    #[test]
    fn turning_rotates_at_fixed_rate() {
        let mut ship = ship_at_center();
        let left = FrameInput {
            left: true,
            ..FrameInput::IDLE
        };
        ship.control(&left, 0.5);
        assert!((ship.angle() - (SHIP_START_ANGLE - SHIP_TURN_SPEED * 0.5)).abs() < 1e-4);

        let both = FrameInput {
            left: true,
            right: true,
            ..FrameInput::IDLE
        };
        let before = ship.angle();
        ship.control(&both, 0.5);
        assert!((ship.angle() - before).abs() < 1e-4);
    }

    #[test]
    fn thrust_accelerates_along_heading_and_drag_always_applies() {
        let mut ship = ship_at_center();
        let thrust = FrameInput {
            thrust: true,
            ..FrameInput::IDLE
        };
        ship.control(&thrust, 0.1);
        let expected = Vec2::new(0.0, -SHIP_THRUST * 0.1) * SHIP_FRICTION;
        assert!((ship.vel() - expected).length() < 1e-3);

        let coasting = ship.vel();
        ship.control(&FrameInput::IDLE, 0.1);
        assert!((ship.vel() - coasting * SHIP_FRICTION).length() < 1e-5);
        assert!(ship.vel().length() < coasting.length());
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut ship = ship_at_center();
        let bullet = ship.fire().expect("cold gun fires");
        assert_eq!(ship.cooldown(), SHIP_FIRE_RATE);
        assert!(ship.fire().is_none());

        let nose_gap = ship.radius() + SHIP_MUZZLE_GAP;
        assert!((bullet.pos() - (ship.pos() + Vec2::new(0.0, -nose_gap))).length() < 1e-3);
        assert!((bullet.vel() - Vec2::new(0.0, -SHIP_BULLET_SPEED)).length() < 1e-2);

        ship.update(SHIP_FIRE_RATE, ARENA);
        assert_eq!(ship.cooldown(), 0.0);
        assert!(ship.fire().is_some());
    }

    #[test]
    fn bullet_inherits_ship_velocity() {
        let mut ship = ship_at_center();
        ship.vel = Vec2::new(50.0, 0.0);
        let bullet = ship.fire().expect("fires");
        assert!((bullet.vel() - Vec2::new(50.0, -SHIP_BULLET_SPEED)).length() < 1e-2);
    }

    #[test]
    fn timers_clamp_at_zero() {
        let mut ship = ship_at_center();
        ship.cooldown = 0.05;
        ship.invulnerable = 0.05;
        ship.update(1.0, ARENA);
        assert_eq!(ship.cooldown(), 0.0);
        assert_eq!(ship.invulnerable(), 0.0);
    }

    #[test]
    fn hyperspace_stops_the_ship_and_grants_invulnerability() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ship = ship_at_center();
        ship.vel = Vec2::new(120.0, 40.0);
        ship.hyperspace(&mut rng, ARENA);
        assert_eq!(ship.vel(), Vec2::ZERO);
        assert!(ARENA.contains(ship.pos()));
        assert_eq!(ship.invulnerable(), SHIP_HYPERSPACE_INVULNERABLE);
    }

    #[test]
    fn shield_blinks_while_invulnerable() {
        let mut ship = ship_at_center();
        assert!(!ship.shield_visible());
        ship.invulnerable = 0.25;
        assert!(ship.shield_visible());
        ship.invulnerable = 0.15;
        assert!(!ship.shield_visible());
        assert_eq!(ship.shield_radius(), SHIP_RADIUS + SHIP_SHIELD_GAP);
    }

    #[test]
    fn hull_nose_leads_along_the_heading() {
        let mut ship = ship_at_center();
        ship.angle = 30.0;
        let [nose, left, right] = ship.hull();
        assert!((nose - (ship.pos() + ship.heading() * ship.radius())).length() < 1e-4);
        for corner in [left, right] {
            assert!((corner.distance(ship.pos()) - ship.radius() * 0.9).abs() < 1e-4);
            assert!((corner - ship.pos()).dot(ship.heading()) < 0.0);
        }
    }
}
