use glam::Vec2;

use crate::constants::{BULLET_RADIUS, BULLET_TTL};
use crate::geometry::{wrap, Bounds};

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) ttl: f32,
    pub(crate) radius: f32,
    pub(crate) alive: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            ttl: BULLET_TTL,
            radius: BULLET_RADIUS,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        self.pos = wrap(self.pos + self.vel * dt, bounds);
        self.ttl -= dt;
        if self.ttl <= 0.0 {
            self.alive = false;
        }
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
    pub fn ttl(&self) -> f32 {
        self.ttl
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}
