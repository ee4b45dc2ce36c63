use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entities::{Asteroid, AsteroidSize, Bullet, Ship, Ufo};

mod collision;
mod world;

pub use world::{World, WorldStats};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub cooldown: f32,
    pub invulnerable: f32,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub ttl: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UfoSnapshot {
    pub pos: Vec2,
    pub dir: Vec2,
    pub radius: f32,
    pub small: bool,
    pub shoot_timer: f32,
    pub engine_sound: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame_count: u64,
    pub score: u32,
    pub lives: i32,
    pub wave: u32,
    pub wave_cool: f32,
    pub safe_spawn: f32,
    pub ufo_timer: f32,
    pub width: f32,
    pub height: f32,
    pub ship: ShipSnapshot,
    pub bullets: Vec<BulletSnapshot>,
    pub enemy_bullets: Vec<BulletSnapshot>,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub ufos: Vec<UfoSnapshot>,
}

impl ShipSnapshot {
    fn of(ship: &Ship) -> Self {
        Self {
            pos: ship.pos(),
            vel: ship.vel(),
            angle: ship.angle(),
            radius: ship.radius(),
            cooldown: ship.cooldown(),
            invulnerable: ship.invulnerable(),
            alive: ship.is_alive(),
        }
    }
}

impl BulletSnapshot {
    fn of(bullet: &Bullet) -> Self {
        Self {
            pos: bullet.pos(),
            vel: bullet.vel(),
            radius: bullet.radius(),
            ttl: bullet.ttl(),
        }
    }
}

impl AsteroidSnapshot {
    fn of(asteroid: &Asteroid) -> Self {
        Self {
            pos: asteroid.pos(),
            vel: asteroid.vel(),
            size: asteroid.size(),
            radius: asteroid.radius(),
        }
    }
}

impl UfoSnapshot {
    fn of(ufo: &Ufo) -> Self {
        Self {
            pos: ufo.pos(),
            dir: ufo.dir(),
            radius: ufo.radius(),
            small: ufo.is_small(),
            shoot_timer: ufo.shoot_timer(),
            engine_sound: ufo.has_engine_sound(),
        }
    }
}

/// Borrowed view of one live entity, for drawing.
#[derive(Clone, Copy, Debug)]
pub enum EntityView<'a> {
    Ship(&'a Ship),
    Bullet(&'a Bullet),
    EnemyBullet(&'a Bullet),
    Asteroid(&'a Asteroid),
    Ufo(&'a Ufo),
}

impl EntityView<'_> {
    pub fn pos(&self) -> Vec2 {
        match self {
            Self::Ship(ship) => ship.pos(),
            Self::Bullet(bullet) | Self::EnemyBullet(bullet) => bullet.pos(),
            Self::Asteroid(asteroid) => asteroid.pos(),
            Self::Ufo(ufo) => ufo.pos(),
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            Self::Ship(ship) => ship.radius(),
            Self::Bullet(bullet) | Self::EnemyBullet(bullet) => bullet.radius(),
            Self::Asteroid(asteroid) => asteroid.radius(),
            Self::Ufo(ufo) => ufo.radius(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ship(_) => "ship",
            Self::Bullet(_) => "bullet",
            Self::EnemyBullet(_) => "enemy_bullet",
            Self::Asteroid(_) => "asteroid",
            Self::Ufo(_) => "ufo",
        }
    }
}

const PRUNE_ASTEROIDS: u8 = 1 << 0;
const PRUNE_BULLETS: u8 = 1 << 1;
const PRUNE_UFOS: u8 = 1 << 2;
const PRUNE_ENEMY_BULLETS: u8 = 1 << 3;

/// Edge samples tried per asteroid before settling for the farthest one.
const WAVE_SPAWN_ATTEMPTS: usize = 64;
