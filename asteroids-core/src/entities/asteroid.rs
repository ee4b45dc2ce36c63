use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::constants::{
    AST_JITTER_MAX, AST_JITTER_MIN, AST_POINTS_LARGE, AST_POINTS_MEDIUM, AST_POINTS_SMALL,
    AST_RADIUS_LARGE, AST_RADIUS_MEDIUM, AST_RADIUS_SMALL, AST_SPLIT_COUNT,
    SCORE_LARGE_ASTEROID, SCORE_MEDIUM_ASTEROID, SCORE_SMALL_ASTEROID,
};
use crate::geometry::{angle_to_direction, wrap, Bounds};

/// Ordered by physical size, so `Small < Medium < Large`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Small,
    Medium,
    Large,
}

impl AsteroidSize {
    #[inline]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Large => AST_RADIUS_LARGE,
            Self::Medium => AST_RADIUS_MEDIUM,
            Self::Small => AST_RADIUS_SMALL,
        }
    }

    #[inline]
    pub const fn score(self) -> u32 {
        match self {
            Self::Large => SCORE_LARGE_ASTEROID,
            Self::Medium => SCORE_MEDIUM_ASTEROID,
            Self::Small => SCORE_SMALL_ASTEROID,
        }
    }

    /// Size of the fragments this size breaks into.
    #[inline]
    pub const fn fragment(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }

    #[inline]
    pub const fn fragment_count(self) -> usize {
        match self.fragment() {
            Some(_) => AST_SPLIT_COUNT,
            None => 0,
        }
    }

    #[inline]
    pub const fn outline_points(self) -> usize {
        match self {
            Self::Large => AST_POINTS_LARGE,
            Self::Medium => AST_POINTS_MEDIUM,
            Self::Small => AST_POINTS_SMALL,
        }
    }

    #[inline]
    pub const fn break_cue(self) -> Cue {
        match self {
            Self::Large => Cue::BreakLarge,
            Self::Medium | Self::Small => Cue::BreakMedium,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) size: AsteroidSize,
    pub(crate) outline: Vec<Vec2>,
    pub(crate) alive: bool,
}

impl Asteroid {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, vel: Vec2, size: AsteroidSize, rng: &mut R) -> Self {
        Self {
            pos,
            vel,
            size,
            outline: Self::jagged_outline(size, rng),
            alive: true,
        }
    }

    /// Evenly spaced spokes, each stretched by its own random factor. Drawn
    /// only; hits use the size's canonical radius.
    fn jagged_outline<R: Rng + ?Sized>(size: AsteroidSize, rng: &mut R) -> Vec<Vec2> {
        let points = size.outline_points();
        let step = 360.0 / points as f32;
        (0..points)
            .map(|i| {
                let jitter = rng.gen_range(AST_JITTER_MIN..AST_JITTER_MAX);
                angle_to_direction(i as f32 * step) * (size.radius() * jitter)
            })
            .collect()
    }

    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        self.pos = wrap(self.pos + self.vel * dt, bounds);
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
    pub fn size(&self) -> AsteroidSize {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.radius()
    }

    #[inline]
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    pub fn world_outline(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.outline.iter().map(move |offset| self.pos + *offset)
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
