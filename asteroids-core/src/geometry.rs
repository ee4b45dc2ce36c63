use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half-open containment: `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x < self.width
            && position.y >= 0.0
            && position.y < self.height
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(0.0..self.width),
            rng.gen_range(0.0..self.height),
        )
    }

    /// Uniform point on one of the four arena edges.
    pub fn random_edge_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let point = match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..self.width), 0.0),
            1 => Vec2::new(rng.gen_range(0.0..self.width), self.height),
            2 => Vec2::new(0.0, rng.gen_range(0.0..self.height)),
            _ => Vec2::new(self.width, rng.gen_range(0.0..self.height)),
        };
        wrap(point, *self)
    }
}

/// True modulo into `[0, extent)`.
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negative inputs up to exactly `extent`.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[inline]
pub fn wrap(position: Vec2, bounds: Bounds) -> Vec2 {
    Vec2::new(
        wrap_coord(position.x, bounds.width),
        wrap_coord(position.y, bounds.height),
    )
}

#[inline]
pub fn angle_to_direction(angle_degrees: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

#[inline]
pub fn direction_to_angle(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x).to_degrees()
}

/// Unit vector along `v`, or +x when `v` has no usable length.
#[inline]
pub fn normalize_or_fallback(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(Vec2::X)
}

pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    angle_to_direction(rng.gen_range(0.0..360.0))
}

/// Strict point-in-circle test; a point exactly on the rim is outside.
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    point_in_circle(a, b, a_radius + b_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ARENA: Bounds = Bounds::new(960.0, 720.0);

    #[test]
    fn wrap_handles_negative_and_overflowing_coordinates() {
        assert_eq!(wrap(Vec2::new(-10.0, 730.0), ARENA), Vec2::new(950.0, 10.0));
        assert_eq!(wrap(Vec2::new(960.0, 0.0), ARENA), Vec2::new(0.0, 0.0));
        assert_eq!(
            wrap(Vec2::new(-1920.5, -0.5), ARENA),
            Vec2::new(959.5, 719.5)
        );
    }

    #[test]
    fn wrap_is_idempotent_and_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xC0FF_EE00);
        for _ in 0..2_000 {
            let raw = Vec2::new(
                rng.gen_range(-5_000.0..5_000.0),
                rng.gen_range(-5_000.0..5_000.0),
            );
            let once = wrap(raw, ARENA);
            assert!(ARENA.contains(once), "{raw:?} wrapped to {once:?}");
            assert_eq!(wrap(once, ARENA), once);
        }
    }

    #[test]
    fn tiny_negative_coordinate_never_lands_on_the_far_edge() {
        let wrapped = wrap_coord(-1.0e-7, 960.0);
        assert!(wrapped < 960.0, "got {wrapped}");
    }

    #[test]
    fn angle_convention_points_zero_along_x_and_minus_ninety_up() {
        let east = angle_to_direction(0.0);
        assert!((east - Vec2::X).length() < 1e-6);

        let up = angle_to_direction(-90.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-6);

        let back = direction_to_angle(angle_to_direction(135.0));
        assert!((back - 135.0).abs() < 1e-3);
    }

    #[test]
    fn normalize_zero_vector_falls_back_to_x() {
        assert_eq!(normalize_or_fallback(Vec2::ZERO), Vec2::X);
        let n = normalize_or_fallback(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_on_rim_is_not_inside() {
        let center = Vec2::new(100.0, 100.0);
        assert!(point_in_circle(Vec2::new(145.9, 100.0), center, 46.0));
        assert!(!point_in_circle(Vec2::new(146.0, 100.0), center, 46.0));
        assert!(!circles_overlap(Vec2::new(0.0, 0.0), 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(circles_overlap(Vec2::new(0.0, 0.0), 10.0, Vec2::new(19.5, 0.0), 10.0));
    }

    #[test]
    fn edge_points_lie_on_an_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..500 {
            let p = ARENA.random_edge_point(&mut rng);
            assert!(ARENA.contains(p));
            assert!(p.x == 0.0 || p.y == 0.0, "not on an edge: {p:?}");
        }
    }
}
