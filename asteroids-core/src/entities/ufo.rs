use glam::Vec2;
use rand::Rng;

use crate::audio::{AudioSink, ChannelId, EngineChannel, EngineSound};
use crate::constants::{
    SCORE_BIG_UFO, SCORE_SMALL_UFO, UFO_AIM_ERROR, UFO_BIG_COURSE_JITTER, UFO_BULLET_SPEED,
    UFO_FIRE_RATE_BIG, UFO_FIRE_RATE_SMALL, UFO_FIRST_SHOT_MAX, UFO_MUZZLE_GAP, UFO_RADIUS_BIG,
    UFO_RADIUS_SMALL, UFO_SMALL_COURSE_JITTER, UFO_SPEED,
};
use crate::entities::Bullet;
use crate::geometry::{angle_to_direction, direction_to_angle, normalize_or_fallback, wrap, Bounds};

#[derive(Debug)]
pub struct Ufo {
    pub(crate) pos: Vec2,
    pub(crate) dir: Vec2,
    pub(crate) speed: f32,
    pub(crate) small: bool,
    pub(crate) radius: f32,
    pub(crate) shoot_timer: f32,
    pub(crate) shoot_delay: f32,
    pub(crate) engine: EngineChannel,
    pub(crate) alive: bool,
}

impl Ufo {
    pub fn new<R, A>(
        pos: Vec2,
        small: bool,
        target: Option<Vec2>,
        bounds: Bounds,
        rng: &mut R,
        audio: &mut A,
    ) -> Self
    where
        R: Rng + ?Sized,
        A: AudioSink + ?Sized,
    {
        let dir = match target {
            Some(target) if small => {
                let mut course = normalize_or_fallback(target - pos);
                course.x += rng.gen_range(-UFO_SMALL_COURSE_JITTER..UFO_SMALL_COURSE_JITTER);
                course.y += rng.gen_range(-UFO_SMALL_COURSE_JITTER..UFO_SMALL_COURSE_JITTER);
                normalize_or_fallback(course)
            }
            _ => {
                let heading_x = if pos.x < bounds.width / 2.0 { 1.0 } else { -1.0 };
                let drift_y = rng.gen_range(-UFO_BIG_COURSE_JITTER..UFO_BIG_COURSE_JITTER);
                normalize_or_fallback(Vec2::new(heading_x, drift_y))
            }
        };

        let shoot_timer = rng.gen_range(0.0..UFO_FIRST_SHOT_MAX);
        let (radius, shoot_delay, sound) = if small {
            (UFO_RADIUS_SMALL, UFO_FIRE_RATE_SMALL, EngineSound::SmallUfo)
        } else {
            (UFO_RADIUS_BIG, UFO_FIRE_RATE_BIG, EngineSound::BigUfo)
        };

        Self {
            pos: wrap(pos, bounds),
            dir,
            speed: UFO_SPEED,
            small,
            radius,
            shoot_timer,
            shoot_delay,
            engine: EngineChannel::acquire(audio, sound),
            alive: true,
        }
    }

    /// Small saucers aim at `target` with a few degrees of error; big ones,
    /// and small ones with nothing to aim at, shoot in a random direction.
    pub fn fire<R: Rng + ?Sized>(&mut self, target: Option<Vec2>, rng: &mut R) -> Option<Bullet> {
        if self.shoot_timer > 0.0 {
            return None;
        }
        self.shoot_timer = self.shoot_delay;

        let angle = match target {
            Some(target) if self.small => {
                direction_to_angle(target - self.pos)
                    + rng.gen_range(-UFO_AIM_ERROR..UFO_AIM_ERROR)
            }
            _ => rng.gen_range(0.0..360.0),
        };
        let direction = angle_to_direction(angle);
        let pos = self.pos + direction * (self.radius + UFO_MUZZLE_GAP);
        Some(Bullet::new(pos, direction * UFO_BULLET_SPEED))
    }

    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        self.pos = wrap(self.pos + self.dir * self.speed * dt, bounds);
        if self.shoot_timer > 0.0 {
            self.shoot_timer -= dt;
        }
    }

    /// Marks the saucer dead and hands its engine channel back. Safe to call
    /// more than once; only the first call reaches the sink.
    pub(crate) fn destroy<A: AudioSink + ?Sized>(&mut self, audio: &mut A) -> bool {
        self.alive = false;
        self.engine.release(audio)
    }

    #[inline]
    pub fn score(&self) -> u32 {
        if self.small {
            SCORE_SMALL_UFO
        } else {
            SCORE_BIG_UFO
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn is_small(&self) -> bool {
        self.small
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn shoot_timer(&self) -> f32 {
        self.shoot_timer
    }

    #[inline]
    pub fn engine_channel(&self) -> Option<ChannelId> {
        self.engine.channel()
    }

    #[inline]
    pub fn has_engine_sound(&self) -> bool {
        self.engine.is_active()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ARENA: Bounds = Bounds::new(960.0, 720.0);

    fn spawn(small: bool, pos: Vec2, target: Option<Vec2>, seed: u64) -> (Ufo, RecordingAudio) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut audio = RecordingAudio::default();
        let ufo = Ufo::new(pos, small, target, ARENA, &mut rng, &mut audio);
        (ufo, audio)
    }

    #[test]
    fn big_ufo_heads_away_from_its_spawn_side() {
        for seed in 0..32 {
            let (left, _) = spawn(false, Vec2::new(0.0, 300.0), Some(ARENA.center()), seed);
            let (right, _) = spawn(false, Vec2::new(960.0, 300.0), Some(ARENA.center()), seed);
            assert!(left.dir().x > 0.0);
            assert!(right.dir().x < 0.0);
            assert!((left.dir().length() - 1.0).abs() < 1e-5);
            assert!(left.dir().y.abs() < left.dir().x.abs());
        }
    }

    #[test]
    fn spawn_on_far_edge_is_wrapped_into_the_arena() {
        let (ufo, _) = spawn(false, Vec2::new(960.0, 300.0), None, 1);
        assert!(ARENA.contains(ufo.pos()));
        assert!(ufo.dir().x < 0.0);
    }

    #[test]
    fn small_ufo_biases_toward_its_target() {
        let target = Vec2::new(480.0, 360.0);
        for seed in 0..32 {
            let (ufo, _) = spawn(true, Vec2::new(0.0, 360.0), Some(target), seed);
            let toward = (target - Vec2::new(0.0, 360.0)).normalize();
            assert!(ufo.dir().dot(toward) > 0.9, "seed {seed}: {:?}", ufo.dir());
            assert!((ufo.dir().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn course_is_never_re_aimed() {
        let (mut ufo, _) = spawn(true, Vec2::new(0.0, 100.0), Some(ARENA.center()), 4);
        let course = ufo.dir();
        for _ in 0..120 {
            ufo.update(1.0 / 60.0, ARENA);
        }
        assert_eq!(ufo.dir(), course);
        assert!(ARENA.contains(ufo.pos()));
    }

    #[test]
    fn fire_waits_for_shoot_timer_then_resets_it() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let (mut ufo, _) = spawn(true, Vec2::new(100.0, 100.0), None, 8);
        ufo.shoot_timer = 0.3;
        assert!(ufo.fire(None, &mut rng).is_none());

        ufo.update(0.3, ARENA);
        let bullet = ufo.fire(None, &mut rng).expect("timer elapsed");
        assert_eq!(ufo.shoot_timer(), UFO_FIRE_RATE_SMALL);
        assert!((bullet.vel().length() - UFO_BULLET_SPEED).abs() < 1e-2);
        let gap = bullet.pos().distance(ufo.pos());
        assert!((gap - (UFO_RADIUS_SMALL + UFO_MUZZLE_GAP)).abs() < 1e-3);
    }

    #[test]
    fn small_ufo_aims_within_error_cone() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let (mut ufo, _) = spawn(true, Vec2::new(100.0, 100.0), None, 21);
        let target = Vec2::new(400.0, 100.0);
        for _ in 0..50 {
            ufo.shoot_timer = 0.0;
            let bullet = ufo.fire(Some(target), &mut rng).expect("ready");
            let angle = direction_to_angle(bullet.vel());
            assert!(angle.abs() <= UFO_AIM_ERROR + 1e-3, "angle {angle}");
        }
    }

    #[test]
    fn untargeted_fire_sprays_all_around() {
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        let target = Vec2::new(400.0, 100.0);
        let cases = [
            spawn(false, Vec2::new(100.0, 100.0), None, 33).0,
            spawn(true, Vec2::new(100.0, 100.0), None, 34).0,
        ];

        for (index, mut ufo) in cases.into_iter().enumerate() {
            // Big saucers ignore the target; the small one has none.
            let aim = if index == 0 { Some(target) } else { None };
            let mut quadrants = [false; 4];
            let mut widest = 0.0_f32;
            let mut first = None;
            for _ in 0..200 {
                ufo.shoot_timer = 0.0;
                let bullet = ufo.fire(aim, &mut rng).expect("ready");
                let heading = bullet.vel().normalize();
                let first = *first.get_or_insert(heading);
                widest = widest.max(heading.dot(first).clamp(-1.0, 1.0).acos().to_degrees());
                let quadrant = (direction_to_angle(heading).rem_euclid(360.0) / 90.0) as usize;
                quadrants[quadrant.min(3)] = true;
            }
            assert!(widest > 2.0 * UFO_AIM_ERROR, "case {index}: widest {widest}");
            assert_eq!(quadrants, [true; 4], "case {index}");
        }
    }

    #[test]
    fn engine_channel_is_released_once() {
        let (mut ufo, mut audio) = spawn(false, Vec2::new(0.0, 50.0), None, 2);
        assert!(ufo.has_engine_sound());
        assert_eq!(audio.open_channels(), 1);

        assert!(ufo.destroy(&mut audio));
        assert!(!ufo.destroy(&mut audio));
        assert!(!ufo.is_alive());
        assert_eq!(audio.open_channels(), 0);
        assert_eq!(audio.invalid_stops(), 0);
    }

    #[test]
    fn exhausted_audio_still_spawns_a_silent_ufo() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut audio = RecordingAudio::new(0);
        let mut ufo = Ufo::new(Vec2::new(0.0, 10.0), true, None, ARENA, &mut rng, &mut audio);
        assert!(!ufo.has_engine_sound());
        assert!(!ufo.destroy(&mut audio));
        assert_eq!(audio.invalid_stops(), 0);
    }

    #[test]
    fn score_depends_on_size() {
        let (small, _) = spawn(true, Vec2::ZERO, None, 0);
        let (big, _) = spawn(false, Vec2::ZERO, None, 0);
        assert_eq!(small.score(), SCORE_SMALL_UFO);
        assert_eq!(big.score(), SCORE_BIG_UFO);
        assert!(small.radius() < big.radius());
    }
}
