use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::*;
use crate::audio::{AudioSink, Cue, NullAudio};
use crate::config::WorldConfig;
use crate::constants::{
    AST_SPLIT_SPEED_SCALE, AST_VEL_MAX, AST_VEL_MIN, BULLET_TTL, SAFE_SPAWN_INVULNERABLE,
    SHIP_FIRE_RATE, UFO_SMALL_CHANCE, WAVE_BASE_ASTEROIDS, WAVE_SPAWN_CLEARANCE,
};
use crate::error::{ConfigError, RuleCode};
use crate::geometry::{random_unit, wrap, Bounds};
use crate::input::FrameInput;

/// Session counters that survive a full reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub shots_fired: u32,
    pub asteroids_split: u32,
    pub ufos_shot: u32,
    pub ufos_crashed: u32,
    pub deaths: u32,
    pub resets: u32,
}

pub struct World<A: AudioSink = NullAudio> {
    config: WorldConfig,
    bounds: Bounds,
    rng: ChaCha8Rng,
    audio: A,
    pub(super) ship: Ship,
    pub(super) bullets: Vec<Bullet>,
    pub(super) enemy_bullets: Vec<Bullet>,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) ufos: Vec<Ufo>,
    prune_mask: u8,
    pub(super) score: u32,
    pub(super) lives: i32,
    pub(super) wave: u32,
    pub(super) wave_cool: f32,
    pub(super) safe: f32,
    pub(super) ufo_timer: f32,
    frame_count: u64,
    stats: WorldStats,
}

impl World<NullAudio> {
    pub fn with_seed(seed: u64) -> Self {
        Self::build(WorldConfig::with_seed(seed), NullAudio::default())
    }
}

impl<A: AudioSink> World<A> {
    pub fn new(config: WorldConfig, audio: A) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, audio))
    }

    fn build(config: WorldConfig, audio: A) -> Self {
        let bounds = config.bounds();
        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            audio,
            ship: Ship::new(bounds.center()),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            asteroids: Vec::new(),
            ufos: Vec::new(),
            prune_mask: 0,
            score: 0,
            lives: config.start_lives,
            wave: 0,
            wave_cool: config.wave_delay,
            safe: config.safe_spawn_time,
            ufo_timer: config.ufo_spawn_every,
            frame_count: 0,
            stats: WorldStats::default(),
            bounds,
            config,
        };
        world.start_wave();
        world
    }

    /// Driver convenience: fire and hyperspace requests first, then one
    /// [`update`](Self::update).
    pub fn step(&mut self, dt: f32, input: FrameInput) {
        if input.fire {
            self.try_fire();
        }
        if input.hyperspace {
            self.hyperspace();
        }
        self.update(dt, &input);
    }

    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        self.frame_count += 1;
        let bounds = self.bounds;

        self.ship.control(input, dt);
        self.ship.update(dt, bounds);
        self.update_entities(dt);
        self.fire_ufos();

        if self.safe > 0.0 {
            self.safe -= dt;
            self.ship.invulnerable = SAFE_SPAWN_INVULNERABLE;
        } else {
            self.ship.invulnerable = (self.ship.invulnerable - dt).max(0.0);
        }

        self.ufo_timer -= dt;
        if self.ufo_timer <= 0.0 {
            self.spawn_ufo();
            self.ufo_timer = self.config.ufo_spawn_every;
        }

        self.handle_collisions();
        self.prune_destroyed_entities();

        if self.asteroids.is_empty() {
            if self.wave_cool <= 0.0 {
                self.start_wave();
                self.wave_cool = self.config.wave_delay;
            } else {
                self.wave_cool -= dt;
            }
        }
    }

    /// Fires a player bullet unless the in-flight cap is reached or the gun is
    /// cooling. Returns whether a bullet left the ship.
    pub fn try_fire(&mut self) -> bool {
        if self.bullets.len() >= self.config.max_bullets {
            return false;
        }
        let Some(mut bullet) = self.ship.fire() else {
            return false;
        };

        bullet.pos = wrap(bullet.pos, self.bounds);
        self.bullets.push(bullet);
        self.audio.play(Cue::Shot);
        self.stats.shots_fired += 1;
        true
    }

    pub fn hyperspace(&mut self) -> bool {
        if !self.ship.alive {
            return false;
        }
        self.ship.hyperspace(&mut self.rng, self.bounds);
        true
    }

    /// Bumps the wave number and launches `base + wave` large asteroids from
    /// the arena edges, keeping clear of the ship.
    pub fn start_wave(&mut self) {
        self.wave += 1;
        let count = WAVE_BASE_ASTEROIDS + self.wave as usize;

        for _ in 0..count {
            let pos = self.wave_spawn_point();
            let speed = self.rng.gen_range(AST_VEL_MIN..AST_VEL_MAX);
            let vel = random_unit(&mut self.rng) * speed;
            self.spawn_asteroid(pos, vel, AsteroidSize::Large);
        }

        debug!(wave = self.wave, count, "wave started");
    }

    fn wave_spawn_point(&mut self) -> Vec2 {
        let ship = self.ship.pos;
        let clearance_sq = WAVE_SPAWN_CLEARANCE * WAVE_SPAWN_CLEARANCE;

        let mut best = self.bounds.random_edge_point(&mut self.rng);
        for _ in 1..WAVE_SPAWN_ATTEMPTS {
            if best.distance_squared(ship) >= clearance_sq {
                return best;
            }
            let candidate = self.bounds.random_edge_point(&mut self.rng);
            if candidate.distance_squared(ship) > best.distance_squared(ship) {
                best = candidate;
            }
        }
        best
    }

    pub fn spawn_asteroid(&mut self, pos: Vec2, vel: Vec2, size: AsteroidSize) {
        let asteroid = Asteroid::new(wrap(pos, self.bounds), vel, size, &mut self.rng);
        self.asteroids.push(asteroid);
    }

    /// Launches a saucer from the left or right edge, small or big at even
    /// odds, biased toward the ship or the arena centre when it is down.
    pub fn spawn_ufo(&mut self) {
        let small = self.rng.gen_bool(UFO_SMALL_CHANCE);
        let y = self.rng.gen_range(0.0..self.bounds.height);
        let x = if self.rng.gen_bool(0.5) {
            0.0
        } else {
            self.bounds.width
        };
        let target = if self.ship.alive {
            self.ship.pos
        } else {
            self.bounds.center()
        };

        let ufo = Ufo::new(
            Vec2::new(x, y),
            small,
            Some(target),
            self.bounds,
            &mut self.rng,
            &mut self.audio,
        );
        debug!(small, pos = ?ufo.pos(), silent = !ufo.has_engine_sound(), "ufo spawned");
        self.ufos.push(ufo);
    }

    /// Kills the ship once. Respawns it at the centre while lives remain,
    /// otherwise resets the whole session.
    pub fn ship_die(&mut self) {
        if !self.ship.alive {
            return;
        }

        self.audio.play(Cue::BreakLarge);
        self.lives -= 1;
        self.ship.alive = false;
        self.stats.deaths += 1;
        debug!(lives = self.lives, pos = ?self.ship.pos, "ship destroyed");

        if self.lives >= 0 {
            self.ship
                .respawn(self.bounds.center(), self.config.safe_spawn_time);
            self.safe = self.config.safe_spawn_time;
            debug!(lives = self.lives, "ship respawned");
        } else {
            self.reset();
        }
    }

    /// Rebuilds the session in place: engines released, collections cleared,
    /// fresh ship, counters back to their starting values, wave 1 launched.
    /// The random stream carries on.
    pub fn reset(&mut self) {
        let released = self.release_engines();

        self.bullets.clear();
        self.enemy_bullets.clear();
        self.asteroids.clear();
        self.ufos.clear();
        self.prune_mask = 0;

        self.ship = Ship::new(self.bounds.center());
        self.score = 0;
        self.lives = self.config.start_lives;
        self.wave = 0;
        self.wave_cool = self.config.wave_delay;
        self.safe = self.config.safe_spawn_time;
        self.ufo_timer = self.config.ufo_spawn_every;
        self.stats.resets += 1;

        debug!(resets = self.stats.resets, released, "world reset");
        self.start_wave();
    }

    fn release_engines(&mut self) -> usize {
        let mut released = 0;
        for ufo in &mut self.ufos {
            if ufo.destroy(&mut self.audio) {
                released += 1;
            }
        }
        released
    }

    fn update_entities(&mut self, dt: f32) {
        let bounds = self.bounds;

        for bullet in &mut self.bullets {
            bullet.update(dt, bounds);
            if !bullet.alive {
                self.prune_mask |= PRUNE_BULLETS;
            }
        }
        for bullet in &mut self.enemy_bullets {
            bullet.update(dt, bounds);
            if !bullet.alive {
                self.prune_mask |= PRUNE_ENEMY_BULLETS;
            }
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(dt, bounds);
        }
        for ufo in &mut self.ufos {
            ufo.update(dt, bounds);
        }
    }

    fn fire_ufos(&mut self) {
        let target = self.ship.alive.then_some(self.ship.pos);
        for ufo in &mut self.ufos {
            if !ufo.alive {
                continue;
            }
            if let Some(mut bullet) = ufo.fire(target, &mut self.rng) {
                bullet.pos = wrap(bullet.pos, self.bounds);
                self.enemy_bullets.push(bullet);
            }
        }
    }

    fn handle_collisions(&mut self) {
        let asteroid_hits = self.collide_bullets_with_asteroids();
        let ship_hit = self.ship.invulnerable <= 0.0 && self.safe <= 0.0 && self.collide_ship();
        let ufos_shot = self.collide_bullets_with_ufos();
        let ufos_crashed = self.collide_ufos_with_asteroids();

        if asteroid_hits + ufos_shot + ufos_crashed > 0 || ship_hit {
            trace!(
                frame = self.frame_count,
                asteroid_hits,
                ship_hit,
                ufos_shot,
                ufos_crashed,
                score = self.score,
                "collisions resolved"
            );
        }
    }

    fn collide_bullets_with_asteroids(&mut self) -> usize {
        // Fragments spawned by this pass are not tested until next frame.
        let scanned = self.asteroids.len();
        let mut struck = Vec::new();

        for asteroid_index in 0..scanned {
            let asteroid = &self.asteroids[asteroid_index];
            if !asteroid.alive {
                continue;
            }

            let mut hit = false;
            for bullet in &mut self.bullets {
                if bullet.alive && collision::bullet_hits_asteroid(bullet, asteroid) {
                    bullet.kill();
                    hit = true;
                }
            }
            if hit {
                self.prune_mask |= PRUNE_BULLETS;
                struck.push(asteroid_index);
            }
        }

        for &asteroid_index in &struck {
            self.split_asteroid(asteroid_index);
        }
        struck.len()
    }

    /// First contact wins: asteroid, then UFO, then enemy bullet.
    fn collide_ship(&mut self) -> bool {
        if !self.ship.alive {
            return false;
        }

        let ship = &self.ship;
        let rammed = self
            .asteroids
            .iter()
            .any(|asteroid| asteroid.alive && collision::ship_hits_asteroid(ship, asteroid))
            || self
                .ufos
                .iter()
                .any(|ufo| ufo.alive && collision::ship_hits_ufo(ship, ufo));
        if rammed {
            self.ship_die();
            return true;
        }

        let mut shot = false;
        for bullet in &mut self.enemy_bullets {
            if bullet.alive && collision::ship_hits_bullet(&self.ship, bullet) {
                bullet.kill();
                shot = true;
            }
        }
        if shot {
            self.prune_mask |= PRUNE_ENEMY_BULLETS;
            self.ship_die();
        }
        shot
    }

    fn collide_bullets_with_ufos(&mut self) -> usize {
        let mut destroyed = 0;

        for ufo in &mut self.ufos {
            if !ufo.alive {
                continue;
            }
            let Some(bullet) = self
                .bullets
                .iter_mut()
                .find(|bullet| bullet.alive && collision::bullet_hits_ufo(bullet, ufo))
            else {
                continue;
            };

            bullet.kill();
            ufo.destroy(&mut self.audio);
            self.score = self.score.saturating_add(ufo.score());
            self.stats.ufos_shot += 1;
            destroyed += 1;
        }

        if destroyed > 0 {
            self.prune_mask |= PRUNE_BULLETS | PRUNE_UFOS;
        }
        destroyed
    }

    fn collide_ufos_with_asteroids(&mut self) -> usize {
        let scanned = self.asteroids.len();
        let mut struck = vec![false; scanned];
        let mut crashed = 0;

        for ufo in &mut self.ufos {
            if !ufo.alive {
                continue;
            }

            let mut hit = false;
            for (asteroid, marked) in self.asteroids.iter().zip(struck.iter_mut()) {
                if asteroid.alive && collision::ufo_hits_asteroid(ufo, asteroid) {
                    *marked = true;
                    hit = true;
                }
            }
            if hit {
                ufo.destroy(&mut self.audio);
                self.stats.ufos_crashed += 1;
                crashed += 1;
            }
        }

        if crashed > 0 {
            self.prune_mask |= PRUNE_UFOS;
        }
        for (asteroid_index, marked) in struck.into_iter().enumerate() {
            if marked {
                self.split_asteroid(asteroid_index);
            }
        }
        crashed
    }

    /// Destroys the asteroid at `asteroid_index`, awards its score and drops
    /// its fragments at the same spot. Returns false if it was already gone.
    pub(super) fn split_asteroid(&mut self, asteroid_index: usize) -> bool {
        let Some(asteroid) = self.asteroids.get_mut(asteroid_index) else {
            return false;
        };
        if !asteroid.alive {
            return false;
        }
        asteroid.kill();
        let (pos, size) = (asteroid.pos, asteroid.size);
        self.prune_mask |= PRUNE_ASTEROIDS;

        self.audio.play(size.break_cue());
        self.score = self.score.saturating_add(size.score());
        self.stats.asteroids_split += 1;

        if let Some(fragment) = size.fragment() {
            for _ in 0..size.fragment_count() {
                let direction = random_unit(&mut self.rng);
                let speed =
                    self.rng.gen_range(AST_VEL_MIN..AST_VEL_MAX) * AST_SPLIT_SPEED_SCALE;
                self.spawn_asteroid(pos, direction * speed, fragment);
            }
        }
        true
    }

    fn prune_destroyed_entities(&mut self) {
        if self.prune_mask == 0 {
            return;
        }

        if (self.prune_mask & PRUNE_ASTEROIDS) != 0 {
            self.asteroids.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_BULLETS) != 0 {
            self.bullets.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_UFOS) != 0 {
            self.ufos.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_ENEMY_BULLETS) != 0 {
            self.enemy_bullets.retain(|entry| entry.alive);
        }

        self.prune_mask = 0;
    }

    /// Checks the between-frame invariants: everything live and inside the
    /// arena, timers in range, bullet cap respected, no engine channel held by
    /// two saucers.
    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        let bounds = self.bounds;

        if self.wave < 1 {
            return Err(RuleCode::WaveNonZero);
        }

        if self.lives < 0 || self.lives > self.config.start_lives {
            return Err(RuleCode::LivesRange);
        }

        if !self.ship.alive {
            return Err(RuleCode::ShipNotAlive);
        }

        if !bounds.contains(self.ship.pos) {
            return Err(RuleCode::ShipBounds);
        }

        if !(0.0..=SHIP_FIRE_RATE).contains(&self.ship.cooldown) {
            return Err(RuleCode::ShipCooldownRange);
        }

        if !(self.ship.invulnerable.is_finite() && self.ship.invulnerable >= 0.0) {
            return Err(RuleCode::ShipInvulnerabilityRange);
        }

        if self.bullets.len() > self.config.max_bullets {
            return Err(RuleCode::PlayerBulletLimit);
        }

        let bullet_ok = |bullet: &Bullet| {
            bullet.alive
                && bullet.ttl > 0.0
                && bullet.ttl <= BULLET_TTL
                && bounds.contains(bullet.pos)
        };

        if !self.bullets.iter().all(bullet_ok) {
            return Err(RuleCode::PlayerBulletState);
        }

        if !self.enemy_bullets.iter().all(bullet_ok) {
            return Err(RuleCode::EnemyBulletState);
        }

        if !self
            .asteroids
            .iter()
            .all(|asteroid| asteroid.alive && bounds.contains(asteroid.pos))
        {
            return Err(RuleCode::AsteroidState);
        }

        if !self.ufos.iter().all(|ufo| {
            ufo.alive && bounds.contains(ufo.pos) && ufo.shoot_timer.is_finite()
        }) {
            return Err(RuleCode::UfoState);
        }

        // Each engine loop has one owner.
        let shared_channel = self.ufos.iter().enumerate().any(|(index, ufo)| {
            ufo.engine_channel().is_some_and(|channel| {
                self.ufos[..index]
                    .iter()
                    .any(|earlier| earlier.engine_channel() == Some(channel))
            })
        });
        if shared_channel {
            return Err(RuleCode::UfoState);
        }

        Ok(())
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame_count: self.frame_count,
            score: self.score,
            lives: self.lives,
            wave: self.wave,
            wave_cool: self.wave_cool,
            safe_spawn: self.safe,
            ufo_timer: self.ufo_timer,
            width: self.bounds.width,
            height: self.bounds.height,
            ship: ShipSnapshot::of(&self.ship),
            bullets: self.bullets.iter().map(BulletSnapshot::of).collect(),
            enemy_bullets: self.enemy_bullets.iter().map(BulletSnapshot::of).collect(),
            asteroids: self.asteroids.iter().map(AsteroidSnapshot::of).collect(),
            ufos: self.ufos.iter().map(UfoSnapshot::of).collect(),
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityView<'_>> + '_ {
        let ship = self
            .ship
            .alive
            .then_some(EntityView::Ship(&self.ship));
        ship.into_iter()
            .chain(self.bullets.iter().map(EntityView::Bullet))
            .chain(self.enemy_bullets.iter().map(EntityView::EnemyBullet))
            .chain(self.asteroids.iter().map(EntityView::Asteroid))
            .chain(self.ufos.iter().map(EntityView::Ufo))
    }

    pub fn hud_text(&self) -> String {
        format!(
            "SCORE {:06}   LIVES {}   WAVE {}",
            self.score, self.lives, self.wave
        )
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn lives(&self) -> i32 {
        self.lives
    }

    #[inline]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    #[inline]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    #[inline]
    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    #[inline]
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[inline]
    pub fn ufos(&self) -> &[Ufo] {
        &self.ufos
    }

    #[inline]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[inline]
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}

impl<A: AudioSink> Drop for World<A> {
    fn drop(&mut self) {
        self.release_engines();
    }
}
