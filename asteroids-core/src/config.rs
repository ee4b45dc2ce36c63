use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SEED, MAX_BULLETS, SAFE_SPAWN_TIME, START_LIVES, UFO_SPAWN_EVERY, WAVE_DELAY,
    WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::error::ConfigError;
use crate::geometry::Bounds;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub seed: u64,
    pub max_bullets: usize,
    pub start_lives: i32,
    pub wave_delay: f32,
    pub safe_spawn_time: f32,
    pub ufo_spawn_every: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            seed: DEFAULT_SEED,
            max_bullets: MAX_BULLETS,
            start_lives: START_LIVES,
            wave_delay: WAVE_DELAY,
            safe_spawn_time: SAFE_SPAWN_TIME,
            ufo_spawn_every: UFO_SPAWN_EVERY,
        }
    }
}

impl WorldConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if !arena_ok {
            return Err(ConfigError::ArenaSize {
                width: self.width,
                height: self.height,
            });
        }

        if self.max_bullets == 0 {
            return Err(ConfigError::BulletCapZero);
        }

        if self.start_lives < 0 {
            return Err(ConfigError::StartLives {
                lives: self.start_lives,
            });
        }

        for (name, value) in [
            ("wave_delay", self.wave_delay),
            ("safe_spawn_time", self.safe_spawn_time),
            ("ufo_spawn_every", self.ufo_spawn_every),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeTimer { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_arena() {
        let config = WorldConfig {
            width: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaSize { .. })
        ));
    }

    #[test]
    fn rejects_negative_timers() {
        let config = WorldConfig {
            wave_delay: -1.0,
            ..WorldConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeTimer {
                name: "wave_delay",
                value: -1.0
            })
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "seed": 7, "max_bullets": 2 }"#).expect("config parses");
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_bullets, 2);
        assert_eq!(config.start_lives, START_LIVES);
        assert_eq!(config.width, WORLD_WIDTH);
    }
}
