use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    WaveNonZero,
    LivesRange,
    ScoreRegression,
    ShipBounds,
    ShipCooldownRange,
    ShipInvulnerabilityRange,
    ShipNotAlive,
    PlayerBulletLimit,
    PlayerBulletState,
    EnemyBulletState,
    AsteroidState,
    UfoState,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaveNonZero => write!(f, "WAVE_NONZERO"),
            Self::LivesRange => write!(f, "LIVES_RANGE"),
            Self::ScoreRegression => write!(f, "SCORE_REGRESSION"),
            Self::ShipBounds => write!(f, "SHIP_BOUNDS"),
            Self::ShipCooldownRange => write!(f, "SHIP_COOLDOWN_RANGE"),
            Self::ShipInvulnerabilityRange => write!(f, "SHIP_INVULNERABILITY_RANGE"),
            Self::ShipNotAlive => write!(f, "SHIP_NOT_ALIVE"),
            Self::PlayerBulletLimit => write!(f, "PLAYER_BULLET_LIMIT"),
            Self::PlayerBulletState => write!(f, "PLAYER_BULLET_STATE"),
            Self::EnemyBulletState => write!(f, "ENEMY_BULLET_STATE"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::UfoState => write!(f, "UFO_STATE"),
        }
    }
}

impl std::error::Error for RuleCode {}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ArenaSize { width: f32, height: f32 },
    BulletCapZero,
    StartLives { lives: i32 },
    NegativeTimer { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArenaSize { width, height } => {
                write!(f, "arena must have positive size, got {width}x{height}")
            }
            Self::BulletCapZero => write!(f, "max_bullets must be at least 1"),
            Self::StartLives { lives } => {
                write!(f, "start_lives must be non-negative, got {lives}")
            }
            Self::NegativeTimer { name, value } => {
                write!(f, "{name} must be a finite, non-negative duration, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputError {
    ReservedBitsSet { byte: u8 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedBitsSet { byte } => {
                write!(f, "input byte has reserved bits set: 0x{byte:02x}")
            }
        }
    }
}

impl std::error::Error for InputError {}
