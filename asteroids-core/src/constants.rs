//! Gameplay tuning. Distances are pixels, times are seconds, angles are
//! degrees with 0° along +x and +y pointing down the screen.

// Arena
pub const WORLD_WIDTH: f32 = 960.0;
pub const WORLD_HEIGHT: f32 = 720.0;

// Ship
pub const SHIP_RADIUS: f32 = 15.0;
pub const SHIP_TURN_SPEED: f32 = 220.0; // degrees per second
pub const SHIP_THRUST: f32 = 220.0; // px/s^2 along the heading
pub const SHIP_FRICTION: f32 = 0.995; // velocity factor applied every frame
pub const SHIP_FIRE_RATE: f32 = 0.2;
pub const SHIP_BULLET_SPEED: f32 = 420.0;
pub const SHIP_MUZZLE_GAP: f32 = 6.0;
pub const SHIP_START_ANGLE: f32 = -90.0; // nose up
pub const SHIP_HYPERSPACE_INVULNERABLE: f32 = 1.0;
pub const SHIP_SHIELD_GAP: f32 = 6.0;

// Bullets
pub const BULLET_RADIUS: f32 = 2.0;
pub const BULLET_TTL: f32 = 1.0;
pub const MAX_BULLETS: usize = 4;

// Asteroids
pub const AST_VEL_MIN: f32 = 30.0;
pub const AST_VEL_MAX: f32 = 90.0;
pub const AST_SPLIT_SPEED_SCALE: f32 = 1.2;
pub const AST_SPLIT_COUNT: usize = 2;
pub const AST_RADIUS_LARGE: f32 = 46.0;
pub const AST_RADIUS_MEDIUM: f32 = 24.0;
pub const AST_RADIUS_SMALL: f32 = 12.0;
pub const AST_POINTS_LARGE: usize = 12;
pub const AST_POINTS_MEDIUM: usize = 10;
pub const AST_POINTS_SMALL: usize = 8;
pub const AST_JITTER_MIN: f32 = 0.75;
pub const AST_JITTER_MAX: f32 = 1.2;

// UFOs
pub const UFO_SPEED: f32 = 80.0;
pub const UFO_RADIUS_SMALL: f32 = 12.0;
pub const UFO_RADIUS_BIG: f32 = 18.0;
pub const UFO_FIRE_RATE_SMALL: f32 = 0.7;
pub const UFO_FIRE_RATE_BIG: f32 = 1.2;
pub const UFO_FIRST_SHOT_MAX: f32 = 1.0;
pub const UFO_BULLET_SPEED: f32 = 260.0;
pub const UFO_MUZZLE_GAP: f32 = 10.0;
pub const UFO_AIM_ERROR: f32 = 5.0; // degrees either side of the target bearing
pub const UFO_SMALL_COURSE_JITTER: f32 = 0.2;
pub const UFO_BIG_COURSE_JITTER: f32 = 0.5;
pub const UFO_SPAWN_EVERY: f32 = 15.0;
pub const UFO_SMALL_CHANCE: f64 = 0.5;

// Scoring
pub const SCORE_LARGE_ASTEROID: u32 = 20;
pub const SCORE_MEDIUM_ASTEROID: u32 = 50;
pub const SCORE_SMALL_ASTEROID: u32 = 100;
pub const SCORE_BIG_UFO: u32 = 200;
pub const SCORE_SMALL_UFO: u32 = 1000;

// Session
pub const START_LIVES: i32 = 3;
pub const WAVE_DELAY: f32 = 2.0;
pub const WAVE_BASE_ASTEROIDS: usize = 3;
pub const WAVE_SPAWN_CLEARANCE: f32 = 150.0;
pub const SAFE_SPAWN_TIME: f32 = 2.0;
pub const SAFE_SPAWN_INVULNERABLE: f32 = 0.5; // pinned on the ship while the safe window runs
pub const DEFAULT_SEED: u64 = 0xA57E_0001;
