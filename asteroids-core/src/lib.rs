pub mod audio;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod sim;

pub use audio::{AudioSink, ChannelId, Cue, CueCounts, EngineSound, NullAudio, RecordingAudio};
pub use config::WorldConfig;
pub use entities::{Asteroid, AsteroidSize, Bullet, Ship, Ufo};
pub use error::{ConfigError, InputError, RuleCode};
pub use geometry::Bounds;
pub use input::{decode_input_byte, decode_input_byte_strict, encode_input_byte, FrameInput};
pub use sim::{
    AsteroidSnapshot, BulletSnapshot, EntityView, ShipSnapshot, UfoSnapshot, World, WorldSnapshot,
    WorldStats,
};
