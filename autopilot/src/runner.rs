use crate::bots::{create_bot, AutopilotBot};
use anyhow::{anyhow, Context, Result};
use asteroids_arcade_core::{
    decode_input_byte_strict, encode_input_byte, CueCounts, RecordingAudio, RuleCode, World,
    WorldConfig, WorldSnapshot,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_DT: f32 = 1.0 / 60.0;
pub const DEFAULT_MAX_FRAMES: u32 = 18_000;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub seed: u64,
    pub max_frames: u32,
    pub dt: f32,
    pub frame_count: u64,
    pub final_score: u32,
    pub best_score: u32,
    pub final_lives: i32,
    pub final_wave: u32,
    pub max_wave: u32,
    pub resets: u32,
    pub deaths: u32,
    pub shots_fired: u32,
    pub asteroids_split: u32,
    pub ufos_shot: u32,
    pub ufos_crashed: u32,
    pub cues: CueCounts,
    pub engine_loops_started: u32,
    pub engine_loops_refused: u32,
    pub open_engine_channels: usize,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
    pub hyperspace_frames: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub inputs: Vec<u8>,
    pub final_snapshot: WorldSnapshot,
}

fn check_run_params(max_frames: u32, dt: f32) -> Result<()> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(anyhow!("dt must be a positive finite number, got {dt}"));
    }
    Ok(())
}

fn new_world(seed: u64) -> Result<World<RecordingAudio>> {
    World::new(WorldConfig::with_seed(seed), RecordingAudio::default())
        .map_err(|err| anyhow!("invalid world config: {err}"))
}

pub fn run_bot(bot_id: &str, seed: u64, max_frames: u32, dt: f32) -> Result<RunArtifact> {
    check_run_params(max_frames, dt)?;
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), seed, max_frames, dt)
}

/// Plays one seeded session, checking every world invariant after each frame.
pub fn run_bot_instance(
    bot: &mut dyn AutopilotBot,
    seed: u64,
    max_frames: u32,
    dt: f32,
) -> Result<RunArtifact> {
    check_run_params(max_frames, dt)?;
    bot.reset(seed);

    let mut world = new_world(seed)?;
    world
        .validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let mut snapshot = world.snapshot();
    let mut inputs = Vec::with_capacity(max_frames as usize);
    let mut best_score = world.score();
    let mut max_wave = world.wave();

    while snapshot.frame_count < max_frames as u64 {
        let input = bot.next_input(&snapshot);
        let score_before = world.score();
        let resets_before = world.stats().resets;

        inputs.push(encode_input_byte(input));
        world.step(dt, input);

        let frame = world.frame_count();
        world
            .validate_invariants()
            .map_err(|rule| anyhow!("invariant failure at frame {frame}: {rule}"))?;
        if world.stats().resets == resets_before && world.score() < score_before {
            return Err(anyhow!(
                "invariant failure at frame {frame}: {}",
                RuleCode::ScoreRegression
            ));
        }

        best_score = best_score.max(world.score());
        max_wave = max_wave.max(world.wave());
        snapshot = world.snapshot();
    }

    let audio = world.audio();
    if audio.invalid_stops() > 0 {
        return Err(anyhow!(
            "{} engine channel(s) released twice",
            audio.invalid_stops()
        ));
    }

    let mut action_frames = 0u32;
    let mut turn_frames = 0u32;
    let mut thrust_frames = 0u32;
    let mut fire_frames = 0u32;
    let mut hyperspace_frames = 0u32;
    for byte in &inputs {
        if *byte != 0 {
            action_frames += 1;
        }
        if (*byte & 0x03) != 0 {
            turn_frames += 1;
        }
        if (*byte & 0x04) != 0 {
            thrust_frames += 1;
        }
        if (*byte & 0x08) != 0 {
            fire_frames += 1;
        }
        if (*byte & 0x10) != 0 {
            hyperspace_frames += 1;
        }
    }

    let stats = world.stats();
    tracing::debug!(
        bot = bot.id(),
        seed,
        frames = snapshot.frame_count,
        score = world.score(),
        resets = stats.resets,
        "run finished"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot.id().to_string(),
            seed,
            max_frames,
            dt,
            frame_count: snapshot.frame_count,
            final_score: world.score(),
            best_score,
            final_lives: world.lives(),
            final_wave: world.wave(),
            max_wave,
            resets: stats.resets,
            deaths: stats.deaths,
            shots_fired: stats.shots_fired,
            asteroids_split: stats.asteroids_split,
            ufos_shot: stats.ufos_shot,
            ufos_crashed: stats.ufos_crashed,
            cues: audio.cues(),
            engine_loops_started: audio.loops_started(),
            engine_loops_refused: audio.loops_refused(),
            open_engine_channels: audio.open_channels(),
            action_frames,
            turn_frames,
            thrust_frames,
            fire_frames,
            hyperspace_frames,
        },
        inputs,
        final_snapshot: snapshot,
    })
}

/// Re-plays recorded input bytes against a fresh world and returns its final
/// state. Bytes with reserved bits set are rejected.
pub fn replay_inputs(seed: u64, dt: f32, inputs: &[u8]) -> Result<WorldSnapshot> {
    check_run_params(1, dt)?;
    let mut world = new_world(seed)?;
    for (frame, byte) in inputs.iter().enumerate() {
        let input = decode_input_byte_strict(*byte)
            .with_context(|| format!("bad input byte at frame {frame}"))?;
        world.step(dt, input);
        world
            .validate_invariants()
            .map_err(|rule| anyhow!("invariant failure at frame {}: {rule}", frame + 1))?;
    }
    Ok(world.snapshot())
}

pub fn write_inputs(path: &Path, bytes: &[u8]) -> Result<()> {
    write_bytes(path, bytes)
}

pub fn write_report(path: &Path, metrics: &RunMetrics) -> Result<()> {
    let encoded = serde_json::to_vec_pretty(metrics).context("failed to serialize run report")?;
    write_bytes(path, &encoded)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

