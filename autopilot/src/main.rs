use anyhow::{anyhow, Context, Result};
use asteroids_autopilot::benchmark::{parse_bot_list, run_benchmark, BenchmarkConfig};
use asteroids_autopilot::bots::describe_bots;
use asteroids_autopilot::runner::{
    replay_inputs, run_bot, write_inputs, write_report, DEFAULT_DT, DEFAULT_MAX_FRAMES,
};
use asteroids_autopilot::util::{
    expand_seeds, parse_seed, read_env_f32, read_env_optional_usize, read_env_u64, seed_to_hex,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asteroids-autopilot")]
#[command(about = "Headless driver for seeded asteroids sessions: scripted bots, replays and benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Session length and step size shared by every playing command.
#[derive(Args, Debug)]
struct Pacing {
    /// Frames per session; falls back to AUTOPILOT_MAX_FRAMES
    #[arg(long)]
    max_frames: Option<u32>,
    /// Seconds per frame; falls back to AUTOPILOT_DT
    #[arg(long)]
    dt: Option<f32>,
}

impl Pacing {
    fn max_frames(&self) -> Result<u32> {
        let frames = match self.max_frames {
            Some(frames) => u64::from(frames),
            None => read_env_u64("AUTOPILOT_MAX_FRAMES", u64::from(DEFAULT_MAX_FRAMES)),
        };
        u32::try_from(frames).map_err(|_| anyhow!("AUTOPILOT_MAX_FRAMES={frames} is too large"))
    }

    fn dt(&self) -> f32 {
        self.dt
            .unwrap_or_else(|| read_env_f32("AUTOPILOT_DT", DEFAULT_DT))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every bot id with a short description
    ListBots,
    /// Play one seeded session with a bot
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        #[command(flatten)]
        pacing: Pacing,
        /// Where to write the JSON run report (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Where to write the input log, one byte per frame
        #[arg(long)]
        inputs_out: Option<PathBuf>,
    },
    /// Feed an input log back through a fresh world
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        #[arg(long)]
        dt: Option<f32>,
    },
    /// Play every listed bot on every listed seed
    Benchmark {
        /// Comma-separated bot ids (all bots when omitted)
        #[arg(long)]
        bots: Option<String>,
        /// Seeds, `START+COUNT` ranges and `@FILE` entries, comma-separated
        #[arg(long, default_value = "0xA57E0001+12")]
        seeds: String,
        #[command(flatten)]
        pacing: Pacing,
        #[arg(long, default_value = "benchmarks/latest")]
        out_dir: PathBuf,
        /// Worker threads; falls back to AUTOPILOT_JOBS, then to rayon's default
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:12} {description}");
            }
            Ok(())
        }
        Command::Run {
            bot,
            seed,
            pacing,
            output,
            inputs_out,
        } => play_one(&bot, &seed, &pacing, output, inputs_out),
        Command::Replay { input, seed, dt } => replay(input, &seed, dt),
        Command::Benchmark {
            bots,
            seeds,
            pacing,
            out_dir,
            jobs,
        } => benchmark(bots.as_deref(), &seeds, &pacing, out_dir, jobs),
    }
}

fn play_one(
    bot: &str,
    seed: &str,
    pacing: &Pacing,
    output: Option<PathBuf>,
    inputs_out: Option<PathBuf>,
) -> Result<()> {
    let seed = parse_seed(seed)?;
    let artifact = run_bot(bot, seed, pacing.max_frames()?, pacing.dt())?;
    let metrics = &artifact.metrics;

    if let Some(path) = &inputs_out {
        write_inputs(path, &artifact.inputs)?;
    }
    match &output {
        Some(path) => write_report(path, metrics)?,
        None => println!("{}", serde_json::to_string_pretty(metrics)?),
    }

    println!(
        "bot={} seed={} frames={} score={} best={} wave={} lives={} deaths={} resets={} saucers_shot={}",
        metrics.bot_id,
        seed_to_hex(seed),
        metrics.frame_count,
        metrics.final_score,
        metrics.best_score,
        metrics.final_wave,
        metrics.final_lives,
        metrics.deaths,
        metrics.resets,
        metrics.ufos_shot,
    );
    for path in output.iter().chain(inputs_out.iter()) {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn replay(input: PathBuf, seed: &str, dt: Option<f32>) -> Result<()> {
    let bytes = fs::read(&input).with_context(|| format!("failed reading {}", input.display()))?;
    let seed = parse_seed(seed)?;
    let dt = dt.unwrap_or_else(|| read_env_f32("AUTOPILOT_DT", DEFAULT_DT));
    let world = replay_inputs(seed, dt, &bytes)?;
    println!(
        "seed={} frames={} score={} wave={} lives={} asteroids={} ufos={}",
        seed_to_hex(seed),
        world.frame_count,
        world.score,
        world.wave,
        world.lives,
        world.asteroids.len(),
        world.ufos.len(),
    );
    Ok(())
}

fn benchmark(
    bots: Option<&str>,
    seeds: &str,
    pacing: &Pacing,
    out_dir: PathBuf,
    jobs: Option<usize>,
) -> Result<()> {
    let summary = run_benchmark(BenchmarkConfig {
        bots: parse_bot_list(bots)?,
        seeds: expand_seeds(seeds)?,
        max_frames: pacing.max_frames()?,
        dt: pacing.dt(),
        out_dir: out_dir.clone(),
        jobs: jobs.or_else(|| read_env_optional_usize("AUTOPILOT_JOBS")),
    })?;

    println!(
        "{} sessions, summary in {}",
        summary.session_count(),
        out_dir.join("summary.json").display()
    );
    for (place, standing) in summary.standings.iter().enumerate() {
        println!(
            "{:>2}. {:10} mean_best={:.1} top={} wave={} deaths={} resets={} saucers_shot={} frames_per_death={:.0}",
            place + 1,
            standing.bot_id,
            standing.mean_best_score,
            standing.top_score,
            standing.top_wave,
            standing.deaths,
            standing.resets,
            standing.ufos_shot,
            standing.frames_per_death,
        );
    }
    Ok(())
}
