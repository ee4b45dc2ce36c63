use crate::bots::{bot_ids, create_bot};
use crate::runner::{run_bot, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u64>,
    pub max_frames: u32,
    pub dt: f32,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BotStanding {
    pub bot_id: String,
    pub sessions: usize,
    pub mean_best_score: f64,
    pub top_score: u32,
    pub top_wave: u32,
    pub deaths: u32,
    pub resets: u32,
    pub ufos_shot: u32,
    pub ufos_crashed: u32,
    pub shots_fired: u32,
    pub asteroids_split: u32,
    pub frames_per_death: f64,
}

impl BotStanding {
    fn tally<'a>(bot_id: &str, runs: impl Iterator<Item = &'a RunMetrics>) -> Self {
        let mut standing = Self {
            bot_id: bot_id.to_string(),
            ..Self::default()
        };
        let mut score_sum = 0u64;
        let mut frames = 0u64;
        for run in runs {
            standing.sessions += 1;
            score_sum += u64::from(run.best_score);
            frames += run.frame_count;
            standing.top_score = standing.top_score.max(run.best_score);
            standing.top_wave = standing.top_wave.max(run.max_wave);
            standing.deaths += run.deaths;
            standing.resets += run.resets;
            standing.ufos_shot += run.ufos_shot;
            standing.ufos_crashed += run.ufos_crashed;
            standing.shots_fired += run.shots_fired;
            standing.asteroids_split += run.asteroids_split;
        }
        if standing.sessions > 0 {
            standing.mean_best_score = score_sum as f64 / standing.sessions as f64;
        }
        // A deathless bot is credited with every frame it played.
        standing.frames_per_death = frames as f64 / f64::from(standing.deaths.max(1));
        standing
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkSummary {
    pub max_frames: u32,
    pub dt: f32,
    pub seeds: Vec<String>,
    /// Best first: mean best score, then fewer deaths, then more saucers shot.
    pub standings: Vec<BotStanding>,
    pub runs: Vec<RunMetrics>,
}

impl BenchmarkSummary {
    pub fn session_count(&self) -> usize {
        self.runs.len()
    }
}

/// Comma-separated bot ids; `None` selects every built-in bot.
pub fn parse_bot_list(list: Option<&str>) -> Result<Vec<String>> {
    let Some(list) = list else {
        return Ok(bot_ids().iter().map(|id| id.to_string()).collect());
    };
    let bots: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| match create_bot(id) {
            Some(_) => Ok(id.to_string()),
            None => Err(anyhow!(
                "no bot called '{id}' (choose from {})",
                bot_ids().join(", ")
            )),
        })
        .collect::<Result<_>>()?;
    if bots.is_empty() {
        return Err(anyhow!("bot list '{list}' names no bots"));
    }
    Ok(bots)
}

/// Plays every bot on every seed and writes `summary.json` into `out_dir`.
pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkSummary> {
    if config.bots.is_empty() || config.seeds.is_empty() {
        return Err(anyhow!("benchmark needs at least one bot and one seed"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("jobs must be at least 1"));
    }

    let pairs: Vec<(&str, u64)> = config
        .seeds
        .iter()
        .flat_map(|seed| config.bots.iter().map(move |bot| (bot.as_str(), *seed)))
        .collect();
    tracing::info!(sessions = pairs.len(), jobs = ?config.jobs, "benchmark starting");

    let play = || -> Result<Vec<RunMetrics>> {
        pairs
            .par_iter()
            .map(|&(bot_id, seed)| {
                run_bot(bot_id, seed, config.max_frames, config.dt)
                    .map(|artifact| artifact.metrics)
                    .with_context(|| format!("{bot_id} failed on seed {}", seed_to_hex(seed)))
            })
            .collect()
    };
    let runs = match config.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build benchmark thread pool")?
            .install(play)?,
        None => play()?,
    };

    let mut standings: Vec<BotStanding> = config
        .bots
        .iter()
        .map(|bot_id| BotStanding::tally(bot_id, runs.iter().filter(|run| run.bot_id == *bot_id)))
        .collect();
    standings.sort_by(|a, b| {
        b.mean_best_score
            .total_cmp(&a.mean_best_score)
            .then(a.deaths.cmp(&b.deaths))
            .then(b.ufos_shot.cmp(&a.ufos_shot))
    });

    let summary = BenchmarkSummary {
        max_frames: config.max_frames,
        dt: config.dt,
        seeds: config.seeds.iter().copied().map(seed_to_hex).collect(),
        standings,
        runs,
    };

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;
    let path = config.out_dir.join("summary.json");
    let json = serde_json::to_vec_pretty(&summary).context("failed to encode benchmark summary")?;
    fs::write(&path, json).with_context(|| format!("failed writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "benchmark summary written");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(bot_id: &str, best_score: u32, deaths: u32, frame_count: u64) -> RunMetrics {
        let mut run = crate::runner::run_bot(bot_id, 1, 1, crate::runner::DEFAULT_DT)
            .unwrap()
            .metrics;
        run.best_score = best_score;
        run.deaths = deaths;
        run.frame_count = frame_count;
        run.max_wave = 1 + deaths;
        run
    }

    #[test]
    fn standings_total_project_counters() {
        let runs = [metrics("idle", 100, 2, 600), metrics("idle", 300, 0, 600)];
        let standing = BotStanding::tally("idle", runs.iter());
        assert_eq!(standing.sessions, 2);
        assert_eq!(standing.mean_best_score, 200.0);
        assert_eq!(standing.top_score, 300);
        assert_eq!(standing.top_wave, 3);
        assert_eq!(standing.deaths, 2);
        assert_eq!(standing.frames_per_death, 600.0);
    }

    #[test]
    fn deathless_bots_are_credited_with_all_frames() {
        let runs = [metrics("idle", 0, 0, 900)];
        assert_eq!(BotStanding::tally("idle", runs.iter()).frames_per_death, 900.0);
        assert_eq!(BotStanding::tally("idle", std::iter::empty()).sessions, 0);
    }

    #[test]
    fn bot_lists_are_checked() {
        assert_eq!(parse_bot_list(None).unwrap().len(), bot_ids().len());
        assert_eq!(
            parse_bot_list(Some(" hunter, ,idle")).unwrap(),
            vec!["hunter".to_string(), "idle".to_string()]
        );
        assert!(parse_bot_list(Some("hunter,ghost")).is_err());
        assert!(parse_bot_list(Some(" , ")).is_err());
    }
}
