use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;

pub fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    let (digits, radix) = match token.get(..2) {
        Some("0x" | "0X") => (&token[2..], 16),
        _ => (token, 10),
    };
    let digits = digits.replace('_', "");
    if digits.is_empty() {
        return Err(anyhow!("empty seed '{token}'"));
    }
    u64::from_str_radix(&digits, radix)
        .with_context(|| format!("seed '{token}' is not a base-{radix} u64"))
}

pub fn seed_to_hex(seed: u64) -> String {
    format!("{seed:#010x}")
}

/// Expands a seed list into concrete seeds, in order.
///
/// Entries are separated by commas or newlines and `#` starts a comment.
/// `START+COUNT` expands to `COUNT` consecutive seeds and `@PATH` splices in
/// the entries of a seed file.
pub fn expand_seeds(list: &str) -> Result<Vec<u64>> {
    let seeds = expand_entries(list, true)?;
    if seeds.is_empty() {
        return Err(anyhow!("seed list '{}' names no seeds", list.trim()));
    }
    Ok(seeds)
}

fn expand_entries(list: &str, allow_files: bool) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for line in list.lines() {
        let line = line.split('#').next().unwrap_or_default();
        for entry in line.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            if let Some(path) = entry.strip_prefix('@') {
                if !allow_files {
                    return Err(anyhow!("seed file entry '{entry}' cannot nest"));
                }
                let data = fs::read_to_string(path)
                    .with_context(|| format!("failed reading seed file {path}"))?;
                seeds.extend(expand_entries(&data, false)?);
            } else if let Some((start, count)) = entry.split_once('+') {
                let start = parse_seed(start)?;
                let count: u64 = count
                    .trim()
                    .parse()
                    .with_context(|| format!("bad seed count in '{entry}'"))?;
                seeds.extend((0..count).map(|offset| start.wrapping_add(offset)));
            } else {
                seeds.push(parse_seed(entry)?);
            }
        }
    }
    Ok(seeds)
}

pub fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

/// Positive, finite float from the environment, else `default`.
pub fn read_env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}
