//! CLI command implementations.

use std::path::{Path, PathBuf};

use super::trace::{parse_trace, replay, ReplayReport};
use crate::cache::LruCache;
use crate::types::config::{Config, CONFIG_FILE};
use crate::PopcacheResult;

/// Writes a default configuration in the given directory.
pub fn init(path: Option<PathBuf>) -> PopcacheResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("Configuration created at: {}", config_path.display());
    Ok(())
}

/// Prints the resolved configuration as TOML.
pub fn config_cmd(config: &Config) -> PopcacheResult<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Replays a trace file and prints the outcome.
pub fn replay_trace(
    file: &Path,
    capacity: Option<usize>,
    json: bool,
    config: &Config,
) -> PopcacheResult<()> {
    let content = std::fs::read_to_string(file)?;
    let ops = parse_trace(&content)?;

    let cache = match capacity {
        Some(capacity) => LruCache::new(capacity),
        None => LruCache::from_config(&config.cache),
    };
    tracing::info!(
        operations = ops.len(),
        capacity = cache.capacity(),
        "Replaying {}",
        file.display()
    );

    let report = replay(&cache, &ops)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for read in &report.reads {
        match &read.value {
            Some(value) => println!("get {} -> {}", read.key, value),
            None => println!("get {} -> (miss)", read.key),
        }
    }

    println!();
    println!("Keys (most to least recent): {}", report.keys.join(", "));
    println!(
        "Size: {}/{}  hits: {}  misses: {}  evictions: {}  hit rate: {:.1}%",
        report.stats.size,
        report.stats.capacity,
        report.stats.hits,
        report.stats.misses,
        report.stats.evictions,
        report.stats.hit_rate() * 100.0
    );
}

/// Shows version.
pub fn version() {
    println!("popcache {}", env!("CARGO_PKG_VERSION"));
}
