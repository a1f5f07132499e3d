//! Configuration loading for Testgen

mod schema;

pub use schema::{ProjectConfig, Settings, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".testgenrc.json";

/// Find and load the project config. Searches the directory then its parents;
/// defaults when none is found.
pub fn load_config(work_dir: &Path) -> Result<ProjectConfig> {
    match find_config_in_parents(work_dir) {
        Some(path) => load_config_file(&path),
        None => Ok(ProjectConfig::default()),
    }
}

/// Load one config file
pub fn load_config_file(config_path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))
}

/// Write `config` as `.testgenrc.json` in `dir`. Refuses to overwrite.
pub fn write_config(dir: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
}

/// Search for .testgenrc.json in directory and its parents
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from exclude patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}
