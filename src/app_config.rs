//! File-based defaults for the CLI.
//!
//! Reads `$XDG_CONFIG_HOME/picfetch/config.toml` (falling back to
//! `~/.config/picfetch/config.toml`). Only flat `key = value` lines are
//! understood; `#` starts a comment. Command-line flags take precedence.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::cli::Args;
use picfetch_core::{HttpTimeouts, TaskConfig};

/// Defaults loaded from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory.
    pub output_dir: Option<PathBuf>,
    /// Default progress increment in percent.
    pub progress_step: Option<u8>,
    /// Default progress pause in milliseconds.
    pub progress_pause_ms: Option<u64>,
    /// Default chunk size in bytes.
    pub chunk_size: Option<usize>,
    /// Default placeholder text.
    pub placeholder: Option<String>,
}

/// Returns the config file path, if a config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("picfetch").join("config.toml"))
}

/// Loads the default config file; a missing file yields `None`.
pub fn load_default_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    load_file_config(&path)
}

/// Loads `path`; a missing file yields `None`.
pub fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_file_config(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config file");
    Ok(Some(config))
}

/// Parses flat `key = value` lines.
pub fn parse_file_config(raw: &str) -> Result<FileConfig> {
    let mut config = FileConfig::default();
    for (index, line) in raw.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("line {}: expected `key = value`", index + 1);
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');
        match key {
            "output_dir" => config.output_dir = Some(PathBuf::from(value)),
            "progress_step" => config.progress_step = Some(parse_number(key, value)?),
            "progress_pause_ms" => config.progress_pause_ms = Some(parse_number(key, value)?),
            "chunk_size" => config.chunk_size = Some(parse_number(key, value)?),
            "placeholder" => config.placeholder = Some(value.to_string()),
            other => warn!(key = other, "ignoring unknown config key"),
        }
    }
    Ok(config)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .ok()
        .with_context(|| format!("invalid value for `{key}`: {value}"))
}

/// Merges CLI flags over file defaults over built-in defaults, then validates.
pub fn resolve_task_config(args: &Args, file: Option<&FileConfig>) -> Result<TaskConfig> {
    let file = file.cloned().unwrap_or_default();
    let defaults = TaskConfig::default();

    let chunk_size = match args.chunk_size {
        Some(size) => usize::try_from(size).context("chunk size does not fit in memory")?,
        None => file.chunk_size.unwrap_or(defaults.chunk_size),
    };
    let config = TaskConfig {
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or(defaults.output_dir),
        progress_step: args
            .progress_step
            .or(file.progress_step)
            .unwrap_or(defaults.progress_step),
        progress_pause: args
            .progress_pause_ms
            .or(file.progress_pause_ms)
            .map_or(defaults.progress_pause, Duration::from_millis),
        chunk_size,
        placeholder: args
            .placeholder
            .clone()
            .or(file.placeholder)
            .unwrap_or(defaults.placeholder),
    };
    config.validate()?;
    Ok(config)
}

/// Builds HTTP timeouts from CLI flags.
pub fn resolve_http_timeouts(args: &Args) -> Result<HttpTimeouts> {
    let timeouts = HttpTimeouts::from_secs(args.connect_timeout, args.read_timeout);
    timeouts.validate()?;
    Ok(timeouts)
}
