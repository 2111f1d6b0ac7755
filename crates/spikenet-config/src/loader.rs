// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI `key=value` arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpikenetConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "spikenet_configuration.toml";

/// Find the spikenet configuration file
///
/// Search order:
/// 1. `SPIKENET_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikenet_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKENET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKENET_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SPIKENET_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// Validation is a separate step (`validate_config`).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikenetConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikenetConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKENET_SEED` -> `network.seed`
/// - `SPIKENET_DURATION_MS` -> `simulation.duration`
/// - `SPIKENET_WORKERS` -> `cluster.workers`
/// - `SPIKENET_LOG_LEVEL` -> `logging.level`
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut SpikenetConfig) {
    if let Ok(value) = env::var("SPIKENET_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.network.seed = seed;
        }
    }
    if let Ok(value) = env::var("SPIKENET_DURATION_MS") {
        if let Ok(duration) = value.parse::<f64>() {
            config.simulation.duration = duration;
        }
    }
    if let Ok(value) = env::var("SPIKENET_WORKERS") {
        if let Ok(workers) = value.parse::<usize>() {
            config.cluster.workers = workers;
        }
    }
    if let Ok(value) = env::var("SPIKENET_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognised keys: `seed`, `duration`, `workers`, `loop_step`,
/// `reward` (`true`/`false`), `log_level`. Unknown keys are ignored so that
/// binaries can mix their own arguments in.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when a recognised key has a value that
/// does not parse.
pub fn apply_cli_overrides(
    config: &mut SpikenetConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("seed") {
        config.network.seed = parse_value("seed", value)?;
    }
    if let Some(value) = cli_args.get("duration") {
        config.simulation.duration = parse_value("duration", value)?;
    }
    if let Some(value) = cli_args.get("workers") {
        config.cluster.workers = parse_value("workers", value)?;
    }
    if let Some(value) = cli_args.get("loop_step") {
        config.simulation.loop_step = parse_value("loop_step", value)?;
    }
    if let Some(value) = cli_args.get("reward") {
        config.plasticity.reward_enabled = parse_flag("reward", value)?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    Ok(())
}

/// Split `key=value` arguments into a map; other arguments are skipped
pub fn parse_cli_pairs<I, S>(args: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .filter_map(|arg| {
            let (key, value) = arg.as_ref().split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, value)))
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue(format!("{}={}", key, value))),
    }
}
