// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run a spikenet network and write the gathered dataset.
//!
//! ```text
//! run_network [--config <path>] [--preset <reaching|two_population>]
//!             [--output <path>] [--log-dir <path>]
//!             [--debug-all | --debug-<crate> ...] [key=value ...]
//! ```
//!
//! `key=value` overrides: `seed`, `duration`, `workers`, `loop_step`,
//! `reward`, `log_level` (e.g. `run_network workers=4 duration=2000`).

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use spikenet::config::{load_config, parse_cli_pairs, presets, SpikenetConfig};
use spikenet::observability::{debug_flags_help, init_logging, parse_debug_flags};
use spikenet::{run_distributed, DatasetSink, JsonDatasetSink};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    preset: Option<String>,
    output: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    overrides: Vec<String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: run_network [--config <path>] [--preset <reaching|two_population>]\n\
         \x20                  [--output <path>] [--log-dir <path>] [key=value ...]\n\n\
         Overrides: seed, duration, workers, loop_step, reward, log_level\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut parsed = Args::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(args.next().unwrap_or_else(|| usage_and_exit()).into()),
            "--preset" => parsed.preset = Some(args.next().unwrap_or_else(|| usage_and_exit())),
            "--output" => parsed.output = Some(args.next().unwrap_or_else(|| usage_and_exit()).into()),
            "--log-dir" => parsed.log_dir = Some(args.next().unwrap_or_else(|| usage_and_exit()).into()),
            "-h" | "--help" => usage_and_exit(),
            // handled by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other if other.contains('=') => parsed.overrides.push(other.to_string()),
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    parsed
}

fn resolve_config(args: &Args) -> Result<SpikenetConfig> {
    let overrides = parse_cli_pairs(&args.overrides);
    if let Some(preset) = &args.preset {
        let mut config = match preset.as_str() {
            "reaching" => presets::reaching_circuit(),
            "two_population" => presets::two_population(80, 20, 0.1),
            other => bail!("Unknown preset: {}", other),
        };
        spikenet::config::apply_environment_overrides(&mut config);
        spikenet::config::apply_cli_overrides(&mut config, &overrides)?;
        return Ok(config);
    }
    load_config(args.config.as_deref(), Some(&overrides)).context("Failed to load configuration")
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = resolve_config(&args)?;

    let mut debug_flags = parse_debug_flags();
    for crate_name in &config.logging.debug_crates {
        debug_flags.enable(crate_name);
    }
    let _logging = init_logging(&debug_flags, &config.logging.level, args.log_dir.clone(), None)?;

    let dataset = run_distributed(&config)?;

    if let Some(output) = &args.output {
        JsonDatasetSink::new(output).write(&dataset)?;
    }
    Ok(())
}
