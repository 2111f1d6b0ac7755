// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; with `file-logging`, each run also writes into a
//! timestamped folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── spikenet.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Keeps file writers alive; logs are flushed when it is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Directory of this run's log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global subscriber
///
/// * `debug_flags` - crates logged at debug level
/// * `base_level` - level for everything else (`RUST_LOG` wins when set)
/// * `log_dir` - base directory for run folders; ignored without `file-logging`
/// * `retention_runs` - number of most recent run folders to keep (default 10)
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    base_level: &str,
    log_dir: Option<PathBuf>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(build_filter(debug_flags, base_level)?);

    #[cfg(feature = "file-logging")]
    {
        let (file_layer, file_guard, run_folder) = match log_dir {
            Some(base) => {
                let run_folder = create_run_folder(&base)?;
                cleanup_old_runs(&base, retention_runs.unwrap_or(10))?;
                let appender = tracing_appender::rolling::daily(&run_folder, "spikenet.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(build_filter(debug_flags, base_level)?);
                (Some(layer), Some(guard), Some(run_folder))
            }
            None => (None, None, None),
        };

        Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("Global tracing subscriber already installed")?;

        Ok(LoggingGuard {
            _file_guard: file_guard,
            log_dir: run_folder,
        })
    }

    #[cfg(not(feature = "file-logging"))]
    {
        let _ = (log_dir, retention_runs);
        Registry::default()
            .with(console_layer)
            .try_init()
            .context("Global tracing subscriber already installed")?;

        Ok(LoggingGuard { log_dir: None })
    }
}

/// Console-only logging at `info` with the given debug flags
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, "info", None, None)
}

/// `RUST_LOG` when set, otherwise the debug flags over `base_level`
fn build_filter(debug_flags: &CrateDebugFlags, base_level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = debug_flags.to_filter_string(base_level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

#[cfg(feature = "file-logging")]
fn create_run_folder(base: &Path) -> Result<PathBuf> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Remove all but the `keep` most recent `run_YYYYmmdd_HHMMSS` folders
#[cfg(feature = "file-logging")]
fn cleanup_old_runs(base: &Path, keep: usize) -> Result<()> {
    let mut runs = Vec::new();
    for entry in std::fs::read_dir(base)? {
        let path = entry?.path();
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
            .and_then(|s| chrono::NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
        if let (true, Some(stamp)) = (path.is_dir(), stamp) {
            runs.push((stamp, path));
        }
    }

    runs.sort();
    let excess = runs.len().saturating_sub(keep);
    for (_, path) in runs.into_iter().take(excess) {
        if let Err(e) = std::fs::remove_dir_all(&path) {
            eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_level_rejected() {
        std::env::remove_var("RUST_LOG");
        let flags = CrateDebugFlags::default();
        assert!(build_filter(&flags, "info").is_ok());
        assert!(build_filter(&flags, "spikenet=loud").is_err());
    }

    #[cfg(feature = "file-logging")]
    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in ["20250101_000000", "20250102_000000", "20250103_000000"] {
            std::fs::create_dir(dir.path().join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir(dir.path().join("unrelated")).unwrap();

        cleanup_old_runs(dir.path(), 2).unwrap();

        assert!(!dir.path().join("run_20250101_000000").exists());
        assert!(dir.path().join("run_20250103_000000").exists());
        assert!(dir.path().join("unrelated").exists());
    }
}
