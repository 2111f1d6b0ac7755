// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet-observability
//!
//! Logging setup shared by every spikenet binary: a console subscriber with
//! per-crate debug flags and, with the `file-logging` feature, rolling log
//! files per run.
//!
//! ## Features
//! - `file-logging`: per-run log directory with daily rotation

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Crate names accepted by `--debug-<crate>` and `SPIKENET_DEBUG`; these are
/// also the `target:` names used in the crates' log statements
pub const KNOWN_CRATES: &[&str] = &[
    "spikenet",
    "spikenet-config",
    "spikenet-neural",
    "spikenet-development",
    "spikenet-plasticity",
    "spikenet-cluster",
    "spikenet-engine",
];
