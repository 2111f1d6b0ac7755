// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet-neural
//!
//! Platform-level types shared by every spikenet crate:
//! - cell identity (`Gid`), polarity, cell class and 3-D position
//! - connections and the read-only weight accessor (`WeightView`)
//! - spike events exchanged between workers
//! - the neuron-model collaborator contract (`NeuronModel`)
//! - deterministic RNG streams keyed by (global seed, stable id)
//!
//! A reference Izhikevich network lives in [`models`]; the core never
//! depends on it.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod model;
pub mod models;
pub mod rng;
pub mod types;

pub use model::NeuronModel;
pub use types::*;
