// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet Plasticity
//!
//! Reward-modulated spike-timing-dependent plasticity:
//! - the STDP + reward rule ([`StdpParams`])
//! - plastic synapses with their `Naive → Tracking → RewardPending` cycle
//! - selection of plastic channels and the per-worker [`SynapseTable`]
//! - sparse `(time, weight)` histories
//!
//! A plastic synapse owns the live weight of its receptor channel; the
//! generated connection weight is only its initial value.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod log;
pub mod rule;
pub mod synapse;
pub mod table;
pub mod types;

pub use log::WeightLog;
pub use rule::{EligibilityWindow, StdpParams};
pub use synapse::{PlasticSynapse, SynapseKey, SynapseState};
pub use table::{PlasticWeights, PlasticityRecord, SynapseTable};
pub use types::{PlasticityError, PlasticityResult};
