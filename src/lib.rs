// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet
//!
//! Builds and runs a spiking network distributed over several workers,
//! with reward-modulated STDP.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikenet-config, spikenet-observability    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core types: spikenet-neural                            │
//! │  (cells, connections, spikes, neuron-model contract)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: spikenet-development, spikenet-plasticity  │
//! │  (partition, layout, connectivity, weights, STDP)       │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Runtime: spikenet-cluster, spikenet-engine             │
//! │  (communication, driver, gather)                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spikenet::config::presets;
//! use spikenet::{run_distributed, DatasetSink, JsonDatasetSink};
//!
//! let mut config = presets::reaching_circuit();
//! config.cluster.workers = 4;
//! let dataset = run_distributed(&config)?;
//! JsonDatasetSink::new("reaching.json").write(&dataset)?;
//! # Ok::<(), spikenet::SpikenetError>(())
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use spikenet_cluster as cluster;
pub use spikenet_config as config;
pub use spikenet_development as development;
pub use spikenet_engine as engine;
pub use spikenet_neural as neural;
pub use spikenet_observability as observability;
pub use spikenet_plasticity as plasticity;

pub mod dataset;
pub mod error;
pub mod run;
pub mod sink;
pub mod summary;

pub use dataset::{
    ConnectionRecord, Dataset, FieldPotentialRecord, PlasticityEntry, RunInfo, SpikeRecord,
};
pub use error::{SpikenetError, SpikenetResult};
pub use run::{run_distributed, run_worker};
pub use sink::{DatasetSink, JsonDatasetSink};
pub use summary::RunSummary;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{load_config, presets, validate_config, SpikenetConfig};
    pub use crate::neural::{Connection, Gid, NeuronModel, SpikeEvent, WeightView};
    pub use crate::{run_distributed, Dataset, DatasetSink, JsonDatasetSink};
}
