// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Top-level error type

use spikenet_cluster::ClusterError;
use spikenet_config::ConfigError;
use spikenet_development::DevelopmentError;
use spikenet_engine::EngineError;
use spikenet_neural::Rank;

/// Result type for whole-run operations
pub type SpikenetResult<T> = Result<T, SpikenetError>;

#[derive(Debug, thiserror::Error)]
pub enum SpikenetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Development(#[from] DevelopmentError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("Worker {rank} failed: {source}")]
    Worker {
        rank: Rank,
        #[source]
        source: Box<SpikenetError>,
    },

    #[error("Coordinator returned no gathered results")]
    MissingGather,

    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
