// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for the simulation driver.
*/

use spikenet_cluster::ClusterError;
use spikenet_neural::NeuralError;
use spikenet_plasticity::PlasticityError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Reward is enabled but no actuator is attached")]
    MissingActuator,

    #[error("Unknown population: {0}")]
    UnknownPopulation(String),

    #[error("Actuator error: {0}")]
    Actuator(String),

    #[error("Driver is {0:?} and cannot step")]
    InvalidState(crate::driver::DriverState),

    #[error(transparent)]
    Model(#[from] NeuralError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Plasticity(#[from] PlasticityError),
}
