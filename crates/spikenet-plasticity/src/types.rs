// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for plastic synapse management.
*/

use spikenet_development::DevelopmentError;

/// Result type for plasticity operations
pub type PlasticityResult<T> = Result<T, PlasticityError>;

#[derive(Debug, thiserror::Error)]
pub enum PlasticityError {
    #[error("Unknown population in plastic pair: {0}")]
    UnknownPopulation(String),

    #[error("Connection {0} references a cell outside the network")]
    UnknownCell(usize),

    #[error(transparent)]
    Development(#[from] DevelopmentError),
}
