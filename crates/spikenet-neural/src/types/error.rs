// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neuron-model operations

use super::ids::Gid;

/// Result type for neuron-model operations
pub type Result<T> = std::result::Result<T, NeuralError>;

#[derive(Debug, thiserror::Error)]
pub enum NeuralError {
    #[error("Unknown cell: {0}")]
    UnknownCell(Gid),

    #[error("Cell created twice: {0}")]
    DuplicateCell(Gid),

    #[error("Receptor count mismatch: expected {expected}, got {actual}")]
    ReceptorCountMismatch { expected: usize, actual: usize },

    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),
}
