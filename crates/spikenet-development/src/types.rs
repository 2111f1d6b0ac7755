// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for network development.
*/

/// Result type for development operations
pub type DevelopmentResult<T> = Result<T, DevelopmentError>;

/// Errors that can occur while partitioning, laying out or wiring the network
#[derive(Debug, thiserror::Error)]
pub enum DevelopmentError {
    #[error("Unknown population: {0}")]
    UnknownPopulation(String),

    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    #[error("Receptor count mismatch for {pair}: expected {expected}, got {actual}")]
    ReceptorCountMismatch {
        pair: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
