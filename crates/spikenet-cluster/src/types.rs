// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for worker communication.
*/

use spikenet_neural::Rank;

/// Result type for cluster operations
pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// A peer exited; its channel ends are gone
    #[error("Worker {rank}: peer {peer} disconnected")]
    Disconnected { rank: Rank, peer: Rank },

    #[error("Worker {rank}: expected {expected} from {peer}, got {got}")]
    UnexpectedMessage {
        rank: Rank,
        peer: Rank,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Bundle codec error: {0}")]
    Codec(String),

    #[error("Worker {0} panicked")]
    WorkerPanicked(Rank),

    #[error("Failed to start worker {rank}: {reason}")]
    Spawn { rank: Rank, reason: String },

    #[error("Invalid cluster size: {0}")]
    InvalidSize(usize),
}
