// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet Cluster
//!
//! SPMD worker communication:
//! - the [`Communicator`] trait (spike exchange, reward broadcast, gather,
//!   barrier)
//! - [`LocalCluster`]: workers as threads joined by per-pair FIFO channels
//! - [`WorkerBundle`] packing and the end-of-run [`gather`]
//!
//! A failed worker is never retried. Its peers see
//! [`ClusterError::Disconnected`] on their next collective.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bundle;
pub mod communicator;
pub mod local;
pub mod message;
pub mod types;

pub use bundle::{gather, FieldPotentialSeries, GatheredRun, WorkerBundle};
pub use communicator::{Communicator, SingleWorker, COORDINATOR};
pub use local::{LocalCluster, LocalCommunicator};
pub use message::Message;
pub use types::{ClusterError, ClusterResult};
