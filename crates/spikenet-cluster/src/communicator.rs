// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Collective operations between workers.

Every collective blocks until all workers took part; there is no timeout.
All workers must issue the same collectives in the same order.
*/

use spikenet_neural::{Rank, SpikeEvent};

use crate::types::ClusterResult;

/// Rank of the coordinator
pub const COORDINATOR: Rank = 0;

/// Message-passing seam between the workers of one run
pub trait Communicator: Send {
    fn rank(&self) -> Rank;

    fn size(&self) -> usize;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Send `local` to every other worker and return the spikes received
    /// from them, in ascending rank order. Doubles as a barrier.
    fn exchange_spikes(&self, local: &[SpikeEvent]) -> ClusterResult<Vec<SpikeEvent>>;

    /// The coordinator passes `Some(value)`; every worker returns it
    fn broadcast_reward(&self, value: Option<f64>) -> ClusterResult<f64>;

    /// Collect one buffer per worker at the coordinator, in rank order.
    /// Other workers get `None`.
    fn gather_bytes(&self, bytes: Vec<u8>) -> ClusterResult<Option<Vec<Vec<u8>>>>;

    fn barrier(&self) -> ClusterResult<()>;
}

/// Communicator of a run with a single worker
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWorker;

impl Communicator for SingleWorker {
    fn rank(&self) -> Rank {
        COORDINATOR
    }

    fn size(&self) -> usize {
        1
    }

    fn exchange_spikes(&self, _local: &[SpikeEvent]) -> ClusterResult<Vec<SpikeEvent>> {
        Ok(Vec::new())
    }

    fn broadcast_reward(&self, value: Option<f64>) -> ClusterResult<f64> {
        Ok(value.unwrap_or(0.0))
    }

    fn gather_bytes(&self, bytes: Vec<u8>) -> ClusterResult<Option<Vec<Vec<u8>>>> {
        Ok(Some(vec![bytes]))
    }

    fn barrier(&self) -> ClusterResult<()> {
        Ok(())
    }
}
