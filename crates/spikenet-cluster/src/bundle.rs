// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
End-of-run worker bundles and their consolidation at the coordinator.

A bundle is packed with bincode, gathered at rank 0 and unpacked in
ascending rank order. Spikes, connections and plasticity records are
concatenated; field-potential series are summed sample by sample.
*/

use serde::{Deserialize, Serialize};
use spikenet_neural::{Connection, PopulationId, Rank, SpikeEvent};
use spikenet_plasticity::PlasticityRecord;
use tracing::{debug, info, warn};

use crate::communicator::Communicator;
use crate::types::{ClusterError, ClusterResult};

/// Per-population aggregate of a state variable sampled once per increment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPotentialSeries {
    pub population: PopulationId,
    pub name: String,
    /// `(time, summed value)` samples
    pub samples: Vec<(f64, f64)>,
}

/// Everything one worker contributes to the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerBundle {
    pub rank: Rank,
    pub spikes: Vec<SpikeEvent>,
    pub connections: Vec<Connection>,
    pub plasticity: Vec<PlasticityRecord>,
    pub field_potentials: Vec<FieldPotentialSeries>,
}

impl WorkerBundle {
    pub fn pack(&self) -> ClusterResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ClusterError::Codec(e.to_string()))
    }

    pub fn unpack(bytes: &[u8]) -> ClusterResult<Self> {
        bincode::deserialize(bytes).map_err(|e| ClusterError::Codec(e.to_string()))
    }
}

/// Consolidated results of all workers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatheredRun {
    pub workers: usize,
    pub spikes: Vec<SpikeEvent>,
    pub connections: Vec<Connection>,
    pub plasticity: Vec<PlasticityRecord>,
    pub field_potentials: Vec<FieldPotentialSeries>,
}

impl GatheredRun {
    /// Merge bundles in ascending rank order
    pub fn merge(mut bundles: Vec<WorkerBundle>) -> Self {
        bundles.sort_by_key(|b| b.rank);
        let mut run = GatheredRun {
            workers: bundles.len(),
            ..Default::default()
        };
        for bundle in bundles {
            run.spikes.extend(bundle.spikes);
            run.connections.extend(bundle.connections);
            run.plasticity.extend(bundle.plasticity);
            for series in bundle.field_potentials {
                run.add_field_potential(series);
            }
        }
        run
    }

    fn add_field_potential(&mut self, series: FieldPotentialSeries) {
        let Some(total) = self
            .field_potentials
            .iter_mut()
            .find(|s| s.population == series.population)
        else {
            self.field_potentials.push(series);
            return;
        };

        if total.samples.len() != series.samples.len() {
            warn!(
                target: "spikenet-cluster",
                "Field potential of {} has {} samples on one worker and {} on another",
                series.name,
                total.samples.len(),
                series.samples.len()
            );
        }
        for (i, (time, value)) in series.samples.into_iter().enumerate() {
            match total.samples.get_mut(i) {
                Some(sample) => sample.1 += value,
                None => total.samples.push((time, value)),
            }
        }
    }
}

/// Gather every worker's bundle at the coordinator.
///
/// Returns the merged run on the coordinator and `None` elsewhere.
pub fn gather(comm: &dyn Communicator, bundle: &WorkerBundle) -> ClusterResult<Option<GatheredRun>> {
    let bytes = bundle.pack()?;
    debug!(
        target: "spikenet-cluster",
        "Worker {}: bundle of {} bytes ({} spikes, {} connections)",
        comm.rank(),
        bytes.len(),
        bundle.spikes.len(),
        bundle.connections.len()
    );

    let Some(buffers) = comm.gather_bytes(bytes)? else {
        return Ok(None);
    };
    let bundles = buffers
        .iter()
        .map(|buffer| WorkerBundle::unpack(buffer))
        .collect::<ClusterResult<Vec<_>>>()?;
    let run = GatheredRun::merge(bundles);
    info!(
        target: "spikenet-cluster",
        "Gathered {} workers: {} spikes, {} connections, {} plastic synapses",
        run.workers,
        run.spikes.len(),
        run.connections.len(),
        run.plasticity.len()
    );
    Ok(Some(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_neural::Gid;

    fn series(value: f64) -> FieldPotentialSeries {
        FieldPotentialSeries {
            population: PopulationId(1),
            name: "ER5".to_string(),
            samples: vec![(1.0, value), (2.0, 2.0 * value)],
        }
    }

    #[test]
    fn test_pack_unpack() {
        let bundle = WorkerBundle {
            rank: 2,
            spikes: vec![SpikeEvent::new(Gid(4), 1.5)],
            field_potentials: vec![series(-60.0)],
            ..Default::default()
        };
        let bytes = bundle.pack().unwrap();
        assert_eq!(WorkerBundle::unpack(&bytes).unwrap(), bundle);
        assert!(WorkerBundle::unpack(&bytes[..3]).is_err());
    }

    #[test]
    fn test_merge_orders_by_rank_and_sums_field_potentials() {
        let b0 = WorkerBundle {
            rank: 0,
            spikes: vec![SpikeEvent::new(Gid(0), 3.0)],
            field_potentials: vec![series(1.0)],
            ..Default::default()
        };
        let b1 = WorkerBundle {
            rank: 1,
            spikes: vec![SpikeEvent::new(Gid(1), 2.0)],
            field_potentials: vec![series(10.0)],
            ..Default::default()
        };
        let run = GatheredRun::merge(vec![b1, b0]);
        assert_eq!(run.workers, 2);
        assert_eq!(run.spikes[0].gid, Gid(0));
        assert_eq!(run.spikes[1].gid, Gid(1));
        assert_eq!(run.field_potentials.len(), 1);
        assert_eq!(run.field_potentials[0].samples, vec![(1.0, 11.0), (2.0, 22.0)]);
    }
}
