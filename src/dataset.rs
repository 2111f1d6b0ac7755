// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The consolidated result of a run, as handed to a [`crate::DatasetSink`]

use serde::{Deserialize, Serialize};
use spikenet_cluster::GatheredRun;
use spikenet_config::SpikenetConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub cell_id: u32,
    pub spike_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub pre_id: u32,
    pub post_id: u32,
    pub distance: f64,
    pub delay: f64,
    /// Generated weight per receptor channel
    pub weight: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticityEntry {
    /// Position in the gathered synapse list
    pub synapse_id: usize,
    pub pre_id: u32,
    pub post_id: u32,
    pub receptor: usize,
    /// Sparse `(time, weight)` history
    pub log: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPotentialRecord {
    pub population_id: u16,
    pub population: String,
    pub time: f64,
    pub potential: f64,
}

/// Run-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub seed: u64,
    pub duration: f64,
    pub workers: usize,
    pub cells: usize,
    pub receptors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub info: RunInfo,
    pub spikes: Vec<SpikeRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub plasticity: Vec<PlasticityEntry>,
    pub field_potentials: Vec<FieldPotentialRecord>,
}

impl Dataset {
    pub fn from_run(run: GatheredRun, config: &SpikenetConfig) -> Self {
        let info = RunInfo {
            seed: config.network.seed,
            duration: config.simulation.duration,
            workers: run.workers,
            cells: config.network.total_cells(),
            receptors: config.network.receptors.iter().map(|r| r.name.clone()).collect(),
        };

        let spikes = run
            .spikes
            .into_iter()
            .map(|s| SpikeRecord {
                cell_id: s.gid.0,
                spike_time: s.time,
            })
            .collect();

        let connections = run
            .connections
            .into_iter()
            .map(|c| ConnectionRecord {
                pre_id: c.pre.0,
                post_id: c.post.0,
                distance: c.distance,
                delay: c.delay,
                weight: c.weights,
            })
            .collect();

        let plasticity = run
            .plasticity
            .into_iter()
            .enumerate()
            .map(|(synapse_id, record)| PlasticityEntry {
                synapse_id,
                pre_id: record.synapse.pre.0,
                post_id: record.synapse.post.0,
                receptor: record.synapse.receptor,
                log: record.log,
            })
            .collect();

        let field_potentials = run
            .field_potentials
            .into_iter()
            .flat_map(|series| {
                let population_id = series.population.0;
                let population = series.name;
                series
                    .samples
                    .into_iter()
                    .map(move |(time, potential)| FieldPotentialRecord {
                        population_id,
                        population: population.clone(),
                        time,
                        potential,
                    })
            })
            .collect();

        Self {
            info,
            spikes,
            connections,
            plasticity,
            field_potentials,
        }
    }
}
