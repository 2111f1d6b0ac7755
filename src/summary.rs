// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-of-run statistics

use serde::Serialize;
use spikenet_development::ConnectivityStats;
use spikenet_neural::{Connection, Gid};
use tracing::info;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub cells: usize,
    pub spikes: usize,
    /// Spikes per cell per second
    pub mean_rate_hz: f64,
    pub connectivity: ConnectivityStats,
    pub plastic_per_cell: f64,
}

impl RunSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let cells = dataset.info.cells;
        let seconds = dataset.info.duration / 1000.0;
        let mean_rate_hz = if cells > 0 && seconds > 0.0 {
            dataset.spikes.len() as f64 / cells as f64 / seconds
        } else {
            0.0
        };

        // stats only need distances and delays
        let connections: Vec<Connection> = dataset
            .connections
            .iter()
            .map(|c| Connection {
                pre: Gid(c.pre_id),
                post: Gid(c.post_id),
                distance: c.distance,
                delay: c.delay,
                weights: Vec::new(),
            })
            .collect();

        Self {
            cells,
            spikes: dataset.spikes.len(),
            mean_rate_hz,
            connectivity: ConnectivityStats::from_connections(&connections, cells),
            plastic_per_cell: if cells > 0 {
                dataset.plasticity.len() as f64 / cells as f64
            } else {
                0.0
            },
        }
    }

    pub fn log(&self) {
        info!(target: "spikenet", "Spikes: {} ({:.2} Hz per cell)", self.spikes, self.mean_rate_hz);
        info!(
            target: "spikenet",
            "Connections: {} ({:.2} per cell, {:.2} plastic per cell)",
            self.connectivity.connections,
            self.connectivity.connections_per_cell,
            self.plastic_per_cell
        );
        info!(
            target: "spikenet",
            "Mean connection distance {:.1} um, mean delay {:.2} ms",
            self.connectivity.mean_distance,
            self.connectivity.mean_delay
        );
    }
}
