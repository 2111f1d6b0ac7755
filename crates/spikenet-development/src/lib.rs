// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# spikenet Development

Builds one worker's share of the network from the configuration:
- Partitioning (round-robin GID ownership)
- Spatial layout (deterministic 3-D placement)
- Connectivity (distance- and population-dependent draws, drive wiring,
  motor antagonist pairing)
- Weights (polarity x population pair x receptor)

Every worker computes the full population table and layout identically, then
generates incoming connections only for the cells it owns. The union over
workers does not depend on the worker count.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connectivity;
pub mod layout;
pub mod partition;
pub mod populations;
pub mod types;
pub mod weights;

use serde::Serialize;
use spikenet_config::SpikenetConfig;
use spikenet_neural::{Cell, Connection};
use tracing::info;

pub use connectivity::{ConnectivityGenerator, DriveRule, MotorPair};
pub use layout::SpatialLayout;
pub use partition::Partition;
pub use populations::{Population, PopulationTable, Role};
pub use types::{DevelopmentError, DevelopmentResult};
pub use weights::WeightCalculator;

/// One worker's share of the developed network
#[derive(Debug, Clone)]
pub struct LocalNetwork {
    pub populations: PopulationTable,
    pub layout: SpatialLayout,
    pub partition: Partition,
    /// Owned cells in local-index order
    pub cells: Vec<Cell>,
    /// Incoming connections of owned cells
    pub connections: Vec<Connection>,
}

/// Develop the share of worker `rank` out of `workers`
pub fn develop(
    config: &SpikenetConfig,
    workers: usize,
    rank: usize,
) -> DevelopmentResult<LocalNetwork> {
    let populations = PopulationTable::from_config(&config.network)?;
    let partition = Partition::round_robin(populations.total_cells(), workers, rank)?;
    let layout = SpatialLayout::generate(&config.network, &populations);
    let cells = populations.local_cells(&layout, &partition);

    if rank == 0 {
        info!(
            target: "spikenet-development",
            "Developing {} cells in {} populations across {} workers",
            populations.total_cells(),
            populations.len(),
            workers
        );
    }

    let connections = ConnectivityGenerator::new(config, &populations, &layout)?
        .generate_local(&partition);

    Ok(LocalNetwork {
        populations,
        layout,
        partition,
        cells,
        connections,
    })
}

/// Aggregate connectivity figures, for the end-of-run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectivityStats {
    pub connections: usize,
    pub connections_per_cell: f64,
    pub mean_distance: f64,
    pub mean_delay: f64,
}

impl ConnectivityStats {
    /// `cells` is the number of cells the connections target (drive cells
    /// included, as they count towards the network size)
    pub fn from_connections(connections: &[Connection], cells: usize) -> Self {
        let n = connections.len();
        if n == 0 {
            return Self::default();
        }
        let (distance, delay) = connections
            .iter()
            .fold((0.0, 0.0), |(d, t), c| (d + c.distance, t + c.delay));
        Self {
            connections: n,
            connections_per_cell: if cells > 0 { n as f64 / cells as f64 } else { 0.0 },
            mean_distance: distance / n as f64,
            mean_delay: delay / n as f64,
        }
    }
}
