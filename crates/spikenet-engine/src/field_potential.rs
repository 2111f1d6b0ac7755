// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-population field-potential sampling

use spikenet_cluster::FieldPotentialSeries;
use spikenet_config::FieldPotentialConfig;
use spikenet_development::PopulationTable;
use spikenet_neural::{Cell, Gid, NeuronModel};
use tracing::warn;

use crate::types::{EngineError, EngineResult};

struct Recorded {
    series: FieldPotentialSeries,
    cells: Vec<Gid>,
}

/// Sums a state variable over the locally owned cells of each recorded
/// population, once per increment
pub struct FieldPotentialRecorder {
    variable: String,
    recorded: Vec<Recorded>,
}

impl FieldPotentialRecorder {
    /// `None` when recording is disabled. An empty population list records
    /// every non-drive population.
    pub fn from_config(
        config: &FieldPotentialConfig,
        populations: &PopulationTable,
        local_cells: &[Cell],
    ) -> EngineResult<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }

        let selected = if config.populations.is_empty() {
            populations.iter().filter(|p| !p.is_drive()).collect::<Vec<_>>()
        } else {
            config
                .populations
                .iter()
                .map(|name| {
                    populations
                        .by_name(name)
                        .map_err(|_| EngineError::UnknownPopulation(name.clone()))
                })
                .collect::<EngineResult<Vec<_>>>()?
        };

        let recorded = selected
            .into_iter()
            .map(|population| Recorded {
                series: FieldPotentialSeries {
                    population: population.id,
                    name: population.name.clone(),
                    samples: Vec::new(),
                },
                cells: local_cells
                    .iter()
                    .filter(|c| c.population == population.id)
                    .map(|c| c.gid)
                    .collect(),
            })
            .collect();

        Ok(Some(Self {
            variable: config.variable.clone(),
            recorded,
        }))
    }

    /// Append one sample per population at time `t`
    pub fn sample(&mut self, t: f64, model: &dyn NeuronModel) {
        for recorded in &mut self.recorded {
            let total: f64 = recorded
                .cells
                .iter()
                .filter_map(|&gid| model.read_state(gid, &self.variable))
                .sum();
            if !total.is_finite() {
                warn!(
                    target: "spikenet-engine",
                    "Non-finite field potential {} for {} at {:.1} ms",
                    total,
                    recorded.series.name,
                    t
                );
            }
            recorded.series.samples.push((t, total));
        }
    }

    pub fn into_series(self) -> Vec<FieldPotentialSeries> {
        self.recorded.into_iter().map(|r| r.series).collect()
    }
}
