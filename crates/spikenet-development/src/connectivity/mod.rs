// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity generation.

For every post cell a worker owns (drive cells excluded), the generator
decides which cells connect onto it and with which distance and delay.
Generation for a post cell is a pure function of the seed, its GID and the
configuration: the draw stream is seeded from `(seed, post GID)`, so the
result does not depend on how cells are partitioned or on execution order.

Order of the returned connections: ascending post GID, then ascending pre
GID.
*/

pub mod antagonist;
pub mod distance;
pub mod drive;
pub mod probability;

use std::collections::BTreeMap;

use ndarray::Array1;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use spikenet_config::SpikenetConfig;
use spikenet_neural::rng::{stream, StreamDomain};
use spikenet_neural::{Connection, Gid};
use tracing::{debug, info, warn};

use crate::layout::SpatialLayout;
use crate::partition::Partition;
use crate::populations::PopulationTable;
use crate::types::DevelopmentResult;
use crate::weights::WeightCalculator;

pub use antagonist::MotorPair;
pub use distance::{distances_to, CandidateDistances, Geometry};
pub use drive::DriveRule;
pub use probability::ProbabilityTable;

/// Generates incoming connections for post cells
pub struct ConnectivityGenerator<'a> {
    populations: &'a PopulationTable,
    layout: &'a SpatialLayout,
    seed: u64,
    geometry: Geometry,
    min_delay: f64,
    velocity: f64,
    probabilities: ProbabilityTable,
    weights: WeightCalculator,
    drive_rules: Vec<DriveRule>,
    motor_pairs: Vec<MotorPair>,
}

/// Distances of a chosen presynaptic cell
#[derive(Debug, Clone, Copy)]
struct Candidate {
    planar: f64,
    spatial: f64,
}

impl<'a> ConnectivityGenerator<'a> {
    pub fn new(
        config: &SpikenetConfig,
        populations: &'a PopulationTable,
        layout: &'a SpatialLayout,
    ) -> DevelopmentResult<Self> {
        Ok(Self {
            populations,
            layout,
            seed: config.network.seed,
            geometry: Geometry {
                model_size: config.network.model_size,
                toroidal: config.connectivity.toroidal,
            },
            min_delay: config.connectivity.min_delay,
            velocity: config.connectivity.velocity,
            probabilities: ProbabilityTable::from_config(config, populations)?,
            weights: WeightCalculator::from_config(config, populations)?,
            drive_rules: DriveRule::resolve_all(config, populations)?,
            motor_pairs: MotorPair::resolve_all(populations),
        })
    }

    /// Presynaptic cells accepted by the probabilistic draw for `post`
    ///
    /// One uniform draw per network cell, in GID order, from the
    /// `(seed, post)` stream; candidate `j` is accepted iff `p[j] > draw[j]`.
    pub fn draw(&self, post: Gid, distances: &CandidateDistances) -> Vec<Gid> {
        let probabilities = self
            .probabilities
            .candidates(self.populations, post, &distances.planar);
        let mut rng = stream(self.seed, StreamDomain::Connectivity, post.0 as u64);
        let draws = Array1::from_iter((0..probabilities.len()).map(|_| rng.gen::<f64>()));

        probabilities
            .iter()
            .zip(draws.iter())
            .enumerate()
            .filter(|(_, (p, r))| p > r)
            .map(|(j, _)| Gid::from(j))
            .collect()
    }

    /// All incoming connections of one post cell
    pub fn connections_for(&self, post: Gid) -> Vec<Connection> {
        let post_population = self.populations.of(post);
        if post_population.is_drive() {
            return Vec::new();
        }

        let distances = distances_to(self.layout, post, &self.geometry);
        let geometric = |pre: Gid| Candidate {
            planar: distances.planar[pre.index()],
            spatial: distances.spatial[pre.index()],
        };

        let mut chosen: BTreeMap<Gid, Candidate> = BTreeMap::new();

        let mirrored = self
            .motor_pairs
            .iter()
            .find(|pair| pair.inhibitory == post_population.id);
        let drawn = match mirrored {
            Some(pair) => {
                let motor_cell = pair.mirrored(post);
                let motor_distances = distances_to(self.layout, motor_cell, &self.geometry);
                self.draw(motor_cell, &motor_distances)
            }
            None => self.draw(post, &distances),
        };
        for pre in drawn.into_iter().filter(|&pre| pre != post) {
            chosen.insert(pre, geometric(pre));
        }

        for pair in self
            .motor_pairs
            .iter()
            .filter(|pair| pair.motor == post_population.id)
        {
            for pre in pair.antagonist_inputs(post).map(Gid::from) {
                chosen.entry(pre).or_insert_with(|| geometric(pre));
            }
        }

        for rule in self
            .drive_rules
            .iter()
            .filter(|rule| rule.target == post_population.id)
        {
            let source = self.populations.get(rule.source);
            let sources = rule.sources_for(source, post_population, post);
            if sources.is_empty() {
                warn!(
                    target: "spikenet-development",
                    "No drive source in {} for {} ({}); cell left without drive input",
                    source.name,
                    post,
                    post_population.name
                );
            }
            for pre in sources {
                chosen.insert(
                    pre,
                    Candidate {
                        planar: rule.distance,
                        spatial: rule.distance,
                    },
                );
            }
        }

        chosen
            .into_iter()
            .map(|(pre, candidate)| Connection {
                pre,
                post,
                distance: candidate.planar,
                delay: self.min_delay + candidate.spatial / self.velocity,
                weights: self
                    .weights
                    .weights(self.populations.of(pre).id, post_population.id),
            })
            .collect()
    }

    /// Incoming connections of every cell owned by `partition`
    pub fn generate_local(&self, partition: &Partition) -> Vec<Connection> {
        #[cfg(feature = "parallel")]
        let per_cell: Vec<Vec<Connection>> = partition
            .owned()
            .par_iter()
            .map(|&post| self.connections_for(post))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let per_cell: Vec<Vec<Connection>> = partition
            .owned()
            .iter()
            .map(|&post| self.connections_for(post))
            .collect();

        let connections: Vec<Connection> = per_cell.into_iter().flatten().collect();

        debug!(
            target: "spikenet-development",
            "Worker {}: {} connections onto {} cells",
            partition.rank(),
            connections.len(),
            partition.len()
        );
        if partition.rank() == 0 {
            info!(
                target: "spikenet-development",
                "Generated connectivity: {} connections on coordinator",
                connections.len()
            );
        }
        connections
    }
}
