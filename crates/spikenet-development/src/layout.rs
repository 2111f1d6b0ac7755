// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Deterministic 3-D cell placement.

Every worker computes the full layout from the global seed alone. The layout
stream draws all x coordinates, then all y, then all z, each in ascending GID
order. x and y are uniform over `[0, model_size)`; z is placed uniformly
inside the population's depth band scaled by the cortical thickness.
*/

use ndarray::Array1;
use rand::Rng;
use spikenet_config::NetworkConfig;
use spikenet_neural::rng::{stream, StreamDomain};
use spikenet_neural::{Gid, Position};

use crate::populations::PopulationTable;

/// Coordinates of every cell, stored per axis
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialLayout {
    x: Array1<f64>,
    y: Array1<f64>,
    z: Array1<f64>,
}

impl SpatialLayout {
    pub fn generate(network: &NetworkConfig, populations: &PopulationTable) -> Self {
        let n = populations.total_cells();
        let mut rng = stream(network.seed, StreamDomain::Layout, 0);

        let x = Array1::from_iter((0..n).map(|_| network.model_size * rng.gen::<f64>()));
        let y = Array1::from_iter((0..n).map(|_| network.model_size * rng.gen::<f64>()));
        let z = Array1::from_iter((0..n).map(|gid| {
            let [low, high] = populations.of(Gid::from(gid)).depth_band;
            let u: f64 = rng.gen();
            network.cortical_thickness * (u * (high - low) + low)
        }));

        tracing::debug!(target: "spikenet-development", "Placed {} cells", n);
        Self { x, y, z }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn position(&self, gid: Gid) -> Position {
        let i = gid.index();
        Position::new(self.x[i], self.y[i], self.z[i])
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn z(&self) -> &Array1<f64> {
        &self.z
    }
}
