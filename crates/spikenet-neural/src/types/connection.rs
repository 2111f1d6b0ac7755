// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connections and weight access

use super::ids::Gid;
use serde::{Deserialize, Serialize};

/// Index of a connection in its worker's connection list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub usize);

/// A generated connection.
///
/// `weights` holds the generated weight per receptor channel. Once a plastic
/// synapse is bound to a channel, that synapse owns the live value and
/// readers go through a [`WeightView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub pre: Gid,
    pub post: Gid,
    /// Planar (possibly toroidal) distance (µm)
    pub distance: f64,
    /// Conduction delay (ms)
    pub delay: f64,
    pub weights: Vec<f64>,
}

impl Connection {
    pub fn receptor_count(&self) -> usize {
        self.weights.len()
    }
}

/// Read access to the live weight of a (connection, receptor) pair
pub trait WeightView {
    fn weight(&self, connection: ConnectionId, receptor: usize) -> f64;
}

/// Static weights: the generated values, no plasticity
impl WeightView for Vec<Connection> {
    fn weight(&self, connection: ConnectionId, receptor: usize) -> f64 {
        self.get(connection.0)
            .and_then(|c| c.weights.get(receptor))
            .copied()
            .unwrap_or(0.0)
    }
}
