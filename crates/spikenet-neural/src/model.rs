// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron-model collaborator contract
//!
//! The driver never integrates membrane dynamics itself. A worker owns one
//! model instance holding the state of its locally owned cells.

use crate::types::{Cell, Connection, ConnectionId, Gid, Result, SpikeEvent, WeightView};

/// Point-neuron simulator for the cells owned by one worker
pub trait NeuronModel: Send {
    /// Short name for logging
    fn model_name(&self) -> &'static str;

    /// Instantiate a locally owned cell with independent state
    fn create(&mut self, cell: &Cell) -> Result<()>;

    /// Register an incoming connection onto a locally owned post cell
    fn connect(&mut self, id: ConnectionId, connection: &Connection) -> Result<()>;

    /// Integrate all local cells from the current time up to `t_stop` (ms).
    ///
    /// Synaptic transmission reads weights through `weights` at delivery
    /// time, so plastic changes take effect immediately.
    fn advance(&mut self, t_stop: f64, weights: &dyn WeightView) -> Result<()>;

    /// Queue spikes emitted by cells owned by other workers
    fn deliver(&mut self, spikes: &[SpikeEvent]);

    /// All spike times of a local cell, ascending
    fn spike_times(&self, gid: Gid) -> &[f64];

    /// Read a named state variable of a local cell (e.g. `"V"`)
    fn read_state(&self, gid: Gid, variable: &str) -> Option<f64>;

    /// Current model time (ms)
    fn time(&self) -> f64;
}
