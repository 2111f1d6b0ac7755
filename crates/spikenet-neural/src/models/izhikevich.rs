// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Izhikevich Reference Network
//!
//! ## Model Dynamics
//!
//! ```text
//! Synaptic current (conductance based, one conductance per receptor):
//!     I_syn = Σ_r g_r × (E_r - v)
//!     g_r decays with time constant tau_r; a delivered spike adds the
//!     live connection weight of channel r to g_r
//!
//! Membrane (Izhikevich 2003):
//!     v' = 0.04 v² + 5 v + 140 - u + I_syn
//!     u' = a (b v - u)
//!     if v ≥ 30 mV: v ← c, u ← u + d, spike
//! ```
//!
//! Drive cells have no membrane: they emit a Poisson spike train. Every cell
//! may also receive Poisson background input on receptor 0. All spike trains
//! come from per-GID RNG streams.

use crate::model::NeuronModel;
use crate::rng::{stream, StreamDomain};
use crate::types::{
    Cell, CellClass, Connection, ConnectionId, Gid, NeuralError, Result, SpikeEvent, WeightView,
};
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

const SPIKE_PEAK_MV: f64 = 30.0;
const BACKGROUND_STREAM_OFFSET: u64 = 1 << 32;

/// Kinetics of one receptor channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceptorKinetics {
    /// Decay time constant (ms)
    pub tau: f64,
    /// Reversal potential (mV)
    pub reversal: f64,
}

impl ReceptorKinetics {
    /// AMPA, NMDA, GABA-A, GABA-B
    pub fn cortical_defaults() -> Vec<ReceptorKinetics> {
        vec![
            ReceptorKinetics { tau: 5.0, reversal: 0.0 },
            ReceptorKinetics { tau: 150.0, reversal: 0.0 },
            ReceptorKinetics { tau: 6.0, reversal: -70.0 },
            ReceptorKinetics { tau: 150.0, reversal: -90.0 },
        ]
    }
}

/// Izhikevich (a, b, c, d) parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IzhikevichParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl IzhikevichParams {
    /// Parameter set for a cell class; `None` for drive sources
    pub fn for_class(class: CellClass) -> Option<IzhikevichParams> {
        let (a, b, c, d) = match class {
            CellClass::RegularSpiking => (0.02, 0.2, -65.0, 8.0),
            CellClass::IntrinsicallyBursting => (0.02, 0.2, -55.0, 4.0),
            CellClass::Chattering => (0.02, 0.2, -50.0, 2.0),
            CellClass::LowThreshold => (0.02, 0.25, -65.0, 2.0),
            CellClass::FastSpiking => (0.1, 0.2, -65.0, 2.0),
            CellClass::Thalamocortical => (0.02, 0.25, -65.0, 0.05),
            CellClass::ReticularThalamic => (0.02, 0.25, -65.0, 2.05),
            CellClass::Drive => return None,
        };
        Some(IzhikevichParams { a, b, c, d })
    }
}

/// Parameters of the reference network
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModelParams {
    /// Integration step (ms)
    pub dt: f64,
    pub receptors: Vec<ReceptorKinetics>,
    /// Mean rate of drive cells (Hz)
    pub drive_rate_hz: f64,
    /// Mean rate of background input per cell (Hz), 0 disables it
    pub background_rate_hz: f64,
    /// Conductance added on receptor 0 per background event
    pub background_weight: f64,
    pub seed: u64,
}

impl Default for ReferenceModelParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            receptors: ReceptorKinetics::cortical_defaults(),
            drive_rate_hz: 10.0,
            background_rate_hz: 100.0,
            background_weight: 0.05,
            seed: 1,
        }
    }
}

struct PoissonTrain {
    rng: StdRng,
    mean_interval: f64,
    next: f64,
}

impl PoissonTrain {
    fn new(mut rng: StdRng, rate_hz: f64) -> Option<Self> {
        if rate_hz <= 0.0 {
            return None;
        }
        let mean_interval = 1000.0 / rate_hz;
        let next = sample_interval(&mut rng, mean_interval);
        Some(Self {
            rng,
            mean_interval,
            next,
        })
    }

    /// Pop every event time strictly before `t`
    fn drain_before(&mut self, t: f64, out: &mut Vec<f64>) {
        while self.next < t {
            out.push(self.next);
            self.next += sample_interval(&mut self.rng, self.mean_interval);
        }
    }
}

fn sample_interval(rng: &mut StdRng, mean: f64) -> f64 {
    -mean * (1.0 - rng.gen::<f64>()).ln()
}

enum Dynamics {
    Izhikevich {
        params: IzhikevichParams,
        v: f64,
        u: f64,
    },
    Drive(Option<PoissonTrain>),
}

struct ModelCell {
    gid: Gid,
    dynamics: Dynamics,
    conductances: Vec<f64>,
    background: Option<PoissonTrain>,
}

struct Target {
    local: usize,
    delay: f64,
    connection: ConnectionId,
}

#[derive(Debug, Clone, Copy)]
struct PendingEvent {
    time: f64,
    local: usize,
    connection: ConnectionId,
}

impl PartialEq for PendingEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingEvent {}

impl PartialOrd for PendingEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.local.cmp(&other.local))
            .then(self.connection.cmp(&other.connection))
    }
}

/// Izhikevich cells plus Poisson drive sources for one worker
pub struct IzhikevichNetwork {
    params: ReferenceModelParams,
    time: f64,
    cells: Vec<ModelCell>,
    index: AHashMap<Gid, usize>,
    spikes: Vec<Vec<f64>>,
    outgoing: AHashMap<Gid, Vec<Target>>,
    pending: BinaryHeap<Reverse<PendingEvent>>,
}

impl IzhikevichNetwork {
    pub fn new(params: ReferenceModelParams) -> Result<Self> {
        if !(params.dt > 0.0) {
            return Err(NeuralError::InvalidParameter(format!(
                "integration step must be positive, got {}",
                params.dt
            )));
        }
        Ok(Self {
            params,
            time: 0.0,
            cells: Vec::new(),
            index: AHashMap::new(),
            spikes: Vec::new(),
            outgoing: AHashMap::new(),
            pending: BinaryHeap::new(),
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn route(&mut self, pre: Gid, time: f64) {
        if let Some(targets) = self.outgoing.get(&pre) {
            for target in targets {
                self.pending.push(Reverse(PendingEvent {
                    time: time + target.delay,
                    local: target.local,
                    connection: target.connection,
                }));
            }
        }
    }

    fn step(&mut self, t_next: f64, weights: &dyn WeightView) -> Vec<(Gid, f64)> {
        let dt = t_next - self.time;

        while let Some(Reverse(event)) = self.pending.peek().copied() {
            if event.time >= t_next {
                break;
            }
            self.pending.pop();
            let cell = &mut self.cells[event.local];
            for (r, g) in cell.conductances.iter_mut().enumerate() {
                *g += weights.weight(event.connection, r);
            }
        }

        let mut fired = Vec::new();
        let mut events = Vec::new();
        for cell in &mut self.cells {
            if let Some(background) = cell.background.as_mut() {
                events.clear();
                background.drain_before(t_next, &mut events);
                if let Some(g) = cell.conductances.first_mut() {
                    *g += self.params.background_weight * events.len() as f64;
                }
            }

            match &mut cell.dynamics {
                Dynamics::Izhikevich { params, v, u } => {
                    let i_syn: f64 = cell
                        .conductances
                        .iter()
                        .zip(&self.params.receptors)
                        .map(|(g, k)| g * (k.reversal - *v))
                        .sum();
                    // Two half steps on v for stability
                    for _ in 0..2 {
                        *v += 0.5 * dt * (0.04 * *v * *v + 5.0 * *v + 140.0 - *u + i_syn);
                    }
                    *u += dt * params.a * (params.b * *v - *u);
                    if *v >= SPIKE_PEAK_MV || !v.is_finite() {
                        *v = params.c;
                        *u += params.d;
                        fired.push((cell.gid, t_next));
                    }
                }
                Dynamics::Drive(train) => {
                    if let Some(train) = train.as_mut() {
                        events.clear();
                        train.drain_before(t_next, &mut events);
                        fired.extend(events.iter().map(|&t| (cell.gid, t)));
                    }
                }
            }

            for (g, k) in cell.conductances.iter_mut().zip(&self.params.receptors) {
                *g *= (-dt / k.tau).exp();
            }
        }
        fired
    }
}

impl NeuronModel for IzhikevichNetwork {
    fn model_name(&self) -> &'static str {
        "Izhikevich reference network"
    }

    fn create(&mut self, cell: &Cell) -> Result<()> {
        if self.index.contains_key(&cell.gid) {
            return Err(NeuralError::DuplicateCell(cell.gid));
        }
        let gid_key = cell.gid.0 as u64;
        let dynamics = match IzhikevichParams::for_class(cell.class) {
            Some(params) => {
                let v = params.c;
                Dynamics::Izhikevich {
                    params,
                    v,
                    u: params.b * v,
                }
            }
            None => Dynamics::Drive(PoissonTrain::new(
                stream(self.params.seed, StreamDomain::Drive, gid_key),
                self.params.drive_rate_hz,
            )),
        };
        let background = if cell.class.is_drive() {
            None
        } else {
            PoissonTrain::new(
                stream(
                    self.params.seed,
                    StreamDomain::Drive,
                    gid_key + BACKGROUND_STREAM_OFFSET,
                ),
                self.params.background_rate_hz,
            )
        };

        self.index.insert(cell.gid, self.cells.len());
        self.cells.push(ModelCell {
            gid: cell.gid,
            dynamics,
            conductances: vec![0.0; self.params.receptors.len()],
            background,
        });
        self.spikes.push(Vec::new());
        Ok(())
    }

    fn connect(&mut self, id: ConnectionId, connection: &Connection) -> Result<()> {
        if connection.receptor_count() != self.params.receptors.len() {
            return Err(NeuralError::ReceptorCountMismatch {
                expected: self.params.receptors.len(),
                actual: connection.receptor_count(),
            });
        }
        let local = *self
            .index
            .get(&connection.post)
            .ok_or(NeuralError::UnknownCell(connection.post))?;
        self.outgoing.entry(connection.pre).or_default().push(Target {
            local,
            delay: connection.delay,
            connection: id,
        });
        Ok(())
    }

    fn advance(&mut self, t_stop: f64, weights: &dyn WeightView) -> Result<()> {
        while t_stop - self.time > 1e-9 {
            let t_next = (self.time + self.params.dt).min(t_stop);
            let fired = self.step(t_next, weights);
            self.time = t_next;
            for (gid, t) in fired {
                if let Some(&local) = self.index.get(&gid) {
                    self.spikes[local].push(t);
                }
                self.route(gid, t);
            }
        }
        Ok(())
    }

    fn deliver(&mut self, spikes: &[SpikeEvent]) {
        for spike in spikes {
            self.route(spike.gid, spike.time);
        }
    }

    fn spike_times(&self, gid: Gid) -> &[f64] {
        self.index
            .get(&gid)
            .map(|&local| self.spikes[local].as_slice())
            .unwrap_or(&[])
    }

    fn read_state(&self, gid: Gid, variable: &str) -> Option<f64> {
        let cell = &self.cells[*self.index.get(&gid)?];
        match (&cell.dynamics, variable) {
            (Dynamics::Izhikevich { v, .. }, "V" | "v") => Some(*v),
            (Dynamics::Izhikevich { u, .. }, "u") => Some(*u),
            _ => None,
        }
    }

    fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Polarity, PopulationId, Position};

    fn cell(gid: u32, class: CellClass) -> Cell {
        Cell {
            gid: Gid(gid),
            population: PopulationId(0),
            polarity: Polarity::Excitatory,
            class,
            position: Position::default(),
            rank: 0,
            local_index: gid as usize,
        }
    }

    fn quiet_params() -> ReferenceModelParams {
        ReferenceModelParams {
            background_rate_hz: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_resting_cell_stays_silent() {
        let mut model = IzhikevichNetwork::new(quiet_params()).unwrap();
        model.create(&cell(0, CellClass::RegularSpiking)).unwrap();
        let weights: Vec<Connection> = Vec::new();
        model.advance(100.0, &weights).unwrap();
        assert!(model.spike_times(Gid(0)).is_empty());
        assert!((model.time() - 100.0).abs() < 1e-9);
        assert!(model.read_state(Gid(0), "V").is_some());
    }

    #[test]
    fn test_drive_cell_fires_reproducibly() {
        let run = || {
            let mut model = IzhikevichNetwork::new(ReferenceModelParams {
                drive_rate_hz: 200.0,
                ..quiet_params()
            })
            .unwrap();
            model.create(&cell(3, CellClass::Drive)).unwrap();
            let weights: Vec<Connection> = Vec::new();
            model.advance(500.0, &weights).unwrap();
            model.spike_times(Gid(3)).to_vec()
        };
        let first = run();
        assert!(!first.is_empty());
        assert!(first.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(first, run());
    }

    #[test]
    fn test_strong_drive_makes_target_fire() {
        let mut model = IzhikevichNetwork::new(ReferenceModelParams {
            drive_rate_hz: 200.0,
            ..quiet_params()
        })
        .unwrap();
        model.create(&cell(0, CellClass::Drive)).unwrap();
        model.create(&cell(1, CellClass::RegularSpiking)).unwrap();
        let connections = vec![Connection {
            pre: Gid(0),
            post: Gid(1),
            distance: 0.0,
            delay: 1.0,
            weights: vec![2.0, 0.0, 0.0, 0.0],
        }];
        model.connect(ConnectionId(0), &connections[0]).unwrap();
        model.advance(300.0, &connections).unwrap();
        assert!(!model.spike_times(Gid(1)).is_empty());
    }

    #[test]
    fn test_receptor_count_is_checked() {
        let mut model = IzhikevichNetwork::new(quiet_params()).unwrap();
        model.create(&cell(1, CellClass::FastSpiking)).unwrap();
        let connection = Connection {
            pre: Gid(0),
            post: Gid(1),
            distance: 0.0,
            delay: 1.0,
            weights: vec![1.0],
        };
        assert!(matches!(
            model.connect(ConnectionId(0), &connection),
            Err(NeuralError::ReceptorCountMismatch { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let mut model = IzhikevichNetwork::new(quiet_params()).unwrap();
        model.create(&cell(1, CellClass::FastSpiking)).unwrap();
        assert!(model.create(&cell(1, CellClass::FastSpiking)).is_err());
    }
}
