// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Simulation driver.

```text
Idle ─▶ Stepping ─▶ Synchronizing ─▶ Stepping ─▶ … ─▶ Finalizing ─▶ Done
```

One increment (at most `loop_step`, clipped at the duration):

1. advance the model, reading weights through the synapse table
2. collect the new local spikes
3. exchange spikes with every worker (the exchange is the barrier); hand
   remote spikes to the model and route all spikes to plastic synapses in
   time order
4. sample field potentials
5. snapshot plastic weights when the snapshot interval elapsed
6. step the actuator; when the reward interval elapsed the coordinator
   asks for a reward, broadcasts it and every worker applies it
7. report progress on the coordinator

Every worker issues the same collectives in the same order because all of
them follow the same clock.
*/

use std::time::Instant;

use ahash::AHashMap;
use spikenet_cluster::{gather, Communicator, GatheredRun, WorkerBundle};
use spikenet_config::SpikenetConfig;
use spikenet_development::{LocalNetwork, Role};
use spikenet_neural::{ConnectionId, Gid, NeuronModel, SpikeEvent};
use spikenet_plasticity::SynapseTable;
use tracing::{debug, info};

use crate::actuator::{Actuator, ActuatorContext};
use crate::clock::{Marker, SimulationClock};
use crate::field_potential::FieldPotentialRecorder;
use crate::types::{EngineError, EngineResult};

/// Lifecycle of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Stepping,
    Synchronizing,
    Finalizing,
    Done,
}

/// Maps motor-command cells to their muscle group
#[derive(Debug, Clone, Default)]
struct MotorReadout {
    muscle_of: AHashMap<Gid, usize>,
    muscles: usize,
    cells_per_muscle: usize,
}

impl MotorReadout {
    fn from_network(network: &LocalNetwork) -> Self {
        let Some((population, muscles)) = network.populations.iter().find_map(|p| match &p.role {
            Role::MotorCommand { muscles, .. } => Some((p, *muscles)),
            _ => None,
        }) else {
            return Self::default();
        };
        let cells_per_muscle = if muscles > 0 { population.size / muscles } else { 0 };
        let muscle_of = population
            .gids()
            .map(|gid| {
                let offset = gid - population.start;
                (Gid::from(gid), offset / cells_per_muscle.max(1))
            })
            .collect();
        Self {
            muscle_of,
            muscles,
            cells_per_muscle,
        }
    }

    fn count(&self, spikes: &[SpikeEvent]) -> Vec<usize> {
        let mut counts = vec![0; self.muscles];
        for spike in spikes {
            if let Some(&muscle) = self.muscle_of.get(&spike.gid) {
                if let Some(count) = counts.get_mut(muscle) {
                    *count += 1;
                }
            }
        }
        counts
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverStats {
    pub increments: usize,
    pub rewards_applied: usize,
    pub snapshots: usize,
}

/// Runs one worker's share of the simulation
pub struct Driver<M: NeuronModel, C: Communicator> {
    config: SpikenetConfig,
    network: LocalNetwork,
    model: M,
    comm: C,
    synapses: SynapseTable,
    actuator: Option<Box<dyn Actuator>>,
    motor: MotorReadout,
    recorder: Option<FieldPotentialRecorder>,
    clock: SimulationClock,
    /// Spikes already collected per local cell
    collected: Vec<usize>,
    spikes: Vec<SpikeEvent>,
    state: DriverState,
    stats: DriverStats,
    started: Instant,
}

impl<M: NeuronModel, C: Communicator> Driver<M, C> {
    /// Instantiate the local cells and connections in `model`, select
    /// plastic synapses and set up the actuator.
    ///
    /// # Errors
    ///
    /// `EngineError::MissingActuator` when reward is enabled without an
    /// actuator, plus any model, plasticity or population-lookup error.
    pub fn new(
        config: &SpikenetConfig,
        network: LocalNetwork,
        mut model: M,
        comm: C,
        actuator: Option<Box<dyn Actuator>>,
    ) -> EngineResult<Self> {
        if config.plasticity.reward_enabled && actuator.is_none() {
            return Err(EngineError::MissingActuator);
        }

        for cell in &network.cells {
            model.create(cell)?;
        }
        for (index, connection) in network.connections.iter().enumerate() {
            model.connect(ConnectionId(index), connection)?;
        }

        let synapses =
            SynapseTable::select(&config.plasticity, &network.populations, &network.connections)?;
        let recorder = FieldPotentialRecorder::from_config(
            &config.simulation.field_potential,
            &network.populations,
            &network.cells,
        )?;
        let motor = MotorReadout::from_network(&network);

        debug!(
            target: "spikenet-engine",
            "Worker {}: {} cells, {} connections, {} plastic synapses in {}",
            comm.rank(),
            network.cells.len(),
            network.connections.len(),
            synapses.len(),
            model.model_name()
        );

        let mut driver = Self {
            config: config.clone(),
            collected: vec![0; network.cells.len()],
            network,
            model,
            comm,
            synapses,
            actuator,
            motor,
            recorder,
            clock: SimulationClock::new(config.simulation.duration, config.simulation.loop_step),
            spikes: Vec::new(),
            state: DriverState::Idle,
            stats: DriverStats::default(),
            started: Instant::now(),
        };
        let ctx = driver.actuator_context(Vec::new(), 0.0);
        if let Some(actuator) = driver.actuator.as_mut() {
            actuator.setup(&ctx)?;
        }
        Ok(driver)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn synapses(&self) -> &SynapseTable {
        &self.synapses
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    /// Local spikes recorded so far
    pub fn spikes(&self) -> &[SpikeEvent] {
        &self.spikes
    }

    fn actuator_context(&self, muscle_spikes: Vec<usize>, interval: f64) -> ActuatorContext {
        ActuatorContext {
            rank: self.comm.rank(),
            workers: self.comm.size(),
            muscles: self.motor.muscles,
            cells_per_muscle: self.motor.cells_per_muscle,
            interval,
            muscle_spikes,
        }
    }

    /// Spikes of local cells emitted since the previous call, in time order
    fn collect_local_spikes(&mut self) -> Vec<SpikeEvent> {
        let mut fresh = Vec::new();
        for (cell, seen) in self.network.cells.iter().zip(self.collected.iter_mut()) {
            let times = self.model.spike_times(cell.gid);
            let new_times = times.get(*seen..).unwrap_or(&[]);
            fresh.extend(new_times.iter().map(|&t| SpikeEvent::new(cell.gid, t)));
            *seen = times.len();
        }
        fresh.sort_by(SpikeEvent::chronological);
        fresh
    }

    /// Run one increment. Returns `false` once the run reached its duration.
    pub fn step(&mut self) -> EngineResult<bool> {
        match self.state {
            DriverState::Idle | DriverState::Stepping => {}
            other => return Err(EngineError::InvalidState(other)),
        }
        if self.clock.is_done() {
            return Ok(false);
        }

        self.state = DriverState::Stepping;
        let t_start = self.clock.time();
        let t_next = self.clock.next_stop();
        {
            let weights = self.synapses.weights(&self.network.connections);
            self.model.advance(t_next, &weights)?;
        }
        let local = self.collect_local_spikes();

        self.state = DriverState::Synchronizing;
        let remote = self.comm.exchange_spikes(&local)?;
        self.model.deliver(&remote);
        let mut all = local.clone();
        all.extend_from_slice(&remote);
        self.synapses.route_spikes(&all);
        self.spikes.extend(local);
        self.clock.advance_to(t_next);
        self.state = DriverState::Stepping;
        let t = t_next;

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.sample(t, &self.model);
        }

        let plasticity = &self.config.plasticity;
        if plasticity.stdp_enabled && self.clock.due(Marker::Snapshot, plasticity.snapshot_interval) {
            let added = self.synapses.snapshot(t);
            self.clock.mark(Marker::Snapshot);
            self.stats.snapshots += 1;
            debug!(target: "spikenet-engine", "Snapshot at {:.1} ms: {} weights changed", t, added);
        }

        if self.actuator.is_some() {
            let ctx = self.actuator_context(self.motor.count(&all), t - t_start);
            if let Some(actuator) = self.actuator.as_mut() {
                actuator.step(t, &ctx)?;
            }
            self.clock.mark(Marker::Actuator);

            if self.config.plasticity.reward_enabled
                && self.clock.due(Marker::Reward, self.config.simulation.reward_interval)
            {
                let critic = match self.actuator.as_mut() {
                    Some(actuator) if self.comm.is_coordinator() => Some(actuator.reward(t)),
                    _ => None,
                };
                let reward = self.comm.broadcast_reward(critic)?;
                if reward != 0.0 {
                    let changed = self.synapses.apply_reward(reward, t);
                    self.stats.rewards_applied += 1;
                    if self.comm.is_coordinator() {
                        debug!(
                            target: "spikenet-engine",
                            "Reward {} at {:.1} ms ({} synapses changed on coordinator)",
                            reward,
                            t,
                            changed
                        );
                    }
                }
                self.clock.mark(Marker::Reward);
            }
        }

        if self.comm.is_coordinator()
            && self.clock.due(Marker::Progress, self.config.simulation.progress_interval)
        {
            info!(
                target: "spikenet-engine",
                "t = {:.1} ms ({:.0}%), {:.1} s elapsed",
                t,
                100.0 * self.clock.progress(),
                self.started.elapsed().as_secs_f64()
            );
            self.clock.mark(Marker::Progress);
        }

        self.stats.increments += 1;
        Ok(!self.clock.is_done())
    }

    /// Step until the duration is reached
    pub fn run_to_end(&mut self) -> EngineResult<()> {
        if self.comm.is_coordinator() {
            info!(
                target: "spikenet-engine",
                "Running {:.1} ms on {} workers (step {:.2} ms)",
                self.clock.duration(),
                self.comm.size(),
                self.config.simulation.loop_step
            );
        }
        while self.step()? {}
        Ok(())
    }

    /// Close the actuator, take a last snapshot and pack this worker's
    /// results. The driver ends in `Done`.
    pub fn finish(&mut self) -> EngineResult<WorkerBundle> {
        self.state = DriverState::Finalizing;
        if self.config.plasticity.stdp_enabled {
            self.synapses.snapshot(self.clock.time());
        }
        let ctx = self.actuator_context(Vec::new(), 0.0);
        if let Some(actuator) = self.actuator.as_mut() {
            actuator.close(&ctx);
        }

        let bundle = WorkerBundle {
            rank: self.comm.rank(),
            spikes: std::mem::take(&mut self.spikes),
            connections: self.network.connections.clone(),
            plasticity: self.synapses.records(),
            field_potentials: self
                .recorder
                .take()
                .map(FieldPotentialRecorder::into_series)
                .unwrap_or_default(),
        };
        self.state = DriverState::Done;
        Ok(bundle)
    }

    /// Run to the end, finish and gather at the coordinator.
    ///
    /// Returns the merged run on the coordinator and `None` elsewhere.
    pub fn run(mut self) -> EngineResult<Option<GatheredRun>> {
        self.run_to_end()?;
        let bundle = self.finish()?;
        Ok(gather(&self.comm, &bundle)?)
    }
}
