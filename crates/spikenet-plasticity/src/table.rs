// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Per-worker store of plastic synapses.

Synapses live on the worker owning their post cell. They are indexed by pre
GID and by post GID so spikes (local and remote) can be routed to them, and
by `(connection, receptor)` so weight reads can be delegated to them.
*/

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use spikenet_config::PlasticityConfig;
use spikenet_development::PopulationTable;
use spikenet_neural::{Connection, ConnectionId, Gid, PopulationId, SpikeEvent, WeightView};
use tracing::{debug, warn};

use crate::rule::StdpParams;
use crate::synapse::{PlasticSynapse, SynapseKey, SynapseState};
use crate::types::{PlasticityError, PlasticityResult};

/// Weight history of one plastic synapse, as gathered at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticityRecord {
    pub synapse: SynapseKey,
    pub log: Vec<(f64, f64)>,
}

/// Plastic synapses of one worker
#[derive(Debug, Clone, Default)]
pub struct SynapseTable {
    synapses: Vec<PlasticSynapse>,
    by_pre: AHashMap<Gid, Vec<usize>>,
    by_post: AHashMap<Gid, Vec<usize>>,
    by_channel: AHashMap<(ConnectionId, usize), usize>,
}

impl SynapseTable {
    /// Create plastic synapses for the local `connections`.
    ///
    /// A connection qualifies when its (pre, post) population pair is listed
    /// in `plastic_pairs` and the rates for its pre polarity are not all
    /// zero. It then gets one synapse per receptor channel with a positive
    /// weight. Nothing is created while STDP is disabled.
    pub fn select(
        config: &PlasticityConfig,
        populations: &PopulationTable,
        connections: &[Connection],
    ) -> PlasticityResult<Self> {
        let mut table = Self::default();
        if !config.stdp_enabled {
            return Ok(table);
        }

        let pairs = resolve_pairs(config, populations)?;
        for (index, connection) in connections.iter().enumerate() {
            if connection.pre.index() >= populations.total_cells()
                || connection.post.index() >= populations.total_cells()
            {
                return Err(PlasticityError::UnknownCell(index));
            }
            let pre = populations.of(connection.pre);
            let post = populations.of(connection.post);
            if !pairs.contains(&(pre.id, post.id)) || !config.has_nonzero_rates(pre.polarity) {
                continue;
            }
            let params = StdpParams::for_polarity(config, pre.polarity);
            for (receptor, &weight) in connection.weights.iter().enumerate() {
                if weight > 0.0 {
                    let key = SynapseKey {
                        pre: connection.pre,
                        post: connection.post,
                        receptor,
                    };
                    table.insert(PlasticSynapse::new(
                        key,
                        ConnectionId(index),
                        weight,
                        params,
                    ));
                }
            }
        }

        debug!(
            target: "spikenet-plasticity",
            "Selected {} plastic synapses on {} connections",
            table.len(),
            connections.len()
        );
        Ok(table)
    }

    /// Add a synapse, replacing any synapse on the same channel
    pub fn insert(&mut self, synapse: PlasticSynapse) {
        let channel = (synapse.connection(), synapse.receptor());
        if let Some(&existing) = self.by_channel.get(&channel) {
            warn!(
                target: "spikenet-plasticity",
                "Replacing plastic synapse on connection {} receptor {}",
                channel.0 .0,
                channel.1
            );
            self.synapses[existing] = synapse;
            return;
        }
        let index = self.synapses.len();
        let key = synapse.key();
        self.by_pre.entry(key.pre).or_default().push(index);
        self.by_post.entry(key.post).or_default().push(index);
        self.by_channel.insert(channel, index);
        self.synapses.push(synapse);
    }

    pub fn len(&self) -> usize {
        self.synapses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synapses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlasticSynapse> {
        self.synapses.iter()
    }

    /// Synapse bound to a receptor channel of a connection
    pub fn on_channel(&self, connection: ConnectionId, receptor: usize) -> Option<&PlasticSynapse> {
        self.by_channel
            .get(&(connection, receptor))
            .map(|&index| &self.synapses[index])
    }

    /// Number of synapses currently holding an eligibility mark
    pub fn pending(&self) -> usize {
        self.synapses
            .iter()
            .filter(|s| s.state() == SynapseState::RewardPending)
            .count()
    }

    /// Feed spikes to the synapses they touch, in chronological order.
    ///
    /// `spikes` may mix local and remote spikes in any order.
    pub fn route_spikes(&mut self, spikes: &[SpikeEvent]) {
        if self.synapses.is_empty() || spikes.is_empty() {
            return;
        }
        let mut ordered = spikes.to_vec();
        ordered.sort_by(SpikeEvent::chronological);

        for spike in &ordered {
            if let Some(indices) = self.by_pre.get(&spike.gid) {
                for &index in indices {
                    self.synapses[index].on_pre(spike.time);
                }
            }
            if let Some(indices) = self.by_post.get(&spike.gid) {
                for &index in indices {
                    self.synapses[index].on_post(spike.time);
                }
            }
        }
    }

    /// Apply reward `r` at `t` to every synapse; returns how many changed
    pub fn apply_reward(&mut self, r: f64, t: f64) -> usize {
        if r == 0.0 {
            return 0;
        }
        let changed = self
            .synapses
            .iter_mut()
            .map(|synapse| synapse.reward_punish(r, t))
            .filter(|delta| *delta != 0.0)
            .count();
        debug!(
            target: "spikenet-plasticity",
            "Reward {} at {:.1} ms changed {} of {} synapses",
            r,
            t,
            changed,
            self.synapses.len()
        );
        changed
    }

    /// Log every weight that changed since its last entry; returns the
    /// number of entries added
    pub fn snapshot(&mut self, t: f64) -> usize {
        self.synapses
            .iter_mut()
            .map(|synapse| synapse.snapshot(t))
            .filter(|added| *added)
            .count()
    }

    /// Weight histories in table order
    pub fn records(&self) -> Vec<PlasticityRecord> {
        self.synapses
            .iter()
            .map(|synapse| PlasticityRecord {
                synapse: synapse.key(),
                log: synapse.log().entries().to_vec(),
            })
            .collect()
    }

    /// Weight accessor over `connections` that prefers plastic weights
    pub fn weights<'a>(&'a self, connections: &'a [Connection]) -> PlasticWeights<'a> {
        PlasticWeights {
            connections,
            table: self,
        }
    }
}

fn resolve_pairs(
    config: &PlasticityConfig,
    populations: &PopulationTable,
) -> PlasticityResult<AHashSet<(PopulationId, PopulationId)>> {
    config
        .plastic_pairs
        .iter()
        .map(|[pre, post]| {
            let pre = populations
                .by_name(pre)
                .map_err(|_| PlasticityError::UnknownPopulation(pre.clone()))?;
            let post = populations
                .by_name(post)
                .map_err(|_| PlasticityError::UnknownPopulation(post.clone()))?;
            Ok((pre.id, post.id))
        })
        .collect()
}

/// Live weights: the synapse's value for plastic channels, the generated
/// value otherwise
pub struct PlasticWeights<'a> {
    connections: &'a [Connection],
    table: &'a SynapseTable,
}

impl WeightView for PlasticWeights<'_> {
    fn weight(&self, connection: ConnectionId, receptor: usize) -> f64 {
        match self.table.on_channel(connection, receptor) {
            Some(synapse) => synapse.weight(),
            None => self
                .connections
                .get(connection.0)
                .and_then(|c| c.weights.get(receptor))
                .copied()
                .unwrap_or(0.0),
        }
    }
}
