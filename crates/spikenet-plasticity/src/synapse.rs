// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! A single plastic synapse
//!
//! ```text
//! Naive ──first spike──▶ Tracking ──eligibility mark──▶ RewardPending
//!                          ▲                                  │
//!                          └────────── reward applied ────────┘
//! ```
//!
//! Applying a reward consumes the eligibility marks, so the same spike
//! pairing is rewarded at most once.

use serde::{Deserialize, Serialize};
use spikenet_neural::{ConnectionId, Gid};

use crate::log::WeightLog;
use crate::rule::StdpParams;

/// Lifecycle of a plastic synapse; there is no terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynapseState {
    /// No spike seen yet
    Naive,
    /// Spike timing is being tracked
    Tracking,
    /// Holds an eligibility mark awaiting a reward
    RewardPending,
}

/// Stable identity of a plastic synapse across workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SynapseKey {
    pub pre: Gid,
    pub post: Gid,
    pub receptor: usize,
}

/// Reward-modulated STDP synapse bound to one receptor channel of a
/// connection. Owns the live weight of that channel.
#[derive(Debug, Clone)]
pub struct PlasticSynapse {
    key: SynapseKey,
    connection: ConnectionId,
    params: StdpParams,
    weight: f64,
    state: SynapseState,
    last_pre: Option<f64>,
    last_post: Option<f64>,
    hebb_mark: Option<f64>,
    anti_mark: Option<f64>,
    log: WeightLog,
}

impl PlasticSynapse {
    pub fn new(key: SynapseKey, connection: ConnectionId, initial: f64, params: StdpParams) -> Self {
        Self {
            key,
            connection,
            params,
            weight: initial,
            state: SynapseState::Naive,
            last_pre: None,
            last_post: None,
            hebb_mark: None,
            anti_mark: None,
            log: WeightLog::new(initial),
        }
    }

    pub fn key(&self) -> SynapseKey {
        self.key
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn receptor(&self) -> usize {
        self.key.receptor
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn state(&self) -> SynapseState {
        self.state
    }

    pub fn params(&self) -> &StdpParams {
        &self.params
    }

    pub fn log(&self) -> &WeightLog {
        &self.log
    }

    pub fn into_log(self) -> WeightLog {
        self.log
    }

    /// Presynaptic spike at `t`
    pub fn on_pre(&mut self, t: f64) {
        if let Some(t_post) = self.last_post {
            let delta = self.params.depression(t_post, t);
            self.weight = self.params.clamp(self.weight, delta);
            if self.params.reward_enabled {
                self.anti_mark = Some(t);
                self.state = SynapseState::RewardPending;
            }
        }
        self.last_pre = Some(t);
        self.leave_naive();
    }

    /// Postsynaptic spike at `t`
    pub fn on_post(&mut self, t: f64) {
        if let Some(t_pre) = self.last_pre {
            let delta = self.params.potentiation(t_pre, t);
            self.weight = self.params.clamp(self.weight, delta);
            if self.params.reward_enabled {
                self.hebb_mark = Some(t);
                self.state = SynapseState::RewardPending;
            }
        }
        self.last_post = Some(t);
        self.leave_naive();
    }

    fn leave_naive(&mut self) {
        if self.state == SynapseState::Naive {
            self.state = SynapseState::Tracking;
        }
    }

    /// Apply reward `r` at `t`. Returns the weight change.
    ///
    /// Only a synapse in `RewardPending` changes; afterwards it is back in
    /// `Tracking` with its marks consumed.
    pub fn reward_punish(&mut self, r: f64, t: f64) -> f64 {
        if r == 0.0 || self.state != SynapseState::RewardPending {
            return 0.0;
        }
        let hebb = self
            .params
            .eligibility(self.params.reward_hebb, self.hebb_mark, t);
        let anti = self
            .params
            .eligibility(self.params.reward_anti, self.anti_mark, t);
        let delta = self.params.soften(r * (hebb + anti), self.weight);

        let before = self.weight;
        self.weight = self.params.clamp(self.weight, delta);
        self.hebb_mark = None;
        self.anti_mark = None;
        self.state = SynapseState::Tracking;
        self.weight - before
    }

    /// Append the current weight to the log if it changed
    pub fn snapshot(&mut self, t: f64) -> bool {
        self.log.record(t, self.weight)
    }
}
