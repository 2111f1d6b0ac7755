// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Messages exchanged between workers

use spikenet_neural::SpikeEvent;

/// One message on a worker-to-worker channel
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Spikes emitted by the sender's cells during one increment
    Spikes(Vec<SpikeEvent>),
    /// Reward value broadcast by the coordinator
    Reward(f64),
    /// Packed worker bundle, sent to the coordinator at the end of a run
    Bundle(Vec<u8>),
    Barrier,
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Spikes(_) => "spikes",
            Message::Reward(_) => "reward",
            Message::Bundle(_) => "bundle",
            Message::Barrier => "barrier",
        }
    }
}
