// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use super::ids::Gid;
use serde::{Deserialize, Serialize};

/// A single spike emitted by a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeEvent {
    pub gid: Gid,
    /// Spike time (ms)
    pub time: f64,
}

impl SpikeEvent {
    pub fn new(gid: Gid, time: f64) -> Self {
        Self { gid, time }
    }

    /// Orders spikes by time, then by GID, so merged streams are reproducible
    pub fn chronological(a: &SpikeEvent, b: &SpikeEvent) -> std::cmp::Ordering {
        a.time.total_cmp(&b.time).then(a.gid.cmp(&b.gid))
    }
}
