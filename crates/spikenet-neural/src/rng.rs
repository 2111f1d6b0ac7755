// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic RNG streams.
//!
//! Every stochastic decision draws from a stream derived from
//! `(global seed, domain, stable id)`. No stream is ever shared or advanced
//! by call order, so results do not depend on worker count or scheduling.

use rand::rngs::StdRng;
use rand::SeedableRng;
use xxhash_rust::xxh64::xxh64;

/// Independent stream families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDomain {
    /// Cell positions (one stream for the whole network)
    Layout,
    /// Presynaptic accept/reject draws, keyed by post GID
    Connectivity,
    /// Drive/background spike trains, keyed by GID
    Drive,
    /// Initial actuator posture
    Actuator,
}

impl StreamDomain {
    fn tag(self) -> &'static [u8] {
        match self {
            StreamDomain::Layout => b"layout",
            StreamDomain::Connectivity => b"connectivity",
            StreamDomain::Drive => b"drive",
            StreamDomain::Actuator => b"actuator",
        }
    }
}

/// Derive a 64-bit seed from the global seed, a domain and an id
pub fn stream_seed(global_seed: u64, domain: StreamDomain, id: u64) -> u64 {
    let mut key = Vec::with_capacity(16 + domain.tag().len());
    key.extend_from_slice(domain.tag());
    key.extend_from_slice(&id.to_le_bytes());
    xxh64(&key, global_seed)
}

/// Fresh generator for `(global seed, domain, id)`
pub fn stream(global_seed: u64, domain: StreamDomain, id: u64) -> StdRng {
    StdRng::seed_from_u64(stream_seed(global_seed, domain, id))
}
