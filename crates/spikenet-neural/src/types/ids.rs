// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identifier newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Global cell identifier, dense over `0..N` and stable for the whole run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
    /// Position of this cell in network-wide arrays
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Gid {
    fn from(value: usize) -> Self {
        Gid(value as u32)
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gid {}", self.0)
    }
}

/// Index of a population in the configured population table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PopulationId(pub u16);

impl PopulationId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Worker rank; rank 0 is the coordinator
pub type Rank = usize;
