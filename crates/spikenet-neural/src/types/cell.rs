// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cell identity, polarity and class

use super::ids::{Gid, PopulationId, Rank};
use serde::{Deserialize, Serialize};

/// Excitatory or inhibitory classification of a cell/population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Excitatory,
    Inhibitory,
}

impl Polarity {
    /// Row/column index into 2x2 polarity tables (E = 0, I = 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Polarity::Excitatory => 0,
            Polarity::Inhibitory => 1,
        }
    }

    pub fn is_excitatory(self) -> bool {
        matches!(self, Polarity::Excitatory)
    }
}

/// Dynamical class of a cell, selecting the neuron-model parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    RegularSpiking,
    IntrinsicallyBursting,
    Chattering,
    LowThreshold,
    FastSpiking,
    Thalamocortical,
    ReticularThalamic,
    /// Externally clocked input source (no membrane dynamics)
    Drive,
}

impl CellClass {
    /// Decode a legacy integer class code.
    ///
    /// The legacy table assigns codes 4 and 5 twice (low-threshold /
    /// thalamocortical and fast-spiking / reticular). The first claimant wins,
    /// which leaves `Thalamocortical` and `ReticularThalamic` unreachable from
    /// integer codes. This is kept as-is and reported: name classes explicitly
    /// in configuration to reach the thalamic classes.
    pub fn from_legacy_code(code: i32) -> Option<CellClass> {
        match code {
            1 => Some(CellClass::RegularSpiking),
            2 => Some(CellClass::IntrinsicallyBursting),
            3 => Some(CellClass::Chattering),
            4 => {
                tracing::warn!(target: "spikenet-neural", "legacy class code 4 decodes to LowThreshold; Thalamocortical shares this code and is unreachable");
                Some(CellClass::LowThreshold)
            }
            5 => {
                tracing::warn!(target: "spikenet-neural", "legacy class code 5 decodes to FastSpiking; ReticularThalamic shares this code and is unreachable");
                Some(CellClass::FastSpiking)
            }
            -1 => Some(CellClass::Drive),
            _ => None,
        }
    }

    pub fn is_drive(self) -> bool {
        matches!(self, CellClass::Drive)
    }
}

/// 3-D cell position (µm); z is cortical depth
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A cell as seen by the worker that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub gid: Gid,
    pub population: PopulationId,
    pub polarity: Polarity,
    pub class: CellClass,
    pub position: Position,
    pub rank: Rank,
    /// Index of this cell among the cells owned by `rank`
    pub local_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_codes_shadow_thalamic_classes() {
        assert_eq!(CellClass::from_legacy_code(4), Some(CellClass::LowThreshold));
        assert_eq!(CellClass::from_legacy_code(5), Some(CellClass::FastSpiking));
        let reachable: Vec<_> = (-1..=8).filter_map(CellClass::from_legacy_code).collect();
        assert!(!reachable.contains(&CellClass::Thalamocortical));
        assert!(!reachable.contains(&CellClass::ReticularThalamic));
        assert_eq!(CellClass::from_legacy_code(0), None);
    }

    #[test]
    fn test_polarity_index() {
        assert_eq!(Polarity::Excitatory.index(), 0);
        assert_eq!(Polarity::Inhibitory.index(), 1);
    }
}
