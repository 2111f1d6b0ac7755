// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `spikenet_configuration.toml`.

use serde::{Deserialize, Serialize};
use spikenet_neural::{CellClass, Polarity};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikenetConfig {
    pub network: NetworkConfig,
    pub connectivity: ConnectivityConfig,
    pub plasticity: PlasticityConfig,
    pub simulation: SimulationConfig,
    pub cluster: ClusterConfig,
    pub model: ModelConfig,
    pub actuator: ActuatorConfig,
    pub logging: LoggingConfig,
}

/// Populations, receptors and the spatial extent of the model
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Global seed every RNG stream derives from
    pub seed: u64,
    /// Side length of the square model extent (µm)
    pub model_size: f64,
    /// Cortical thickness used to scale depth bands (µm)
    pub cortical_thickness: f64,
    /// Populations in GID order; each occupies a contiguous GID range
    pub populations: Vec<PopulationSpec>,
    /// Receptor channels; the count fixes every weight-vector length
    pub receptors: Vec<ReceptorSpec>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            model_size: 1000.0,
            cortical_thickness: 1000.0,
            populations: Vec::new(),
            receptors: ReceptorSpec::cortical_defaults(),
        }
    }
}

impl NetworkConfig {
    /// Total number of cells across all populations
    pub fn total_cells(&self) -> usize {
        self.populations.iter().map(|p| p.size).sum()
    }

    pub fn receptor_count(&self) -> usize {
        self.receptors.len()
    }

    /// Index of a population by name
    pub fn population_index(&self, name: &str) -> Option<usize> {
        self.populations.iter().position(|p| p.name == name)
    }
}

/// One population of cells
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PopulationSpec {
    pub name: String,
    pub polarity: Polarity,
    pub size: usize,
    pub class: CellClass,
    /// Fractional depth band `[low, high]` within the cortical thickness
    pub depth_band: [f64; 2],
    #[serde(default)]
    pub role: PopulationRole,
}

/// Modeling role of a population
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopulationRole {
    /// Ordinary recurrent population
    #[default]
    Standard,
    /// Externally clocked input; receives no connections and is excluded from
    /// the probabilistic draw
    Drive,
    /// Excitatory motor-command output, split evenly into `muscles` groups
    MotorCommand {
        muscles: usize,
        /// `antagonists[m]` is the muscle opposing muscle `m`
        antagonists: Vec<usize>,
    },
    /// Inhibitory partner of a motor-command population; cell `k` mirrors the
    /// presynaptic set of cell `k` of `mirrors`
    AntagonistInhibitory { mirrors: String },
}

/// A receptor channel and its fixed weight scale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReceptorSpec {
    pub name: String,
    pub scale: f64,
}

impl ReceptorSpec {
    /// AMPA, NMDA, GABA-A, GABA-B
    pub fn cortical_defaults() -> Vec<ReceptorSpec> {
        [("AMPA", 1.0), ("NMDA", 0.1), ("GABAA", 1.0), ("GABAB", 0.1)]
            .into_iter()
            .map(|(name, scale)| ReceptorSpec {
                name: name.to_string(),
                scale,
            })
            .collect()
    }
}

/// Connection-probability, weight and delay parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Wrap distances at the model boundary
    pub toroidal: bool,
    /// Exponential distance falloff by postsynaptic polarity
    pub falloff: FalloffConfig,
    /// Probability scale indexed `[pre polarity][post polarity]` (E = 0, I = 1)
    pub probability_scale: [[f64; 2]; 2],
    /// Weight scale indexed `[pre polarity][post polarity]`
    pub weight_scale: [[f64; 2]; 2],
    /// Minimum conduction delay (ms)
    pub min_delay: f64,
    /// Conduction velocity (µm/ms)
    pub velocity: f64,
    /// Population-pair base probability and per-receptor base weight
    pub pairs: Vec<PairSpec>,
    /// Deterministic wiring from drive populations
    pub drive_rules: Vec<DriveRuleSpec>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            toroidal: true,
            falloff: FalloffConfig::default(),
            probability_scale: [[1.0, 1.0], [1.0, 1.0]],
            weight_scale: [[1.0, 1.0], [1.0, 1.0]],
            min_delay: 2.0,
            velocity: 100.0,
            pairs: Vec::new(),
            drive_rules: Vec::new(),
        }
    }
}

/// Distance falloff length constants (µm)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FalloffConfig {
    /// When false, probability does not depend on distance
    pub enabled: bool,
    pub excitatory: f64,
    pub inhibitory: f64,
}

impl Default for FalloffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excitatory: 200.0,
            inhibitory: 150.0,
        }
    }
}

impl FalloffConfig {
    /// Decay length for a postsynaptic polarity, `None` when disabled
    pub fn length(&self, post: Polarity) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        Some(match post {
            Polarity::Excitatory => self.excitatory,
            Polarity::Inhibitory => self.inhibitory,
        })
    }
}

/// Base probability and weights for one (pre, post) population pair
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PairSpec {
    pub pre: String,
    pub post: String,
    pub probability: f64,
    /// One entry per receptor channel
    pub weights: Vec<f64>,
}

/// Deterministic wiring from a drive population onto a target population
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriveRuleSpec {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub mapping: DriveMapping,
    /// Canonical distance replacing the geometric one (µm)
    pub distance: f64,
}

/// How target cells pick their drive source cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMapping {
    /// Target cell `k` takes source `k mod |source|`
    #[default]
    Modulo,
    /// First half of the targets from the first half of the sources, second
    /// half from the second half
    SplitHalves,
}

/// Reward-modulated STDP parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasticityConfig {
    pub stdp_enabled: bool,
    pub reward_enabled: bool,
    /// `[pre polarity][hebbian, anti-hebbian]`
    pub stdp_rates: [[f64; 2]; 2],
    /// `[pre polarity][reward potentiation, reward depression]`
    pub reward_rates: [[f64; 2]; 2],
    pub max_weight: f64,
    /// STDP time constant (ms)
    pub stdp_window: f64,
    /// Eligibility window (ms)
    pub eligibility_window: f64,
    /// Exponentially decaying eligibility instead of a step window
    pub exponential_eligibility: bool,
    /// Scale reward adjustments by the distance to the weight bounds
    pub soft_threshold: bool,
    /// `[pre population, post population]` pairs eligible for plasticity
    pub plastic_pairs: Vec<[String; 2]>,
    /// Minimum time between weight snapshots (ms)
    pub snapshot_interval: f64,
}

impl Default for PlasticityConfig {
    fn default() -> Self {
        Self {
            stdp_enabled: true,
            reward_enabled: false,
            stdp_rates: [[0.1, -0.13], [0.0, 0.0]],
            reward_rates: [[0.0025, -0.0025], [0.0, 0.0]],
            max_weight: 5.0,
            stdp_window: 10.0,
            eligibility_window: 50.0,
            exponential_eligibility: false,
            soft_threshold: false,
            plastic_pairs: Vec::new(),
            snapshot_interval: 100.0,
        }
    }
}

impl PlasticityConfig {
    /// Whether any plastic synapse can be created for this pre polarity
    pub fn has_nonzero_rates(&self, pre: Polarity) -> bool {
        let stdp = self.stdp_rates[pre.index()].iter().map(|r| r.abs()).sum::<f64>();
        let reward = self.reward_rates[pre.index()].iter().map(|r| r.abs()).sum::<f64>();
        stdp > 0.0 || reward > 0.0
    }
}

/// Time stepping and recording
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total simulated time (ms)
    pub duration: f64,
    /// Upper bound of one driver increment (ms)
    pub loop_step: f64,
    /// Minimum time between reward applications (ms)
    pub reward_interval: f64,
    /// Time between progress reports on the coordinator (ms)
    pub progress_interval: f64,
    pub field_potential: FieldPotentialConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            loop_step: 10.0,
            reward_interval: 50.0,
            progress_interval: 1000.0,
            field_potential: FieldPotentialConfig::default(),
        }
    }
}

/// Per-population aggregate of a state variable
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldPotentialConfig {
    pub enabled: bool,
    /// Populations to aggregate; empty means every non-drive population
    pub populations: Vec<String>,
    pub variable: String,
}

impl Default for FieldPotentialConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            populations: Vec::new(),
            variable: "V".to_string(),
        }
    }
}

/// Worker topology
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub workers: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Parameters of the reference neuron model
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Integration step (ms)
    pub dt: f64,
    pub drive_rate_hz: f64,
    pub background_rate_hz: f64,
    pub background_weight: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            drive_rate_hz: 10.0,
            background_rate_hz: 100.0,
            background_weight: 0.05,
        }
    }
}

/// Reference actuator ("dummy arm") settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub enabled: bool,
    /// Target angle per joint (rad); joints = muscles / 2
    pub target_angles: Vec<f64>,
    /// Angle change per unit of net motor-command rate (rad per Hz per s)
    pub gain: f64,
    /// Error change below which the reward is 0
    pub reward_threshold: f64,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            target_angles: Vec::new(),
            gain: 0.001,
            reward_threshold: 1e-4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Crates logged at debug level, e.g. `["spikenet-development"]`
    pub debug_crates: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            debug_crates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_role_from_toml() {
        let toml_src = r#"
            name = "EDSC"
            polarity = "excitatory"
            size = 8
            class = "regular_spiking"
            depth_band = [0.9, 1.0]
            role = { kind = "motor_command", muscles = 4, antagonists = [1, 0, 3, 2] }
        "#;
        let spec: PopulationSpec = toml::from_str(toml_src).unwrap();
        assert_eq!(
            spec.role,
            PopulationRole::MotorCommand {
                muscles: 4,
                antagonists: vec![1, 0, 3, 2]
            }
        );
    }

    #[test]
    fn test_role_defaults_to_standard() {
        let toml_src = r#"
            name = "ER2"
            polarity = "excitatory"
            size = 8
            class = "regular_spiking"
            depth_band = [0.1, 0.3]
        "#;
        let spec: PopulationSpec = toml::from_str(toml_src).unwrap();
        assert_eq!(spec.role, PopulationRole::Standard);
    }

    #[test]
    fn test_nonzero_rates() {
        let config = PlasticityConfig::default();
        assert!(config.has_nonzero_rates(Polarity::Excitatory));
        assert!(!config.has_nonzero_rates(Polarity::Inhibitory));
    }
}
