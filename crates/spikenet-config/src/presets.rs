// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ready-made network configurations
//!
//! Small, valid configurations used by the `run_network` tool, the demo
//! configuration file and tests across the workspace.

use crate::types::*;
use spikenet_neural::{CellClass, Polarity};

fn population(
    name: &str,
    polarity: Polarity,
    size: usize,
    class: CellClass,
    depth_band: [f64; 2],
    role: PopulationRole,
) -> PopulationSpec {
    PopulationSpec {
        name: name.to_string(),
        polarity,
        size,
        class,
        depth_band,
        role,
    }
}

fn pair(pre: &str, post: &str, probability: f64, weights: [f64; 4]) -> PairSpec {
    PairSpec {
        pre: pre.to_string(),
        post: post.to_string(),
        probability,
        weights: weights.to_vec(),
    }
}

const EXCITATORY_WEIGHTS: [f64; 4] = [1.0, 1.0, 0.0, 0.0];
const INHIBITORY_WEIGHTS: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

/// One excitatory (`E`) and one inhibitory (`I`) population, all four pairs
/// wired with the same base probability and distance falloff disabled, so the
/// expected in-degree from population `A` is `probability * |A|`.
pub fn two_population(size_e: usize, size_i: usize, probability: f64) -> SpikenetConfig {
    let mut config = SpikenetConfig::default();

    config.network.populations = vec![
        population(
            "E",
            Polarity::Excitatory,
            size_e,
            CellClass::RegularSpiking,
            [0.2, 0.4],
            PopulationRole::Standard,
        ),
        population(
            "I",
            Polarity::Inhibitory,
            size_i,
            CellClass::FastSpiking,
            [0.2, 0.4],
            PopulationRole::Standard,
        ),
    ];

    config.connectivity.falloff.enabled = false;
    config.connectivity.pairs = vec![
        pair("E", "E", probability, EXCITATORY_WEIGHTS),
        pair("E", "I", probability, EXCITATORY_WEIGHTS),
        pair("I", "E", probability, INHIBITORY_WEIGHTS),
        pair("I", "I", probability, INHIBITORY_WEIGHTS),
    ];

    config.plasticity.plastic_pairs = vec![
        ["E".to_string(), "E".to_string()],
        ["E".to_string(), "I".to_string()],
    ];

    config.simulation.duration = 200.0;
    config.simulation.loop_step = 1.0;
    config
}

/// Drive input onto a layer-5 recurrent circuit that projects onto a
/// four-muscle motor-command population and its inhibitory antagonist
/// partner, with a two-joint arm closing the reward loop.
pub fn reaching_circuit() -> SpikenetConfig {
    let mut config = SpikenetConfig::default();

    config.network.populations = vec![
        population(
            "DRIVE",
            Polarity::Excitatory,
            8,
            CellClass::Drive,
            [0.0, 0.1],
            PopulationRole::Drive,
        ),
        population(
            "ER5",
            Polarity::Excitatory,
            40,
            CellClass::RegularSpiking,
            [0.5, 0.7],
            PopulationRole::Standard,
        ),
        population(
            "IF5",
            Polarity::Inhibitory,
            10,
            CellClass::FastSpiking,
            [0.5, 0.7],
            PopulationRole::Standard,
        ),
        population(
            "EDSC",
            Polarity::Excitatory,
            8,
            CellClass::RegularSpiking,
            [0.9, 1.0],
            PopulationRole::MotorCommand {
                muscles: 4,
                antagonists: vec![1, 0, 3, 2],
            },
        ),
        population(
            "IDSC",
            Polarity::Inhibitory,
            8,
            CellClass::FastSpiking,
            [0.9, 1.0],
            PopulationRole::AntagonistInhibitory {
                mirrors: "EDSC".to_string(),
            },
        ),
    ];

    config.connectivity.pairs = vec![
        pair("ER5", "ER5", 0.1, EXCITATORY_WEIGHTS),
        pair("ER5", "IF5", 0.2, EXCITATORY_WEIGHTS),
        pair("IF5", "ER5", 0.2, INHIBITORY_WEIGHTS),
        pair("IF5", "IF5", 0.1, INHIBITORY_WEIGHTS),
        pair("ER5", "EDSC", 0.3, EXCITATORY_WEIGHTS),
        // IDSC mirrors the presynaptic set of EDSC; only its weights matter
        pair("ER5", "IDSC", 0.0, EXCITATORY_WEIGHTS),
        // antagonist inhibition is wired explicitly
        pair("IDSC", "EDSC", 0.0, INHIBITORY_WEIGHTS),
        pair("DRIVE", "ER5", 0.0, [4.0, 0.0, 0.0, 0.0]),
    ];
    config.connectivity.drive_rules = vec![DriveRuleSpec {
        source: "DRIVE".to_string(),
        target: "ER5".to_string(),
        mapping: DriveMapping::Modulo,
        distance: 50.0,
    }];

    config.plasticity.reward_enabled = true;
    config.plasticity.plastic_pairs = vec![
        ["ER5".to_string(), "ER5".to_string()],
        ["ER5".to_string(), "EDSC".to_string()],
    ];

    config.simulation.duration = 500.0;
    config.simulation.loop_step = 1.0;
    config.simulation.reward_interval = 50.0;
    config.simulation.progress_interval = 100.0;
    config.simulation.field_potential.enabled = true;
    config.simulation.field_potential.populations = vec!["ER5".to_string()];

    config.actuator.enabled = true;
    config.actuator.target_angles = vec![0.5, -0.3];

    config
}
