// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Construction of the reference neuron model from configuration

use spikenet_config::SpikenetConfig;
use spikenet_neural::models::{IzhikevichNetwork, ReceptorKinetics, ReferenceModelParams};
use spikenet_neural::NeuralError;

use crate::types::EngineResult;

/// Kinetics of a named receptor channel
fn kinetics_for(name: &str) -> Option<ReceptorKinetics> {
    let defaults = ReceptorKinetics::cortical_defaults();
    let index = match name.to_ascii_uppercase().as_str() {
        "AMPA" => 0,
        "NMDA" => 1,
        "GABAA" | "GABA_A" => 2,
        "GABAB" | "GABA_B" => 3,
        _ => return None,
    };
    defaults.get(index).copied()
}

/// Izhikevich network for one worker, with receptor channels in
/// configuration order
pub fn reference_model(config: &SpikenetConfig) -> EngineResult<IzhikevichNetwork> {
    let receptors = config
        .network
        .receptors
        .iter()
        .map(|spec| {
            kinetics_for(&spec.name).ok_or_else(|| {
                NeuralError::InvalidParameter(format!("no kinetics for receptor {}", spec.name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let model = &config.model;
    Ok(IzhikevichNetwork::new(ReferenceModelParams {
        dt: model.dt,
        receptors,
        drive_rate_hz: model.drive_rate_hz,
        background_rate_hz: model.background_rate_hz,
        background_weight: model.background_weight,
        seed: config.network.seed,
    })?)
}
