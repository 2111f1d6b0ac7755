// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reference neuron models
//!
//! These implement [`crate::NeuronModel`] so networks can be run and tested
//! end to end. Production runs may plug in any other simulator.

pub mod izhikevich;

pub use izhikevich::{IzhikevichNetwork, IzhikevichParams, ReceptorKinetics, ReferenceModelParams};
