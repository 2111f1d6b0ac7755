// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet Engine
//!
//! Time-stepped simulation driver for one worker:
//! - [`SimulationClock`] with reward / snapshot / actuator / progress markers
//! - [`Driver`]: model stepping, spike exchange, plastic-synapse routing,
//!   reward application, snapshots and the end-of-run gather
//! - [`FieldPotentialRecorder`]
//! - the [`Actuator`] contract and the reference [`DummyArm`]

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod actuator;
pub mod clock;
pub mod driver;
pub mod field_potential;
pub mod model;
pub mod types;

pub use actuator::{Actuator, ActuatorContext, DummyArm};
pub use clock::{Marker, SimulationClock};
pub use driver::{Driver, DriverState, DriverStats};
pub use field_potential::FieldPotentialRecorder;
pub use model::reference_model;
pub use types::{EngineError, EngineResult};
