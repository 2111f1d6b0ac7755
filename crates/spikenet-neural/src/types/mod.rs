// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core spikenet types

pub mod cell;
pub mod connection;
pub mod error;
pub mod ids;
pub mod spike;

pub use cell::{Cell, CellClass, Polarity, Position};
pub use connection::{Connection, ConnectionId, WeightView};
pub use error::{NeuralError, Result};
pub use ids::{Gid, PopulationId, Rank};
pub use spike::SpikeEvent;
