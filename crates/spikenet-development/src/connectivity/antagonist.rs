// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Motor-command / antagonist-inhibitory pairing
//!
//! Cell `k` of the inhibitory population receives exactly the presynaptic
//! set drawn for cell `k` of the motor-command population. Each motor cell of
//! muscle `m` additionally receives every inhibitory cell of muscle
//! `antagonists[m]`.

use std::ops::Range;

use spikenet_neural::{Gid, PopulationId};

use crate::populations::{PopulationTable, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct MotorPair {
    /// Excitatory motor-command population
    pub motor: PopulationId,
    /// Inhibitory population mirroring it
    pub inhibitory: PopulationId,
    motor_start: usize,
    inhibitory_start: usize,
    cells_per_muscle: usize,
    antagonists: Vec<usize>,
}

impl MotorPair {
    /// Every (motor, inhibitory) pair declared through population roles
    pub fn resolve_all(populations: &PopulationTable) -> Vec<MotorPair> {
        populations
            .iter()
            .filter_map(|inhibitory| {
                let Role::AntagonistInhibitory { mirrors } = inhibitory.role else {
                    return None;
                };
                let motor = populations.get(mirrors);
                let Role::MotorCommand {
                    muscles,
                    antagonists,
                } = &motor.role
                else {
                    tracing::warn!(
                        target: "spikenet-development",
                        "Population {} mirrors {}, which is not a motor-command population; no antagonist wiring",
                        inhibitory.name,
                        motor.name
                    );
                    return None;
                };
                if *muscles == 0 {
                    return None;
                }
                Some(MotorPair {
                    motor: motor.id,
                    inhibitory: inhibitory.id,
                    motor_start: motor.start,
                    inhibitory_start: inhibitory.start,
                    cells_per_muscle: motor.size / muscles,
                    antagonists: antagonists.clone(),
                })
            })
            .collect()
    }

    /// Motor cell whose drawn set an inhibitory cell copies.
    ///
    /// Cell `k` of the inhibitory population mirrors cell `k` of the motor
    /// population; the antagonist table applies only to `antagonist_inputs`.
    pub fn mirrored(&self, inhibitory_cell: Gid) -> Gid {
        Gid::from(self.motor_start + (inhibitory_cell.index() - self.inhibitory_start))
    }

    /// Muscle a motor cell belongs to
    pub fn muscle_of(&self, motor_cell: Gid) -> Option<usize> {
        if self.cells_per_muscle == 0 {
            return None;
        }
        let muscle = (motor_cell.index() - self.motor_start) / self.cells_per_muscle;
        (muscle < self.antagonists.len()).then_some(muscle)
    }

    /// Inhibitory cells feeding a motor cell: all of its antagonist muscle
    pub fn antagonist_inputs(&self, motor_cell: Gid) -> Range<usize> {
        match self
            .muscle_of(motor_cell)
            .and_then(|m| self.antagonists.get(m).copied())
        {
            Some(antagonist) => {
                let start = self.inhibitory_start + antagonist * self.cells_per_muscle;
                start..start + self.cells_per_muscle
            }
            None => 0..0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_config::presets;

    #[test]
    fn test_pair_geometry() {
        let config = presets::reaching_circuit();
        let table = PopulationTable::from_config(&config.network).unwrap();
        let pairs = MotorPair::resolve_all(&table);
        assert_eq!(pairs.len(), 1);

        let pair = &pairs[0];
        let edsc = table.by_name("EDSC").unwrap();
        let idsc = table.by_name("IDSC").unwrap();

        assert_eq!(pair.mirrored(Gid::from(idsc.start + 5)), Gid::from(edsc.start + 5));

        // 8 cells, 4 muscles: cells 2,3 are muscle 1, whose antagonist is muscle 0
        let motor_cell = Gid::from(edsc.start + 3);
        assert_eq!(pair.muscle_of(motor_cell), Some(1));
        assert_eq!(pair.antagonist_inputs(motor_cell), idsc.start..idsc.start + 2);
    }

    #[test]
    fn test_mirror_is_index_mapped_not_antagonist_mapped() {
        let config = presets::reaching_circuit();
        let table = PopulationTable::from_config(&config.network).unwrap();
        let pair = &MotorPair::resolve_all(&table)[0];
        let edsc = table.by_name("EDSC").unwrap();
        let idsc = table.by_name("IDSC").unwrap();

        for k in 0..idsc.size {
            assert_eq!(pair.mirrored(Gid::from(idsc.start + k)), Gid::from(edsc.start + k));
        }
        // muscle 0 is antagonised by muscle 1, yet cell 0 still mirrors cell 0
        assert_eq!(pair.antagonist_inputs(Gid::from(edsc.start)), idsc.start + 2..idsc.start + 4);
        assert_eq!(pair.mirrored(Gid::from(idsc.start)), Gid::from(edsc.start));
    }
}
