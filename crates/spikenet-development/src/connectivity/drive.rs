// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic wiring from drive populations
//!
//! Drive cells never take part in the probabilistic draw. Cells of a rule's
//! target population instead receive fixed source cells, and the connection
//! distance is replaced by the rule's canonical distance.

use spikenet_config::{DriveMapping, SpikenetConfig};
use spikenet_neural::{Gid, PopulationId};

use crate::populations::{Population, PopulationTable};
use crate::types::{DevelopmentError, DevelopmentResult};

#[derive(Debug, Clone, PartialEq)]
pub struct DriveRule {
    pub source: PopulationId,
    pub target: PopulationId,
    pub mapping: DriveMapping,
    pub distance: f64,
}

impl DriveRule {
    pub fn resolve_all(
        config: &SpikenetConfig,
        populations: &PopulationTable,
    ) -> DevelopmentResult<Vec<DriveRule>> {
        config
            .connectivity
            .drive_rules
            .iter()
            .map(|spec| {
                let source = populations.by_name(&spec.source)?;
                let target = populations.by_name(&spec.target)?;
                if !source.is_drive() {
                    return Err(DevelopmentError::InvalidConfiguration(format!(
                        "drive rule source '{}' is not a drive population",
                        spec.source
                    )));
                }
                Ok(DriveRule {
                    source: source.id,
                    target: target.id,
                    mapping: spec.mapping,
                    distance: spec.distance,
                })
            })
            .collect()
    }

    /// Source cells for a cell of the target population
    ///
    /// Empty when the mapping has no source cell to offer (an empty source
    /// half); the caller reports that.
    pub fn sources_for(&self, source: &Population, target: &Population, post: Gid) -> Vec<Gid> {
        let k = target.offset(post);
        let pick = |first: usize, len: usize, index: usize| -> Option<Gid> {
            (len > 0).then(|| Gid::from(source.start + first + index % len))
        };

        let chosen = match self.mapping {
            DriveMapping::Modulo => pick(0, source.size, k),
            DriveMapping::SplitHalves => {
                let target_half = target.size / 2;
                let source_half = source.size / 2;
                if k < target_half {
                    pick(0, source_half, k)
                } else {
                    pick(source_half, source.size - source_half, k - target_half)
                }
            }
        };
        chosen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_config::presets;

    fn setup(mapping: DriveMapping) -> (PopulationTable, DriveRule) {
        let mut config = presets::reaching_circuit();
        config.connectivity.drive_rules[0].mapping = mapping;
        let table = PopulationTable::from_config(&config.network).unwrap();
        let rule = DriveRule::resolve_all(&config, &table).unwrap().remove(0);
        (table, rule)
    }

    #[test]
    fn test_modulo_mapping() {
        let (table, rule) = setup(DriveMapping::Modulo);
        let source = table.get(rule.source);
        let target = table.get(rule.target);

        // DRIVE has 8 cells starting at 0; ER5 starts at 8
        assert_eq!(rule.sources_for(source, target, Gid(8)), vec![Gid(0)]);
        assert_eq!(rule.sources_for(source, target, Gid(8 + 11)), vec![Gid(3)]);
    }

    #[test]
    fn test_split_halves_mapping() {
        let (table, rule) = setup(DriveMapping::SplitHalves);
        let source = table.get(rule.source);
        let target = table.get(rule.target);

        // ER5 has 40 cells: 0..20 use DRIVE 0..4, 20..40 use DRIVE 4..8
        assert_eq!(rule.sources_for(source, target, Gid(8 + 5)), vec![Gid(1)]);
        assert_eq!(rule.sources_for(source, target, Gid(8 + 19)), vec![Gid(3)]);
        assert_eq!(rule.sources_for(source, target, Gid(8 + 20)), vec![Gid(4)]);
        assert_eq!(rule.sources_for(source, target, Gid(8 + 39)), vec![Gid(7)]);
    }

    #[test]
    fn test_empty_half_yields_nothing() {
        let (table, rule) = setup(DriveMapping::SplitHalves);
        let mut source = table.get(rule.source).clone();
        source.size = 1;
        let target = table.get(rule.target);

        assert!(rule.sources_for(&source, target, Gid(8)).is_empty());
        assert_eq!(rule.sources_for(&source, target, Gid(8 + 30)), vec![Gid(0)]);
    }
}
