// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Per-connection weight vectors.

`weight[r] = weight_scale[pre polarity, post polarity]
           * pair_weight[pre population, post population, r]
           * receptor_scale[r]`

The product is precomputed for every population pair. A zero entry means
there is no synapse on that receptor channel.
*/

use ndarray::{s, Array1, Array2, Array3};
use spikenet_config::SpikenetConfig;
use spikenet_neural::PopulationId;

use crate::populations::PopulationTable;
use crate::types::{DevelopmentError, DevelopmentResult};

#[derive(Debug, Clone)]
pub struct WeightCalculator {
    /// `[pre population, post population, receptor]`
    table: Array3<f64>,
}

impl WeightCalculator {
    pub fn from_config(
        config: &SpikenetConfig,
        populations: &PopulationTable,
    ) -> DevelopmentResult<Self> {
        let n_pop = populations.len();
        let receptors = config.network.receptor_count();

        let receptor_scale =
            Array1::from_iter(config.network.receptors.iter().map(|r| r.scale));
        let polarity_scale = Array2::from_shape_fn((2, 2), |(i, j)| {
            config.connectivity.weight_scale[i][j]
        });

        let mut pair_weights = Array3::<f64>::zeros((n_pop, n_pop, receptors));
        for pair in &config.connectivity.pairs {
            let pre = populations.by_name(&pair.pre)?;
            let post = populations.by_name(&pair.post)?;
            if pair.weights.len() != receptors {
                return Err(DevelopmentError::ReceptorCountMismatch {
                    pair: format!("{}->{}", pair.pre, pair.post),
                    expected: receptors,
                    actual: pair.weights.len(),
                });
            }
            pair_weights
                .slice_mut(s![pre.id.index(), post.id.index(), ..])
                .assign(&Array1::from_vec(pair.weights.clone()));
        }

        let mut table = pair_weights;
        for pre in populations.iter() {
            for post in populations.iter() {
                let scale = polarity_scale[[pre.polarity.index(), post.polarity.index()]];
                let mut row = table.slice_mut(s![pre.id.index(), post.id.index(), ..]);
                row *= scale;
                row *= &receptor_scale;
            }
        }

        Ok(Self { table })
    }

    pub fn receptor_count(&self) -> usize {
        self.table.dim().2
    }

    /// Weight vector for a connection between two populations
    pub fn weights(&self, pre: PopulationId, post: PopulationId) -> Vec<f64> {
        self.table
            .slice(s![pre.index(), post.index(), ..])
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikenet_config::presets;

    #[test]
    fn test_weight_product() {
        let mut config = presets::two_population(4, 4, 0.5);
        config.connectivity.weight_scale = [[2.0, 3.0], [1.0, 1.0]];
        let table = PopulationTable::from_config(&config.network).unwrap();
        let calc = WeightCalculator::from_config(&config, &table).unwrap();

        let e = table.by_name("E").unwrap().id;
        let i = table.by_name("I").unwrap().id;

        // E->I: scale 3.0, pair [1, 1, 0, 0], receptors [1.0, 0.1, 1.0, 0.1]
        let w = calc.weights(e, i);
        assert_eq!(w.len(), 4);
        assert!((w[0] - 3.0).abs() < 1e-12);
        assert!((w[1] - 0.3).abs() < 1e-12);
        assert_eq!(w[2], 0.0);
        assert_eq!(w[3], 0.0);
    }

    #[test]
    fn test_unconfigured_pair_is_zero() {
        let mut config = presets::two_population(4, 4, 0.5);
        config.connectivity.pairs.retain(|p| p.pre == "E");
        let table = PopulationTable::from_config(&config.network).unwrap();
        let calc = WeightCalculator::from_config(&config, &table).unwrap();

        let i = table.by_name("I").unwrap().id;
        assert!(calc.weights(i, i).iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_receptor_mismatch_rejected() {
        let mut config = presets::two_population(4, 4, 0.5);
        config.connectivity.pairs[0].weights.push(1.0);
        let table = PopulationTable::from_config(&config.network).unwrap();

        assert!(matches!(
            WeightCalculator::from_config(&config, &table),
            Err(DevelopmentError::ReceptorCountMismatch { expected: 4, actual: 5, .. })
        ));
    }
}
