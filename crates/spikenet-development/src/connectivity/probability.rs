// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connection probability for every candidate presynaptic cell
//!
//! `p[j] = pair_probability[pop(j), pop(post)]
//!       * polarity_scale[pol(j), pol(post)]
//!       * exp(-planar_distance[j] / falloff[pol(post)])`
//!
//! Drive cells and the post cell itself always get probability 0.

use ndarray::{s, Array1, Array2};
use spikenet_config::{FalloffConfig, SpikenetConfig};
use spikenet_neural::Gid;

use crate::populations::{Population, PopulationTable};
use crate::types::DevelopmentResult;

#[derive(Debug, Clone)]
pub struct ProbabilityTable {
    /// `[pre population, post population]`, polarity scale already applied
    base: Array2<f64>,
    falloff: FalloffConfig,
}

impl ProbabilityTable {
    pub fn from_config(
        config: &SpikenetConfig,
        populations: &PopulationTable,
    ) -> DevelopmentResult<Self> {
        let n_pop = populations.len();
        let mut base = Array2::<f64>::zeros((n_pop, n_pop));
        for pair in &config.connectivity.pairs {
            let pre = populations.by_name(&pair.pre)?;
            let post = populations.by_name(&pair.post)?;
            let scale =
                config.connectivity.probability_scale[pre.polarity.index()][post.polarity.index()];
            base[[pre.id.index(), post.id.index()]] = pair.probability * scale;
        }

        Ok(Self {
            base,
            falloff: config.connectivity.falloff,
        })
    }

    /// Base probability (before distance falloff) between two populations
    pub fn base(&self, pre: &Population, post: &Population) -> f64 {
        self.base[[pre.id.index(), post.id.index()]]
    }

    /// Probabilities for all candidates onto `post`
    pub fn candidates(
        &self,
        populations: &PopulationTable,
        post: Gid,
        planar: &Array1<f64>,
    ) -> Array1<f64> {
        let post_population = populations.of(post);
        let decay = self.falloff.length(post_population.polarity);
        let mut probabilities = Array1::<f64>::zeros(planar.len());

        for pre_population in populations.iter().filter(|p| !p.is_drive()) {
            let base = self.base(pre_population, post_population);
            if base == 0.0 {
                continue;
            }
            let range = pre_population.gids();
            let mut block = probabilities.slice_mut(s![range.clone()]);
            match decay {
                Some(length) => block.zip_mut_with(&planar.slice(s![range]), |p, &d| {
                    *p = base * (-d / length).exp();
                }),
                None => block.fill(base),
            }
        }

        probabilities[post.index()] = 0.0;
        probabilities
    }
}
