// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reward-modulated STDP rule
//!
//! ```text
//! pre spike at t,  last post at t_post:  Δ = anti · exp((t_post - t) / tau)
//! post spike at t, last pre at t_pre:    Δ = hebb · exp((t_pre - t) / tau)
//! reward r at t:                         Δ = r · (hebbRL(t) + antiRL(t))
//!
//! step window:        xRL(t) = rate                          if t - t_elig ≤ window
//! exponential window: xRL(t) = rate · exp((t_elig - t) / window)
//! soft threshold:     Δ > 0 → Δ · (1 - w / w_max),  Δ < 0 → Δ · w / w_max
//! ```
//!
//! Every adjustment clamps the weight to `[0, w_max]`.

use serde::{Deserialize, Serialize};
use spikenet_config::PlasticityConfig;
use spikenet_neural::Polarity;

/// Shape of the eligibility window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityWindow {
    Step,
    Exponential,
}

/// Rule parameters for synapses of one presynaptic polarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StdpParams {
    /// Hebbian (pre-before-post) rate
    pub hebb: f64,
    /// Anti-Hebbian (post-before-pre) rate
    pub anti: f64,
    /// Reward potentiation rate
    pub reward_hebb: f64,
    /// Reward depression rate
    pub reward_anti: f64,
    pub reward_enabled: bool,
    pub max_weight: f64,
    /// STDP time constant (ms)
    pub tau: f64,
    /// Eligibility window (ms)
    pub eligibility_window: f64,
    pub window: EligibilityWindow,
    pub soft_threshold: bool,
}

impl Default for StdpParams {
    fn default() -> Self {
        Self::for_polarity(&PlasticityConfig::default(), Polarity::Excitatory)
    }
}

impl StdpParams {
    /// Rates from the row of `config` for presynaptic polarity `pre`
    pub fn for_polarity(config: &PlasticityConfig, pre: Polarity) -> Self {
        let [hebb, anti] = config.stdp_rates[pre.index()];
        let [reward_hebb, reward_anti] = config.reward_rates[pre.index()];
        Self {
            hebb,
            anti,
            reward_hebb,
            reward_anti,
            reward_enabled: config.reward_enabled,
            max_weight: config.max_weight,
            tau: config.stdp_window,
            eligibility_window: config.eligibility_window,
            window: if config.exponential_eligibility {
                EligibilityWindow::Exponential
            } else {
                EligibilityWindow::Step
            },
            soft_threshold: config.soft_threshold,
        }
    }

    /// Depression on a pre spike at `t` after a post spike at `t_post`
    #[inline]
    pub fn depression(&self, t_post: f64, t: f64) -> f64 {
        self.anti * ((t_post - t) / self.tau).exp()
    }

    /// Potentiation on a post spike at `t` after a pre spike at `t_pre`
    #[inline]
    pub fn potentiation(&self, t_pre: f64, t: f64) -> f64 {
        self.hebb * ((t_pre - t) / self.tau).exp()
    }

    /// Contribution of one eligibility mark at `t`; 0 without a mark or
    /// outside a step window
    pub fn eligibility(&self, rate: f64, marked: Option<f64>, t: f64) -> f64 {
        let Some(t_mark) = marked else {
            return 0.0;
        };
        match self.window {
            EligibilityWindow::Step if t - t_mark <= self.eligibility_window => rate,
            EligibilityWindow::Step => 0.0,
            EligibilityWindow::Exponential => {
                rate * ((t_mark - t) / self.eligibility_window).exp()
            }
        }
    }

    /// Apply the optional soft threshold to a reward adjustment
    pub fn soften(&self, delta: f64, weight: f64) -> f64 {
        if !self.soft_threshold || self.max_weight <= 0.0 {
            return delta;
        }
        if delta > 0.0 {
            delta * (1.0 - weight / self.max_weight)
        } else {
            delta * weight / self.max_weight
        }
    }

    /// `weight + delta` clamped to `[0, max_weight]`
    #[inline]
    pub fn clamp(&self, weight: f64, delta: f64) -> f64 {
        (weight + delta).clamp(0.0, self.max_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StdpParams {
        StdpParams {
            hebb: 0.1,
            anti: -0.13,
            reward_hebb: 0.5,
            reward_anti: -0.25,
            reward_enabled: true,
            max_weight: 5.0,
            tau: 10.0,
            eligibility_window: 50.0,
            window: EligibilityWindow::Step,
            soft_threshold: false,
        }
    }

    #[test]
    fn test_timing_factors_decay_with_interval() {
        let p = params();
        assert!((p.potentiation(10.0, 10.0) - 0.1).abs() < 1e-12);
        assert!((p.potentiation(0.0, 10.0) - 0.1 * (-1.0f64).exp()).abs() < 1e-12);
        assert!((p.depression(0.0, 20.0) + 0.13 * (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_step_window_edges() {
        let p = params();
        assert_eq!(p.eligibility(0.5, Some(0.0), 50.0), 0.5);
        assert_eq!(p.eligibility(0.5, Some(0.0), 50.1), 0.0);
        assert_eq!(p.eligibility(0.5, None, 1.0), 0.0);
    }

    #[test]
    fn test_exponential_window() {
        let p = StdpParams {
            window: EligibilityWindow::Exponential,
            ..params()
        };
        let value = p.eligibility(0.5, Some(0.0), 50.0);
        assert!((value - 0.5 * (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_soft_threshold_scales_towards_bounds() {
        let p = StdpParams {
            soft_threshold: true,
            ..params()
        };
        assert!((p.soften(1.0, 4.0) - 0.2).abs() < 1e-12);
        assert!((p.soften(-1.0, 4.0) + 0.8).abs() < 1e-12);
        assert_eq!(params().soften(1.0, 4.0), 1.0);
    }

    #[test]
    fn test_clamp_bounds() {
        let p = params();
        assert_eq!(p.clamp(4.9, 1.0), 5.0);
        assert_eq!(p.clamp(0.1, -1.0), 0.0);
    }

    #[test]
    fn test_rows_follow_pre_polarity() {
        let config = PlasticityConfig::default();
        let inhibitory = StdpParams::for_polarity(&config, Polarity::Inhibitory);
        assert_eq!(inhibitory.hebb, 0.0);
        assert_eq!(StdpParams::default().hebb, 0.1);
    }
}
