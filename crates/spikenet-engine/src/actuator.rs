// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Actuator contract and the reference reaching arm.

The driver steps the actuator on every worker after each increment, passing
motor-command spike counts of the whole network (every worker sees all
spikes after the exchange). Only the coordinator's actuator is asked for a
reward; the value is broadcast.
*/

use rand::Rng;
use spikenet_config::ActuatorConfig;
use spikenet_neural::rng::{stream, StreamDomain};
use spikenet_neural::Rank;
use tracing::{debug, info};

use crate::types::{EngineError, EngineResult};

/// What an actuator sees of the network
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorContext {
    pub rank: Rank,
    pub workers: usize,
    /// Number of muscle groups of the motor-command population
    pub muscles: usize,
    pub cells_per_muscle: usize,
    /// Length of the increment the counts cover (ms)
    pub interval: f64,
    /// Spikes per muscle group during the increment
    pub muscle_spikes: Vec<usize>,
}

/// Converts motor-command activity into a physical state and a reward
pub trait Actuator: Send {
    fn setup(&mut self, ctx: &ActuatorContext) -> EngineResult<()>;

    fn step(&mut self, t: f64, ctx: &ActuatorContext) -> EngineResult<()>;

    /// Reward for the behavior since the previous call; 0 means no reward
    fn reward(&mut self, t: f64) -> f64;

    fn close(&mut self, ctx: &ActuatorContext);
}

/// Planar arm with one joint per antagonist muscle pair.
///
/// Muscles `2j` and `2j + 1` flex and extend joint `j`. Each increment moves
/// the joint by `gain × (flexor spikes - extensor spikes) / cells per
/// muscle`. The reward is the sign of the decrease of the summed distance to
/// the target angles, or 0 when the change is below the threshold.
#[derive(Debug, Clone)]
pub struct DummyArm {
    targets: Vec<f64>,
    gain: f64,
    threshold: f64,
    seed: u64,
    angles: Vec<f64>,
    last_error: f64,
}

impl DummyArm {
    pub fn new(config: &ActuatorConfig, seed: u64) -> Self {
        Self {
            targets: config.target_angles.clone(),
            gain: config.gain,
            threshold: config.reward_threshold,
            seed,
            angles: Vec::new(),
            last_error: 0.0,
        }
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Summed absolute distance to the target angles
    pub fn error(&self) -> f64 {
        self.angles
            .iter()
            .zip(&self.targets)
            .map(|(angle, target)| (angle - target).abs())
            .sum()
    }
}

impl Actuator for DummyArm {
    fn setup(&mut self, ctx: &ActuatorContext) -> EngineResult<()> {
        let joints = ctx.muscles / 2;
        if joints == 0 || ctx.muscles % 2 != 0 {
            return Err(EngineError::Actuator(format!(
                "arm needs an even, non-zero muscle count, got {}",
                ctx.muscles
            )));
        }
        if self.targets.len() != joints {
            return Err(EngineError::Actuator(format!(
                "{} target angles for {} joints",
                self.targets.len(),
                joints
            )));
        }
        // initial posture is shared by every worker
        let mut rng = stream(self.seed, StreamDomain::Actuator, 0);
        self.angles = (0..joints).map(|_| rng.gen_range(-0.5..0.5)).collect();
        self.last_error = self.error();
        debug!(
            target: "spikenet-engine",
            "Arm with {} joints, initial error {:.4}",
            joints,
            self.last_error
        );
        Ok(())
    }

    fn step(&mut self, _t: f64, ctx: &ActuatorContext) -> EngineResult<()> {
        if ctx.cells_per_muscle == 0 {
            return Ok(());
        }
        let per_muscle = ctx.cells_per_muscle as f64;
        for (joint, angle) in self.angles.iter_mut().enumerate() {
            let flexor = ctx.muscle_spikes.get(2 * joint).copied().unwrap_or(0) as f64;
            let extensor = ctx.muscle_spikes.get(2 * joint + 1).copied().unwrap_or(0) as f64;
            *angle = (*angle + self.gain * (flexor - extensor) / per_muscle)
                .clamp(-std::f64::consts::PI, std::f64::consts::PI);
        }
        Ok(())
    }

    fn reward(&mut self, _t: f64) -> f64 {
        let error = self.error();
        let improvement = self.last_error - error;
        self.last_error = error;
        if improvement.abs() < self.threshold {
            0.0
        } else {
            improvement.signum()
        }
    }

    fn close(&mut self, ctx: &ActuatorContext) {
        if ctx.rank == 0 {
            info!(
                target: "spikenet-engine",
                "Arm final angles {:?}, error {:.4}",
                self.angles,
                self.error()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(muscle_spikes: Vec<usize>) -> ActuatorContext {
        ActuatorContext {
            rank: 0,
            workers: 1,
            muscles: 4,
            cells_per_muscle: 2,
            interval: 1.0,
            muscle_spikes,
        }
    }

    fn arm(targets: Vec<f64>) -> DummyArm {
        DummyArm::new(
            &ActuatorConfig {
                enabled: true,
                target_angles: targets,
                gain: 0.1,
                reward_threshold: 1e-6,
            },
            7,
        )
    }

    #[test]
    fn test_setup_checks_joint_count() {
        let mut wrong = arm(vec![0.0]);
        assert!(wrong.setup(&ctx(vec![0; 4])).is_err());
        let mut right = arm(vec![0.0, 0.0]);
        right.setup(&ctx(vec![0; 4])).unwrap();
        assert_eq!(right.angles().len(), 2);
        assert!(right.angles().iter().all(|a| a.abs() <= 0.5));
    }

    #[test]
    fn test_flexor_activity_moves_joint() {
        let mut a = arm(vec![0.0, 0.0]);
        a.setup(&ctx(vec![0; 4])).unwrap();
        let before = a.angles().to_vec();
        a.step(1.0, &ctx(vec![4, 0, 0, 2])).unwrap();
        assert!((a.angles()[0] - (before[0] + 0.2)).abs() < 1e-12);
        assert!((a.angles()[1] - (before[1] - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_reward_sign_follows_error() {
        // initial angles lie in [-0.5, 0.5], well below the target of joint 0
        let mut a = arm(vec![2.0, 0.0]);
        a.setup(&ctx(vec![0; 4])).unwrap();
        assert_eq!(a.reward(1.0), 0.0);

        a.step(2.0, &ctx(vec![1, 0, 0, 0])).unwrap();
        assert_eq!(a.reward(2.0), 1.0);

        a.step(3.0, &ctx(vec![0, 1, 0, 0])).unwrap();
        a.step(4.0, &ctx(vec![0, 1, 0, 0])).unwrap();
        assert_eq!(a.reward(4.0), -1.0);
    }

    #[test]
    fn test_posture_is_reproducible() {
        let mut a = arm(vec![0.0, 0.0]);
        let mut b = arm(vec![0.0, 0.0]);
        a.setup(&ctx(vec![0; 4])).unwrap();
        b.setup(&ctx(vec![0; 4])).unwrap();
        assert_eq!(a.angles(), b.angles());
    }
}
