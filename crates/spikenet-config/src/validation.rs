// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that names resolve, tables have the right shape and numeric values
//! are in range. Every problem is collected so a broken configuration is
//! reported in one pass.

use crate::{ConfigError, ConfigResult, PopulationRole, SpikenetConfig};
use spikenet_neural::Polarity;
use std::collections::HashSet;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    UnknownPopulation { field: String, name: String },
    DuplicatePopulation { name: String },
    ReceptorCountMismatch { field: String, expected: usize, actual: usize },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPopulation { field, name } => {
                write!(f, "{} refers to unknown population '{}'", field, name)
            }
            Self::DuplicatePopulation { name } => {
                write!(f, "Population '{}' is defined more than once", name)
            }
            Self::ReceptorCountMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} weights but {} receptors are configured",
                field, actual, expected
            ),
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Population definitions (unique names, sizes, depth bands, roles)
/// - Name references in pairs, drive rules, plastic pairs and recordings
/// - Receptor counts of every pair weight vector
/// - Value ranges of connectivity and simulation parameters
/// - Reward learning without an actuator
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SpikenetConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    if config.simulation.loop_step > config.connectivity.min_delay {
        tracing::warn!(
            target: "spikenet-config",
            "loop_step {} ms exceeds min_delay {} ms; remote spikes reach their targets late",
            config.simulation.loop_step,
            config.connectivity.min_delay
        );
    }

    Ok(())
}

/// Run every check and return the problems found
pub fn collect_errors(config: &SpikenetConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_populations(config, &mut errors);
    validate_references(config, &mut errors);
    validate_receptors(config, &mut errors);
    validate_value_ranges(config, &mut errors);
    validate_required_fields(config, &mut errors);
    errors
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

fn validate_populations(config: &SpikenetConfig, errors: &mut Vec<ConfigValidationError>) {
    let network = &config.network;
    let mut seen = HashSet::new();

    for (index, population) in network.populations.iter().enumerate() {
        let field = format!("network.populations[{}]", index);

        if !seen.insert(population.name.as_str()) {
            errors.push(ConfigValidationError::DuplicatePopulation {
                name: population.name.clone(),
            });
        }
        if population.size == 0 {
            errors.push(invalid(format!("{}.size", field), "must be at least 1"));
        }

        let [low, high] = population.depth_band;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            errors.push(invalid(
                format!("{}.depth_band", field),
                format!("[{}, {}] must satisfy 0 <= low <= high <= 1", low, high),
            ));
        }

        let drive_role = matches!(population.role, PopulationRole::Drive);
        if drive_role != population.class.is_drive() {
            errors.push(invalid(
                format!("{}.role", field),
                "the drive role and the drive class must be used together",
            ));
        }

        match &population.role {
            PopulationRole::Standard | PopulationRole::Drive => {}
            PopulationRole::MotorCommand {
                muscles,
                antagonists,
            } => {
                if population.polarity != Polarity::Excitatory {
                    errors.push(invalid(
                        format!("{}.polarity", field),
                        "motor-command populations are excitatory",
                    ));
                }
                if *muscles == 0 || population.size % muscles != 0 {
                    errors.push(invalid(
                        format!("{}.role.muscles", field),
                        format!("size {} is not divisible into {} muscles", population.size, muscles),
                    ));
                }
                if antagonists.len() != *muscles {
                    errors.push(invalid(
                        format!("{}.role.antagonists", field),
                        format!("expected {} entries, found {}", muscles, antagonists.len()),
                    ));
                }
                if let Some(bad) = antagonists.iter().find(|&&m| m >= *muscles) {
                    errors.push(invalid(
                        format!("{}.role.antagonists", field),
                        format!("muscle {} out of range", bad),
                    ));
                }
            }
            PopulationRole::AntagonistInhibitory { mirrors } => {
                if population.polarity != Polarity::Inhibitory {
                    errors.push(invalid(
                        format!("{}.polarity", field),
                        "antagonist populations are inhibitory",
                    ));
                }
                match network.populations.iter().find(|p| &p.name == mirrors) {
                    None => errors.push(ConfigValidationError::UnknownPopulation {
                        field: format!("{}.role.mirrors", field),
                        name: mirrors.clone(),
                    }),
                    Some(motor) => {
                        if !matches!(motor.role, PopulationRole::MotorCommand { .. }) {
                            errors.push(invalid(
                                format!("{}.role.mirrors", field),
                                format!("'{}' is not a motor-command population", mirrors),
                            ));
                        }
                        let inhibition_pair = config
                            .connectivity
                            .pairs
                            .iter()
                            .any(|p| p.pre == population.name && &p.post == mirrors);
                        if !inhibition_pair {
                            errors.push(ConfigValidationError::MissingRequired {
                                field: format!(
                                    "connectivity.pairs entry {} -> {} (antagonist inhibition weights)",
                                    population.name, mirrors
                                ),
                            });
                        }
                        if motor.size != population.size {
                            errors.push(invalid(
                                format!("{}.size", field),
                                format!("must equal the size of '{}' ({})", mirrors, motor.size),
                            ));
                        }
                    }
                }
            }
        }
    }
}

fn validate_references(config: &SpikenetConfig, errors: &mut Vec<ConfigValidationError>) {
    let network = &config.network;
    let mut check = |field: String, name: &str| {
        if network.population_index(name).is_none() {
            errors.push(ConfigValidationError::UnknownPopulation {
                field,
                name: name.to_string(),
            });
        }
    };

    for (index, pair) in config.connectivity.pairs.iter().enumerate() {
        check(format!("connectivity.pairs[{}].pre", index), &pair.pre);
        check(format!("connectivity.pairs[{}].post", index), &pair.post);
    }
    for (index, rule) in config.connectivity.drive_rules.iter().enumerate() {
        check(format!("connectivity.drive_rules[{}].source", index), &rule.source);
        check(format!("connectivity.drive_rules[{}].target", index), &rule.target);
    }
    for (index, [pre, post]) in config.plasticity.plastic_pairs.iter().enumerate() {
        check(format!("plasticity.plastic_pairs[{}]", index), pre);
        check(format!("plasticity.plastic_pairs[{}]", index), post);
    }
    for name in &config.simulation.field_potential.populations {
        check("simulation.field_potential.populations".to_string(), name);
    }

    for (index, rule) in config.connectivity.drive_rules.iter().enumerate() {
        let source = network.populations.iter().find(|p| p.name == rule.source);
        if let Some(source) = source {
            if !matches!(source.role, PopulationRole::Drive) {
                errors.push(invalid(
                    format!("connectivity.drive_rules[{}].source", index),
                    format!("'{}' is not a drive population", rule.source),
                ));
            }
        }
        if !rule.distance.is_finite() || rule.distance < 0.0 {
            errors.push(invalid(
                format!("connectivity.drive_rules[{}].distance", index),
                "must be finite and non-negative",
            ));
        }
    }
}

fn validate_receptors(config: &SpikenetConfig, errors: &mut Vec<ConfigValidationError>) {
    let expected = config.network.receptor_count();
    if expected == 0 {
        errors.push(ConfigValidationError::MissingRequired {
            field: "network.receptors".to_string(),
        });
    }

    for (index, pair) in config.connectivity.pairs.iter().enumerate() {
        if pair.weights.len() != expected {
            errors.push(ConfigValidationError::ReceptorCountMismatch {
                field: format!("connectivity.pairs[{}].weights", index),
                expected,
                actual: pair.weights.len(),
            });
        }
        if pair.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            errors.push(invalid(
                format!("connectivity.pairs[{}].weights", index),
                "weights must be finite and non-negative",
            ));
        }
        if !pair.probability.is_finite() || pair.probability < 0.0 {
            errors.push(invalid(
                format!("connectivity.pairs[{}].probability", index),
                "must be finite and non-negative",
            ));
        }
    }
}

fn validate_value_ranges(config: &SpikenetConfig, errors: &mut Vec<ConfigValidationError>) {
    let positive = |field: &str, value: f64, errors: &mut Vec<ConfigValidationError>| {
        if !(value.is_finite() && value > 0.0) {
            errors.push(invalid(field, format!("{} must be positive", value)));
        }
    };

    positive("network.model_size", config.network.model_size, errors);
    positive("network.cortical_thickness", config.network.cortical_thickness, errors);
    positive("connectivity.velocity", config.connectivity.velocity, errors);
    if config.connectivity.falloff.enabled {
        positive("connectivity.falloff.excitatory", config.connectivity.falloff.excitatory, errors);
        positive("connectivity.falloff.inhibitory", config.connectivity.falloff.inhibitory, errors);
    }
    if !(config.connectivity.min_delay.is_finite() && config.connectivity.min_delay >= 0.0) {
        errors.push(invalid("connectivity.min_delay", "must be non-negative"));
    }
    for row in config
        .connectivity
        .probability_scale
        .iter()
        .chain(config.connectivity.weight_scale.iter())
    {
        if row.iter().any(|v| !v.is_finite() || *v < 0.0) {
            errors.push(invalid(
                "connectivity.probability_scale/weight_scale",
                "entries must be finite and non-negative",
            ));
            break;
        }
    }

    let simulation = &config.simulation;
    positive("simulation.duration", simulation.duration, errors);
    positive("simulation.loop_step", simulation.loop_step, errors);
    positive("simulation.reward_interval", simulation.reward_interval, errors);
    positive("simulation.progress_interval", simulation.progress_interval, errors);

    let plasticity = &config.plasticity;
    positive("plasticity.max_weight", plasticity.max_weight, errors);
    positive("plasticity.stdp_window", plasticity.stdp_window, errors);
    positive("plasticity.eligibility_window", plasticity.eligibility_window, errors);
    positive("plasticity.snapshot_interval", plasticity.snapshot_interval, errors);

    positive("model.dt", config.model.dt, errors);

    if config.cluster.workers == 0 {
        errors.push(invalid("cluster.workers", "at least one worker is required"));
    }
}

fn validate_required_fields(config: &SpikenetConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.network.populations.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "network.populations".to_string(),
        });
    }

    if config.plasticity.reward_enabled && !config.actuator.enabled {
        errors.push(ConfigValidationError::MissingRequired {
            field: "actuator (plasticity.reward_enabled requires an actuator)".to_string(),
        });
    }

    if config.actuator.enabled {
        let motor_pair = config.network.populations.iter().any(|p| {
            matches!(p.role, PopulationRole::MotorCommand { .. })
        });
        if !motor_pair {
            errors.push(ConfigValidationError::MissingRequired {
                field: "a motor_command population (actuator.enabled)".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn test_presets_are_valid() {
        assert!(validate_config(&presets::two_population(20, 20, 0.1)).is_ok());
        assert!(validate_config(&presets::reaching_circuit()).is_ok());
    }

    #[test]
    fn test_empty_config_reports_missing_populations() {
        let errors = collect_errors(&SpikenetConfig::default());
        assert!(errors.contains(&ConfigValidationError::MissingRequired {
            field: "network.populations".to_string()
        }));
    }

    #[test]
    fn test_unknown_population_reported() {
        let mut config = presets::two_population(10, 10, 0.1);
        config.connectivity.pairs[0].pre = "ghost".to_string();

        let errors = collect_errors(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::UnknownPopulation { name, .. } if name == "ghost")));
    }

    #[test]
    fn test_receptor_mismatch_reported() {
        let mut config = presets::two_population(10, 10, 0.1);
        config.connectivity.pairs[0].weights = vec![1.0];

        let errors = collect_errors(&config);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::ReceptorCountMismatch { expected: 4, actual: 1, .. }
        )));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = presets::two_population(10, 10, 0.1);
        config.network.populations[0].depth_band = [0.8, 0.2];
        config.simulation.loop_step = 0.0;
        config.simulation.duration = -1.0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 3, "errors: {:?}", errors);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("depth_band"));
        assert!(message.contains("simulation.loop_step"));
    }

    #[test]
    fn test_reward_requires_actuator() {
        let mut config = presets::reaching_circuit();
        config.actuator.enabled = false;
        config.plasticity.reward_enabled = true;

        let errors = collect_errors(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::MissingRequired { .. })));
    }

    #[test]
    fn test_motor_command_muscle_split() {
        let mut config = presets::reaching_circuit();
        let motor = config
            .network
            .populations
            .iter_mut()
            .find(|p| matches!(p.role, PopulationRole::MotorCommand { .. }))
            .unwrap();
        motor.role = PopulationRole::MotorCommand {
            muscles: 3,
            antagonists: vec![1, 0, 5],
        };

        let errors = collect_errors(&config);
        // size not divisible, antagonist out of range, mirror size still matches
        assert!(errors.len() >= 2, "errors: {:?}", errors);
    }
}
