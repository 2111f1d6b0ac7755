// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the simulation driver

use spikenet_cluster::{gather, Communicator, GatheredRun, LocalCluster, SingleWorker};
use spikenet_config::{presets, SpikenetConfig};
use spikenet_development::develop;
use spikenet_engine::{
    reference_model, Actuator, Driver, DriverState, DriverStats, DummyArm, EngineError,
};
use spikenet_plasticity::PlasticityRecord;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn short_reaching(duration: f64) -> SpikenetConfig {
    let mut config = presets::reaching_circuit();
    config.simulation.duration = duration;
    config.plasticity.snapshot_interval = 20.0;
    config.simulation.reward_interval = 10.0;
    config
}

fn arm(config: &SpikenetConfig) -> Option<Box<dyn Actuator>> {
    Some(Box::new(DummyArm::new(&config.actuator, config.network.seed)))
}

#[test]
fn test_reward_without_actuator_is_fatal() {
    let config = short_reaching(10.0);
    let network = develop(&config, 1, 0).unwrap();
    let model = reference_model(&config).unwrap();
    let result = Driver::new(&config, network, model, SingleWorker, None);
    assert!(matches!(result, Err(EngineError::MissingActuator)));
}

#[test]
fn test_single_worker_run_lifecycle() {
    let mut config = presets::two_population(20, 5, 0.2);
    config.simulation.duration = 25.0;
    config.simulation.loop_step = 2.0;
    let network = develop(&config, 1, 0).unwrap();
    let connections = network.connections.len();
    let model = reference_model(&config).unwrap();

    let mut driver = Driver::new(&config, network, model, SingleWorker, None).unwrap();
    assert_eq!(driver.state(), DriverState::Idle);
    driver.run_to_end().unwrap();
    assert_eq!(driver.state(), DriverState::Stepping);
    // 12 full increments and one clipped to 25 ms
    assert_eq!(driver.stats().increments, 13);
    assert_eq!(driver.clock().time(), 25.0);
    assert!(!driver.step().unwrap());

    let bundle = driver.finish().unwrap();
    assert_eq!(driver.state(), DriverState::Done);
    assert!(matches!(driver.step(), Err(EngineError::InvalidState(DriverState::Done))));
    assert_eq!(bundle.connections.len(), connections);
    assert!(bundle.spikes.iter().all(|s| s.time <= 25.0));
    assert!(bundle
        .spikes
        .windows(2)
        .all(|w| w[0].time <= w[1].time));
}

#[test]
fn test_distributed_run_gathers_everything() {
    let config = short_reaching(60.0);
    let workers = 3;

    let results = LocalCluster::run(workers, |comm| -> Result<Option<GatheredRun>, BoxError> {
        let network = develop(&config, workers, comm.rank())?;
        let model = reference_model(&config)?;
        let driver = Driver::new(&config, network, model, comm, arm(&config))?;
        Ok(driver.run()?)
    })
    .unwrap();

    let gathered: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    assert!(gathered[1].is_none());
    assert!(gathered[2].is_none());
    let run = gathered[0].as_ref().unwrap();

    assert_eq!(run.workers, workers);
    let all_connections: usize = (0..workers)
        .map(|rank| develop(&config, workers, rank).unwrap().connections.len())
        .sum();
    assert_eq!(run.connections.len(), all_connections);
    assert!(!run.plasticity.is_empty());
    for record in &run.plasticity {
        assert_eq!(record.log[0].0, 0.0);
        assert!(record.log.windows(2).all(|w| w[0].1 != w[1].1));
    }

    // ER5 sampled once per 1 ms increment
    assert_eq!(run.field_potentials.len(), 1);
    assert_eq!(run.field_potentials[0].name, "ER5");
    assert_eq!(run.field_potentials[0].samples.len(), 60);
}

/// Per-rank stats plus the coordinator's merged run
fn run_with_stats(
    config: &SpikenetConfig,
    workers: usize,
) -> (Vec<DriverStats>, GatheredRun) {
    let results = LocalCluster::run(
        workers,
        |comm| -> Result<(DriverStats, Option<GatheredRun>), BoxError> {
            let network = develop(config, workers, comm.rank())?;
            let model = reference_model(config)?;
            let mut driver = Driver::new(config, network, model, comm, arm(config))?;
            driver.run_to_end()?;
            let stats = driver.stats();
            let bundle = driver.finish()?;
            let gathered = gather(driver.comm(), &bundle)?;
            Ok((stats, gathered))
        },
    )
    .unwrap();

    let mut stats = Vec::new();
    let mut merged = None;
    for result in results {
        let (worker_stats, gathered) = result.unwrap();
        stats.push(worker_stats);
        if gathered.is_some() {
            merged = gathered;
        }
    }
    (stats, merged.unwrap())
}

fn sorted_plasticity(run: &GatheredRun) -> Vec<PlasticityRecord> {
    let mut records = run.plasticity.clone();
    records.sort_by_key(|r| r.synapse);
    records
}

#[test]
fn test_rewards_are_broadcast_and_applied_identically() {
    let config = short_reaching(200.0);

    let (single_stats, single) = run_with_stats(&config, 1);
    let (pair_stats, pair) = run_with_stats(&config, 2);

    let rewards = single_stats[0].rewards_applied;
    assert!(rewards > 0, "no reward reached the synapses");
    // at most one reward per 10 ms interval
    assert!(rewards <= 20);
    assert!(pair_stats.iter().all(|s| s.rewards_applied == rewards));
    assert!(pair_stats.iter().all(|s| s.increments == single_stats[0].increments));

    let single_records = sorted_plasticity(&single);
    assert_eq!(single_records, sorted_plasticity(&pair));
    // rewards leave a trace in the weight logs
    assert!(single_records.iter().any(|r| r.log.len() > 1));
}

#[test]
fn test_reward_path_is_repeatable() {
    let config = short_reaching(100.0);
    let (first_stats, first) = run_with_stats(&config, 2);
    let (second_stats, second) = run_with_stats(&config, 2);

    assert_eq!(first_stats, second_stats);
    assert_eq!(sorted_plasticity(&first), sorted_plasticity(&second));
}
