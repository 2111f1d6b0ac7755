// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Worker assembly: build → run → gather

use spikenet_cluster::{ClusterError, Communicator, GatheredRun, LocalCluster};
use spikenet_config::{validate_config, SpikenetConfig};
use spikenet_development::develop;
use spikenet_engine::{reference_model, Actuator, Driver, DummyArm, EngineError};
use tracing::{error, info};

use crate::dataset::Dataset;
use crate::error::{SpikenetError, SpikenetResult};
use crate::summary::RunSummary;

/// The reference arm when the actuator is enabled
fn actuator_for(config: &SpikenetConfig) -> Option<Box<dyn Actuator>> {
    if !config.actuator.enabled {
        return None;
    }
    Some(Box::new(DummyArm::new(&config.actuator, config.network.seed)))
}

/// Run one worker end to end with the reference model and actuator.
///
/// Returns the gathered run on the coordinator and `None` elsewhere.
pub fn run_worker<C: Communicator>(
    config: &SpikenetConfig,
    comm: C,
) -> SpikenetResult<Option<GatheredRun>> {
    let network = develop(config, comm.size(), comm.rank())?;
    let model = reference_model(config)?;
    let driver = Driver::new(config, network, model, comm, actuator_for(config))?;
    Ok(driver.run()?)
}

fn is_disconnect(err: &SpikenetError) -> bool {
    matches!(
        err,
        SpikenetError::Cluster(ClusterError::Disconnected { .. })
            | SpikenetError::Engine(EngineError::Cluster(ClusterError::Disconnected { .. }))
    )
}

/// Validate `config`, run it on `cluster.workers` in-process workers and
/// return the consolidated dataset.
///
/// When workers fail, the reported error is the first one that is not a
/// mere disconnection caused by another worker leaving.
pub fn run_distributed(config: &SpikenetConfig) -> SpikenetResult<Dataset> {
    validate_config(config)?;
    let workers = config.cluster.workers;
    info!(
        target: "spikenet",
        "Starting run: {} cells, {:.1} ms, {} workers, seed {}",
        config.network.total_cells(),
        config.simulation.duration,
        workers,
        config.network.seed
    );

    let results = LocalCluster::run(workers, |comm| run_worker(config, comm))?;

    let mut gathered = None;
    let mut failures = Vec::new();
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(Some(run)) => gathered = Some(run),
            Ok(None) => {}
            Err(err) => {
                error!(target: "spikenet", "Worker {} failed: {}", rank, err);
                failures.push((rank, err));
            }
        }
    }
    if !failures.is_empty() {
        let index = failures
            .iter()
            .position(|(_, err)| !is_disconnect(err))
            .unwrap_or(0);
        let (rank, source) = failures.swap_remove(index);
        return Err(SpikenetError::Worker {
            rank,
            source: Box::new(source),
        });
    }

    let run = gathered.ok_or(SpikenetError::MissingGather)?;
    let dataset = Dataset::from_run(run, config);
    RunSummary::from_dataset(&dataset).log();
    Ok(dataset)
}
