// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs: build, simulate, gather, persist

use std::path::Path;

use spikenet::config::{load_config, presets, validate_config, SpikenetConfig};
use spikenet::{
    run_distributed, DatasetSink, JsonDatasetSink, RunSummary, SpikeRecord, SpikenetError,
};

fn short_reaching(workers: usize) -> SpikenetConfig {
    let mut config = presets::reaching_circuit();
    config.simulation.duration = 80.0;
    config.simulation.reward_interval = 10.0;
    config.plasticity.snapshot_interval = 20.0;
    config.cluster.workers = workers;
    config
}

fn sorted_spikes(spikes: &[SpikeRecord]) -> Vec<(u32, f64)> {
    let mut sorted: Vec<(u32, f64)> = spikes.iter().map(|s| (s.cell_id, s.spike_time)).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    sorted
}

#[test]
fn test_repeated_runs_are_identical() {
    let config = short_reaching(3);
    let first = run_distributed(&config).unwrap();
    let second = run_distributed(&config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.info.workers, 3);
}

#[test]
fn test_worker_count_does_not_change_results() {
    let single = run_distributed(&short_reaching(1)).unwrap();
    let four = run_distributed(&short_reaching(4)).unwrap();

    assert_eq!(sorted_spikes(&single.spikes), sorted_spikes(&four.spikes));
    assert_eq!(single.connections.len(), four.connections.len());
    assert_eq!(single.plasticity.len(), four.plasticity.len());

    // field potentials are summed over workers
    assert_eq!(single.field_potentials.len(), four.field_potentials.len());
    for (a, b) in single.field_potentials.iter().zip(&four.field_potentials) {
        assert_eq!(a.time, b.time);
        assert!((a.potential - b.potential).abs() < 1e-6 * a.potential.abs().max(1.0));
    }
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let mut config = short_reaching(2);
    config.actuator.enabled = false;
    assert!(matches!(run_distributed(&config), Err(SpikenetError::Config(_))));
}

#[test]
fn test_json_sink_round_trip() {
    let dataset = run_distributed(&short_reaching(2)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("dataset.json");

    let mut sink = JsonDatasetSink::new(&path);
    sink.write(&dataset).unwrap();
    let read = JsonDatasetSink::read(&path).unwrap();

    assert_eq!(read.info, dataset.info);
    assert_eq!(read.spikes.len(), dataset.spikes.len());
    assert_eq!(read.connections, dataset.connections);
}

#[test]
fn test_summary_matches_dataset() {
    let dataset = run_distributed(&short_reaching(2)).unwrap();
    let summary = RunSummary::from_dataset(&dataset);

    assert_eq!(summary.cells, 74);
    assert_eq!(summary.spikes, dataset.spikes.len());
    assert_eq!(summary.connectivity.connections, dataset.connections.len());
    let expected_rate = dataset.spikes.len() as f64 / 74.0 / 0.08;
    assert!((summary.mean_rate_hz - expected_rate).abs() < 1e-9);
}

#[test]
fn test_demo_configuration_loads_and_validates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("spikenet_configuration.toml");
    let config = load_config(Some(path.as_path()), None).unwrap();
    validate_config(&config).unwrap();

    let preset = presets::reaching_circuit();
    assert_eq!(config.network.populations, preset.network.populations);
    assert_eq!(config.connectivity.pairs, preset.connectivity.pairs);
    assert_eq!(config.connectivity.drive_rules, preset.connectivity.drive_rules);
}
