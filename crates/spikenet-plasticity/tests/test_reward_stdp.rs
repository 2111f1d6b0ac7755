// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for plastic synapse selection and reward modulation

use spikenet_config::{presets, SpikenetConfig};
use spikenet_development::{develop, PopulationTable};
use spikenet_neural::{Connection, ConnectionId, Gid, SpikeEvent, WeightView};
use spikenet_plasticity::{PlasticityError, SynapseState, SynapseTable};

fn reward_config() -> SpikenetConfig {
    let mut config = presets::two_population(20, 10, 0.5);
    config.plasticity.reward_enabled = true;
    config.plasticity.reward_rates = [[0.25, -0.25], [0.0, 0.0]];
    config.plasticity.max_weight = 5.0;
    config
}

fn build(config: &SpikenetConfig) -> (PopulationTable, Vec<Connection>, SynapseTable) {
    let network = develop(config, 1, 0).unwrap();
    let table =
        SynapseTable::select(&config.plasticity, &network.populations, &network.connections)
            .unwrap();
    (network.populations, network.connections, table)
}

#[test]
fn test_plastic_subset_invariant() {
    let config = reward_config();
    let (populations, connections, table) = build(&config);
    let e = populations.by_name("E").unwrap();
    assert!(!table.is_empty());

    for synapse in table.iter() {
        let connection = &connections[synapse.connection().0];
        // plastic pairs are E -> E and E -> I
        assert!(e.contains(connection.pre));
        assert!(connection.weights[synapse.receptor()] > 0.0);
    }

    // every eligible channel got a synapse
    let expected: usize = connections
        .iter()
        .filter(|c| e.contains(c.pre))
        .map(|c| c.weights.iter().filter(|w| **w > 0.0).count())
        .sum();
    assert_eq!(table.len(), expected);
}

#[test]
fn test_zero_rates_select_nothing() {
    let mut config = reward_config();
    config.plasticity.stdp_rates[0] = [0.0, 0.0];
    config.plasticity.reward_rates[0] = [0.0, 0.0];
    let (_, _, table) = build(&config);
    assert!(table.is_empty());

    let mut disabled = reward_config();
    disabled.plasticity.stdp_enabled = false;
    assert!(build(&disabled).2.is_empty());
}

#[test]
fn test_unknown_plastic_pair_is_an_error() {
    let mut config = reward_config();
    config.plasticity.plastic_pairs.push(["E".to_string(), "X".to_string()]);
    let network = develop(&config, 1, 0).unwrap();
    let result =
        SynapseTable::select(&config.plasticity, &network.populations, &network.connections);
    assert!(matches!(result, Err(PlasticityError::UnknownPopulation(name)) if name == "X"));
}

#[test]
fn test_positive_reward_bounded_by_rate() {
    let config = reward_config();
    let (_, connections, mut table) = build(&config);

    // pre then post for every synapse
    let mut spikes: Vec<SpikeEvent> = Vec::new();
    for synapse in table.iter() {
        spikes.push(SpikeEvent::new(synapse.key().pre, 10.0));
        spikes.push(SpikeEvent::new(synapse.key().post, 12.0));
    }
    spikes.dedup_by(|a, b| a.gid == b.gid && a.time == b.time);
    // route_spikes sorts; pass them reversed to make sure of it
    spikes.reverse();
    table.route_spikes(&spikes);

    let before: Vec<(f64, SynapseState)> =
        table.iter().map(|s| (s.weight(), s.state())).collect();
    table.apply_reward(1.0, 30.0);

    for (synapse, (weight, state)) in table.iter().zip(before) {
        if state != SynapseState::RewardPending {
            continue;
        }
        let rate = synapse.params().reward_hebb;
        // depression marks from post-before-pre pairings may also apply
        let expected_max = (weight + rate).min(config.plasticity.max_weight);
        assert!(synapse.weight() <= expected_max + 1e-12);
    }

    // the view returns the live synapse weight
    let view = table.weights(&connections);
    for synapse in table.iter() {
        assert_eq!(view.weight(synapse.connection(), synapse.receptor()), synapse.weight());
    }
}

#[test]
fn test_reward_is_exact_and_clamped() {
    let mut config = reward_config();
    config.plasticity.plastic_pairs = vec![["E".to_string(), "I".to_string()]];
    let (_, connections, mut table) = build(&config);
    let first = table.iter().next().unwrap().key();

    // one isolated pre -> post pairing on a single synapse
    table.route_spikes(&[SpikeEvent::new(first.pre, 5.0), SpikeEvent::new(first.post, 6.0)]);
    let synapse = table.iter().find(|s| s.key() == first).unwrap();
    assert_eq!(synapse.state(), SynapseState::RewardPending);
    let before = synapse.weight();
    let connection = synapse.connection();
    let receptor = synapse.receptor();

    table.apply_reward(1.0, 20.0);
    let after = table.on_channel(connection, receptor).unwrap().weight();
    let rate = config.plasticity.reward_rates[0][0];
    let expected = (before + rate).min(config.plasticity.max_weight);
    assert!((after - expected).abs() < 1e-12, "{} vs {}", after, expected);

    // post-only spikes mark potentiation eligibility without depression,
    // so large rewards saturate at the ceiling
    for k in 0..3 {
        let t = 100.0 + k as f64 * 10.0;
        table.route_spikes(&[SpikeEvent::new(first.post, t)]);
        table.apply_reward(50.0, t + 1.0);
    }
    let saturated = table.on_channel(connection, receptor).unwrap().weight();
    assert_eq!(saturated, config.plasticity.max_weight);

    // static channels read the generated weight
    let view = table.weights(&connections);
    let unbound = connections
        .iter()
        .enumerate()
        .find(|(i, _)| table.on_channel(ConnectionId(*i), 0).is_none())
        .map(|(i, c)| (ConnectionId(i), c.weights[0]));
    if let Some((id, weight)) = unbound {
        assert_eq!(view.weight(id, 0), weight);
    }
}

#[test]
fn test_snapshot_logs_only_changes() {
    let config = reward_config();
    let (_, _, mut table) = build(&config);
    assert_eq!(table.snapshot(100.0), 0);

    let key = table.iter().next().unwrap().key();
    table.route_spikes(&[SpikeEvent::new(key.pre, 110.0), SpikeEvent::new(key.post, 111.0)]);
    assert!(table.snapshot(200.0) >= 1);
    assert_eq!(table.snapshot(300.0), 0);

    let record = table
        .records()
        .into_iter()
        .find(|r| r.synapse == key)
        .unwrap();
    assert_eq!(record.log.len(), 2);
    assert_eq!(record.log[0].0, 0.0);
    assert_eq!(record.log[1].0, 200.0);
    assert_ne!(record.log[0].1, record.log[1].1);
}

#[test]
fn test_unrelated_spikes_leave_table_untouched() {
    let config = reward_config();
    let (populations, _, mut table) = build(&config);
    let i = populations.by_name("I").unwrap();
    // I cells are never presynaptic to a plastic synapse; as post they may be
    let weights: Vec<f64> = table.iter().map(|s| s.weight()).collect();
    let spikes: Vec<SpikeEvent> = i.gids().map(|g| SpikeEvent::new(Gid::from(g), 3.0)).collect();
    table.route_spikes(&spikes);
    let after: Vec<f64> = table.iter().map(|s| s.weight()).collect();
    assert_eq!(weights, after);
}
