//! Random put/get/del storms from several threads, then verify the table.

use std::collections::HashSet;
use tsmap::workload::{self, WorkloadConfig, OPS_PER_THREAD};

fn storm(threads: usize, capacity: usize) {
    let config = WorkloadConfig::new(threads, capacity).unwrap();
    let report = workload::run(&config).unwrap();
    let totals = report.totals();

    assert_eq!(totals.total(), threads * OPS_PER_THREAD);
    assert_eq!(report.tallies.len(), threads);

    let map = &report.map;
    map.check_invariants().unwrap();
    assert_eq!(totals.inserted - totals.removed, map.len());
    assert!(map.len() <= capacity);

    let snapshot = map.snapshot();
    assert_eq!(snapshot.len(), capacity);
    assert_eq!(snapshot.iter().map(Vec::len).sum::<usize>(), map.len());

    let mut seen = HashSet::new();
    for chain in &snapshot {
        for &(key, _) in chain {
            assert!(seen.insert(key), "duplicate key {}", key);
        }
    }

    let expected = map.len();
    assert_eq!(report.teardown(), expected);
}

#[test]
fn test_storm_one_thread() {
    for capacity in [1, 100, 10_000] {
        storm(1, capacity);
    }
}

#[test]
fn test_storm_four_threads() {
    for capacity in [1, 100, 10_000] {
        storm(4, capacity);
    }
}

#[test]
fn test_storm_sixteen_threads() {
    for capacity in [1, 100, 10_000] {
        storm(16, capacity);
    }
}

#[test]
fn test_single_thread_run_is_reproducible() {
    let config = WorkloadConfig::new(1, 100).unwrap();

    let first = workload::run(&config).unwrap();
    let second = workload::run(&config).unwrap();

    assert_eq!(first.tallies, second.tallies);
    assert_eq!(first.map.snapshot(), second.map.snapshot());
    assert_eq!(first.map.to_string(), second.map.to_string());
}

#[test]
fn test_under_load_then_introspect() {
    let config = WorkloadConfig::new(8, 500)
        .unwrap()
        .ops_per_thread(5000)
        .key_range(1000)
        .unwrap();
    let report = workload::run(&config).unwrap();

    let stats = report.map.stats();
    assert_eq!(stats.size, report.map.len());
    assert_eq!(stats.chain_lengths.iter().sum::<usize>(), stats.size);
    assert!(stats.load_factor <= 1.0);
}
