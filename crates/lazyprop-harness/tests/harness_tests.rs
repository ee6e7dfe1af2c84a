//! Harness run shape, failure isolation and memory accounting

use lazyprop_harness::{
    alloc, CountingAllocator, Harness, HarnessError, ResultAggregator, StrategySet, TrialOutcome,
};
use lazyprop_test_utils::{
    strategies_with_failing_middle, two_strategy_harness, ScriptedProbe,
};
use pretty_assertions::assert_eq;

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator::new();

#[test]
fn test_run_shape() {
    let mut harness = two_strategy_harness();
    let results = harness.run(&[1000, 2000], false).unwrap();

    let pairs: Vec<_> = results
        .iter()
        .map(|r| (r.count, r.strategy.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (1000, "eager"),
            (1000, "shadow-field"),
            (2000, "eager"),
            (2000, "shadow-field"),
        ]
    );
    assert!(results.iter().all(|r| r.is_completed() && !r.access_handles));
}

#[test]
fn test_unsupported_kind_is_isolated() {
    let mut harness = Harness::new(strategies_with_failing_middle());
    let results = harness.run(&[50, 100], true).unwrap();
    assert_eq!(results.len(), 6);

    for result in &results {
        match result.strategy.as_str() {
            "keyed-store" => match &result.outcome {
                TrialOutcome::Failed { reason } => {
                    assert!(reason.contains("unsupported handle kind"), "{reason}");
                    assert_eq!(result.memory_bytes, 0);
                }
                TrialOutcome::Completed => panic!("keyed-store should fail"),
            },
            _ => assert!(result.is_completed(), "{result}"),
        }
    }
}

#[test]
fn test_trials_stop_early_without_running_the_rest() {
    let mut harness = two_strategy_harness();
    let counts = [10, 20, 30];
    let first_two: Vec<_> = harness
        .trials(&counts, false)
        .unwrap()
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first_two.len(), 2);
    assert!(first_two.iter().all(|r| r.count == 10));
}

#[test]
fn test_invalid_counts() {
    let mut harness = two_strategy_harness();
    assert!(matches!(
        harness.run(&[5, 0, 10], false),
        Err(HarnessError::InvalidCount(0))
    ));
}

#[test]
fn test_scripted_probe_allows_negative_deltas() {
    let probe = ScriptedProbe::new([5_000, 1_000]);
    let mut harness = two_strategy_harness().with_probe(probe.clone());
    let results = harness.run(&[10], false).unwrap();
    // Baseline and post-construction sample per trial
    assert_eq!(probe.collections(), 4);

    assert_eq!(results[0].memory_bytes, -4_000);
    assert_eq!(results[0].human_readable_memory, "-4.0 kB");
    assert!(results[0].is_completed());
    // Script exhausted: the second trial samples the same value twice
    assert_eq!(results[1].memory_bytes, 0);
}

#[test]
fn test_allocator_measures_node_footprint() {
    assert!(alloc::is_installed());

    let mut harness = Harness::new(StrategySet::select(&["eager", "shadow-field"]).unwrap());
    let raw = harness.run(&[2_000], false).unwrap();
    let materialized = harness.run(&[2_000], true).unwrap();

    let aggregator: ResultAggregator = raw.iter().cloned().collect();
    let saving = aggregator.memory_diff(2_000, "eager", "shadow-field").unwrap();
    assert!(saving < 0, "shadow fields should be smaller, diff {saving}");

    for result in raw.iter().chain(&materialized) {
        assert!(result.memory_bytes > 0, "{result}");
    }
    let shadow_raw = raw[1].memory_bytes;
    let shadow_full = materialized[1].memory_bytes;
    assert!(shadow_full > shadow_raw);
}

#[test]
fn test_drain_returns_memory() {
    let before = alloc::thread_live_bytes();
    let mut harness = Harness::new(StrategySet::select(&["indexed-slots", "named-map"]).unwrap());
    harness.run(&[500], true).unwrap();
    let after = alloc::thread_live_bytes();

    // Results and harness bookkeeping stay; 500 nodes would be far more
    assert!(after - before < 16 * 1024, "leaked {} bytes", after - before);
}
