//! Trial runner
//!
//! Drives every registered strategy through the trial state machine once
//! per instance count. Trials run strictly one after another on the calling
//! thread; a trial's nodes are drained before the next trial is primed.

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::probe::{AllocationProbe, MemoryProbe};
use crate::result::{format_bytes, MemoryUnits, TestResult, TrialOutcome};
use crate::state_machine::{PhaseTracker, TrialPhase};
use crate::strategy::{Strategy, StrategySet};
use std::time::Instant;

/// Benchmark harness
#[derive(Debug)]
pub struct Harness {
    strategies: StrategySet,
    probe: Box<dyn MemoryProbe>,
    units: MemoryUnits,
}

impl Harness {
    /// Create harness over `strategies`, sampling with an [`AllocationProbe`]
    #[must_use]
    pub fn new(strategies: StrategySet) -> Self {
        Self {
            strategies,
            probe: Box::new(AllocationProbe::default()),
            units: MemoryUnits::default(),
        }
    }

    /// Create harness with the strategies, probe scope and units in `config`
    ///
    /// # Errors
    /// Unknown or repeated strategy names, or an empty selection.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let strategies = match &config.strategies {
            Some(names) => StrategySet::select(names)?,
            None => StrategySet::with_defaults(),
        };
        if strategies.is_empty() {
            return Err(HarnessError::NoStrategies);
        }
        Ok(Self::new(strategies)
            .with_probe(AllocationProbe::new(config.probe))
            .with_units(config.units))
    }

    /// Sample memory with `probe`
    #[must_use]
    pub fn with_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Format memory deltas in `units`
    #[inline]
    #[must_use]
    pub fn with_units(mut self, units: MemoryUnits) -> Self {
        self.units = units;
        self
    }

    /// Registered strategies
    #[inline]
    #[must_use]
    pub fn strategies(&self) -> &StrategySet {
        &self.strategies
    }

    /// Lazily run one trial per (count, strategy) pair
    ///
    /// Counts form the outer loop and strategies, in registration order,
    /// the inner one. Nothing runs until the iterator is advanced.
    ///
    /// # Errors
    /// [`HarnessError::NoCounts`] or [`HarnessError::InvalidCount`], checked
    /// before any trial starts.
    pub fn trials<'a>(
        &'a mut self,
        counts: &'a [usize],
        access_handles: bool,
    ) -> Result<Trials<'a>, HarnessError> {
        validate_counts(counts)?;
        Ok(Trials {
            harness: self,
            counts,
            access_handles,
            next_count: 0,
            next_strategy: 0,
        })
    }

    /// Run every trial and collect the results in order
    ///
    /// A trial whose construction fails yields a failed result; the run
    /// carries on with the next pair.
    ///
    /// # Errors
    /// See [`Harness::trials`].
    pub fn run(
        &mut self,
        counts: &[usize],
        access_handles: bool,
    ) -> Result<Vec<TestResult>, HarnessError> {
        tracing::info!(
            counts = counts.len(),
            strategies = self.strategies.len(),
            access_handles,
            "starting benchmark run"
        );
        let results = self.trials(counts, access_handles)?.collect::<Result<Vec<_>, _>>()?;
        let failed = results.iter().filter(|r| !r.is_completed()).count();
        tracing::info!(trials = results.len(), failed, "benchmark run finished");
        Ok(results)
    }

    fn run_trial(
        &mut self,
        index: usize,
        count: usize,
        access_handles: bool,
    ) -> Option<Result<TestResult, HarnessError>> {
        let units = self.units;
        let probe = &mut *self.probe;
        let strategy = self.strategies.get_mut(index)?;
        Some(execute_trial(strategy, probe, count, access_handles, units))
    }
}

fn validate_counts(counts: &[usize]) -> Result<(), HarnessError> {
    if counts.is_empty() {
        return Err(HarnessError::NoCounts);
    }
    match counts.iter().find(|&&c| c == 0) {
        Some(&bad) => Err(HarnessError::InvalidCount(bad)),
        None => Ok(()),
    }
}

/// One pass through `Idle -> ... -> Idle` for `strategy`
fn execute_trial(
    strategy: &mut dyn Strategy,
    probe: &mut dyn MemoryProbe,
    count: usize,
    access_handles: bool,
    units: MemoryUnits,
) -> Result<TestResult, HarnessError> {
    let name = strategy.name();
    let mut phase = PhaseTracker::new();

    phase.advance(TrialPhase::Priming)?;
    strategy.prime();
    probe.collect();
    let baseline = probe.used_bytes();

    phase.advance(TrialPhase::Constructing)?;
    let started = Instant::now();
    let constructed = strategy.construct(count, access_handles);
    let elapsed = started.elapsed();

    let (memory_bytes, outcome) = match constructed {
        Ok(()) => {
            phase.advance(TrialPhase::PostGcSampling)?;
            probe.collect();
            (probe.used_bytes() - baseline, TrialOutcome::Completed)
        }
        Err(err) => {
            tracing::warn!(
                strategy = name,
                count,
                built = strategy.live_instances(),
                error = %err,
                "trial failed"
            );
            (
                0,
                TrialOutcome::Failed {
                    reason: err.to_string(),
                },
            )
        }
    };

    phase.advance(TrialPhase::Draining)?;
    strategy.drain();
    phase.advance(TrialPhase::Idle)?;

    let result = TestResult {
        strategy: name.to_string(),
        count,
        access_handles,
        duration_millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        memory_bytes,
        human_readable_memory: format_bytes(memory_bytes, units),
        outcome,
    };
    if result.is_completed() {
        tracing::info!(
            strategy = name,
            count,
            millis = result.duration_millis,
            memory = %result.human_readable_memory,
            "trial completed"
        );
    }
    Ok(result)
}

/// Lazy sequence of trial results; see [`Harness::trials`]
#[derive(Debug)]
pub struct Trials<'a> {
    harness: &'a mut Harness,
    counts: &'a [usize],
    access_handles: bool,
    next_count: usize,
    next_strategy: usize,
}

impl Iterator for Trials<'_> {
    type Item = Result<TestResult, HarnessError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let count = *self.counts.get(self.next_count)?;
            if self.next_strategy < self.harness.strategies.len() {
                let index = self.next_strategy;
                self.next_strategy += 1;
                return self.harness.run_trial(index, count, self.access_handles);
            }
            self.next_count += 1;
            self.next_strategy = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let strategies = self.harness.strategies.len();
        let remaining = self
            .counts
            .len()
            .saturating_sub(self.next_count)
            .saturating_mul(strategies)
            .saturating_sub(self.next_strategy);
        (remaining, Some(remaining))
    }
}
