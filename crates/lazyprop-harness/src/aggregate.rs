//! Result aggregation
//!
//! Collects [`TestResult`] records as a run produces them and regroups them
//! per instance count, one (duration, memory) pair per strategy, for side by
//! side comparison.

use crate::result::TestResult;
use indexmap::IndexMap;
use serde::Serialize;

/// Duration and memory of one strategy at one count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    /// Construction time in milliseconds
    pub duration_millis: u64,
    /// Memory delta in bytes
    pub memory_bytes: i64,
    /// Whether the trial completed
    pub completed: bool,
}

impl From<&TestResult> for Measurement {
    fn from(result: &TestResult) -> Self {
        Self {
            duration_millis: result.duration_millis,
            memory_bytes: result.memory_bytes,
            completed: result.is_completed(),
        }
    }
}

/// Every strategy's measurement at one instance count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    /// Instance count
    pub count: usize,
    /// Measurements keyed by strategy id, in the order they were recorded
    pub strategies: IndexMap<String, Measurement>,
}

impl CountRow {
    /// Measurement for `strategy`
    #[inline]
    #[must_use]
    pub fn get(&self, strategy: &str) -> Option<&Measurement> {
        self.strategies.get(strategy)
    }
}

/// Ordered store of results from one or more runs
#[derive(Debug, Default, Clone)]
pub struct ResultAggregator {
    results: Vec<TestResult>,
}

impl ResultAggregator {
    /// Create new empty aggregator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Record one result
    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Every result, in recording order
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Get number of recorded results
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if nothing has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Drop every recorded result
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Results grouped per count, counts in first-seen order
    ///
    /// A later result for the same (count, strategy) pair replaces the
    /// earlier one.
    #[must_use]
    pub fn rows(&self) -> Vec<CountRow> {
        let mut rows: IndexMap<usize, IndexMap<String, Measurement>> = IndexMap::new();
        for result in &self.results {
            rows.entry(result.count)
                .or_default()
                .insert(result.strategy.clone(), Measurement::from(result));
        }
        rows.into_iter()
            .map(|(count, strategies)| CountRow { count, strategies })
            .collect()
    }

    /// Memory of `b` minus memory of `a` at `count`
    ///
    /// `None` unless both strategies completed a trial at that count.
    #[must_use]
    pub fn memory_diff(&self, count: usize, a: &str, b: &str) -> Option<i64> {
        let memory = |strategy: &str| {
            self.results
                .iter()
                .rev()
                .find(|r| r.count == count && r.strategy == strategy)
                .filter(|r| r.is_completed())
                .map(|r| r.memory_bytes)
        };
        Some(memory(b)? - memory(a)?)
    }
}

impl Extend<TestResult> for ResultAggregator {
    fn extend<I: IntoIterator<Item = TestResult>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

impl FromIterator<TestResult> for ResultAggregator {
    fn from_iter<I: IntoIterator<Item = TestResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TrialOutcome;
    use pretty_assertions::assert_eq;

    fn result(strategy: &str, count: usize, memory_bytes: i64) -> TestResult {
        TestResult {
            strategy: strategy.to_string(),
            count,
            access_handles: false,
            duration_millis: 1,
            memory_bytes,
            human_readable_memory: String::new(),
            outcome: TrialOutcome::Completed,
        }
    }

    #[test]
    fn rows_group_per_count() {
        let aggregator: ResultAggregator = [
            result("eager", 1000, 400),
            result("shadow-field", 1000, 100),
            result("eager", 2000, 800),
            result("shadow-field", 2000, 200),
        ]
        .into_iter()
        .collect();

        let rows = aggregator.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].count, 1000);
        assert_eq!(
            rows[0].strategies.keys().collect::<Vec<_>>(),
            vec!["eager", "shadow-field"]
        );
        assert_eq!(rows[1].get("eager").unwrap().memory_bytes, 800);
    }

    #[test]
    fn memory_diff_is_b_minus_a() {
        let mut aggregator = ResultAggregator::new();
        aggregator.extend([result("eager", 1000, 400), result("shadow-field", 1000, 100)]);

        assert_eq!(aggregator.memory_diff(1000, "eager", "shadow-field"), Some(-300));
        assert_eq!(aggregator.memory_diff(1000, "shadow-field", "eager"), Some(300));
        assert_eq!(aggregator.memory_diff(2000, "eager", "shadow-field"), None);
    }

    #[test]
    fn failed_trials_have_no_diff() {
        let mut failed = result("eager", 10, 0);
        failed.outcome = TrialOutcome::Failed {
            reason: "unsupported".into(),
        };
        let aggregator: ResultAggregator = [failed, result("named-map", 10, 50)].into_iter().collect();
        assert_eq!(aggregator.memory_diff(10, "eager", "named-map"), None);
        assert!(!aggregator.rows()[0].get("eager").unwrap().completed);
    }
}
