//! Trial results and memory formatting

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a trial ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Every node was built
    Completed,

    /// Construction stopped early
    Failed {
        /// Error that stopped it
        reason: String,
    },
}

impl TrialOutcome {
    /// Whether the trial completed
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Unit system for human-readable byte counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MemoryUnits {
    /// Powers of 1000: `kB`, `MB`, `GB`
    #[default]
    Decimal,

    /// Powers of 1024: `KiB`, `MiB`, `GiB`
    Binary,
}

impl MemoryUnits {
    fn base(self) -> f64 {
        match self {
            Self::Decimal => 1000.0,
            Self::Binary => 1024.0,
        }
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Decimal => &["kB", "MB", "GB", "TB", "PB", "EB"],
            Self::Binary => &["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"],
        }
    }
}

/// Format `bytes` with one decimal place, keeping the sign
///
/// Values below one unit step are printed as plain bytes.
///
/// ```rust
/// use lazyprop_harness::{format_bytes, MemoryUnits};
///
/// assert_eq!(format_bytes(999, MemoryUnits::Decimal), "999 B");
/// assert_eq!(format_bytes(12_300_000, MemoryUnits::Decimal), "12.3 MB");
/// assert_eq!(format_bytes(-1536, MemoryUnits::Binary), "-1.5 KiB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: i64, units: MemoryUnits) -> String {
    let base = units.base();
    let magnitude = bytes.unsigned_abs() as f64;
    if magnitude < base {
        return format!("{bytes} B");
    }

    let sign = if bytes < 0 { "-" } else { "" };
    let mut value = magnitude / base;
    let mut prefix = 0;
    let prefixes = units.prefixes();
    // Keep rounding from printing "1000.0 kB"
    while value >= base - 0.05 && prefix + 1 < prefixes.len() {
        value /= base;
        prefix += 1;
    }
    format!("{sign}{value:.1} {}", prefixes[prefix])
}

/// Measurement for one (strategy, count) pair
///
/// Durations and memory deltas are noisy; a zero duration or a negative
/// memory delta is a valid measurement, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Strategy identifier
    pub strategy: String,

    /// Number of nodes built
    pub count: usize,

    /// Whether every handle was materialized
    pub access_handles: bool,

    /// Wall-clock construction time
    pub duration_millis: u64,

    /// Live bytes after construction minus live bytes before
    pub memory_bytes: i64,

    /// `memory_bytes` formatted for display
    pub human_readable_memory: String,

    /// How the trial ended
    #[serde(flatten)]
    pub outcome: TrialOutcome,
}

impl TestResult {
    /// Whether the trial completed
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }

    /// Memory per node, when any nodes were built
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bytes_per_node(&self) -> Option<f64> {
        (self.count > 0).then(|| self.memory_bytes as f64 / self.count as f64)
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<14} count={:<8} handles={:<5} time={}ms memory={}",
            self.strategy,
            self.count,
            self.access_handles,
            self.duration_millis,
            self.human_readable_memory
        )?;
        if let TrialOutcome::Failed { reason } = &self.outcome {
            write!(f, " FAILED: {reason}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decimal_units() {
        assert_eq!(format_bytes(0, MemoryUnits::Decimal), "0 B");
        assert_eq!(format_bytes(1000, MemoryUnits::Decimal), "1.0 kB");
        assert_eq!(format_bytes(1_260_000, MemoryUnits::Decimal), "1.3 MB");
        assert_eq!(format_bytes(999_999, MemoryUnits::Decimal), "1.0 MB");
        assert_eq!(format_bytes(2_000_000_000, MemoryUnits::Decimal), "2.0 GB");
    }

    #[test]
    fn binary_units() {
        assert_eq!(format_bytes(1023, MemoryUnits::Binary), "1023 B");
        assert_eq!(format_bytes(1024, MemoryUnits::Binary), "1.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024, MemoryUnits::Binary), "3.0 MiB");
    }

    #[test]
    fn negative_deltas_keep_sign() {
        assert_eq!(format_bytes(-12, MemoryUnits::Decimal), "-12 B");
        assert_eq!(format_bytes(-2_500, MemoryUnits::Decimal), "-2.5 kB");
        assert_eq!(format_bytes(i64::MIN, MemoryUnits::Binary), "-8.0 EiB");
    }

    #[test]
    fn failed_result_json() {
        let result = TestResult {
            strategy: "eager".into(),
            count: 10,
            access_handles: true,
            duration_millis: 0,
            memory_bytes: -40,
            human_readable_memory: format_bytes(-40, MemoryUnits::Decimal),
            outcome: TrialOutcome::Failed {
                reason: "boom".into(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
        assert_eq!(json["memory_bytes"], -40);

        let back: TestResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
        assert!(result.to_string().ends_with("FAILED: boom"));
    }

    #[test]
    fn bytes_per_node() {
        let mut result = TestResult {
            strategy: "eager".into(),
            count: 4,
            access_handles: false,
            duration_millis: 1,
            memory_bytes: 100,
            human_readable_memory: String::new(),
            outcome: TrialOutcome::Completed,
        };
        assert_eq!(result.bytes_per_node(), Some(25.0));
        result.count = 0;
        assert_eq!(result.bytes_per_node(), None);
    }
}
