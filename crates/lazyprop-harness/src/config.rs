//! Harness configuration
//!
//! [`HarnessConfig`] is plain data: built in code with `with_*` methods or
//! read from a TOML file. Every field has a default, so a config file only
//! needs the keys it changes.
//!
//! ```toml
//! counts = [1000, 10000, 100000]
//! access_handles = true
//! strategies = ["eager", "indexed-slots"]
//! units = "binary"
//! probe = "thread"
//! ```

use crate::error::HarnessError;
use crate::probe::ProbeScope;
use crate::result::MemoryUnits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Benchmark run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Instance counts, one trial per strategy each, run in this order
    pub counts: Vec<usize>,
    /// Materialize every handle while constructing
    pub access_handles: bool,
    /// Strategy ids to run, in order; every built-in strategy when absent
    pub strategies: Option<Vec<String>>,
    /// Units for human-readable memory
    pub units: MemoryUnits,
    /// Live-byte counter to sample
    pub probe: ProbeScope,
}

impl HarnessConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts of the classic run: 1k to 10k in steps of 1k, then 100k, 1M and 2M
    #[must_use]
    pub fn default_counts() -> Vec<usize> {
        (1..=10)
            .map(|k| k * 1_000)
            .chain([100_000, 1_000_000, 2_000_000])
            .collect()
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// The file cannot be read or is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// [`HarnessError::ConfigParse`] for malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, HarnessError> {
        Ok(toml::from_str(text)?)
    }

    /// Render as TOML text
    ///
    /// # Errors
    /// [`HarnessError::ConfigRender`] if the configuration cannot be rendered.
    pub fn to_toml(&self) -> Result<String, HarnessError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// With instance counts
    #[inline]
    #[must_use]
    pub fn with_counts(mut self, counts: Vec<usize>) -> Self {
        self.counts = counts;
        self
    }

    /// With handle materialization
    #[inline]
    #[must_use]
    pub fn with_access_handles(mut self, access_handles: bool) -> Self {
        self.access_handles = access_handles;
        self
    }

    /// With strategy selection
    #[inline]
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<String>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// With memory units
    #[inline]
    #[must_use]
    pub fn with_units(mut self, units: MemoryUnits) -> Self {
        self.units = units;
        self
    }

    /// With probe scope
    #[inline]
    #[must_use]
    pub fn with_probe(mut self, probe: ProbeScope) -> Self {
        self.probe = probe;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            counts: Self::default_counts(),
            access_handles: false,
            strategies: None,
            units: MemoryUnits::Decimal,
            probe: ProbeScope::Thread,
        }
    }
}
