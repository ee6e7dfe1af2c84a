//! Error types for the benchmark harness
//!
//! Per-trial failures are not errors at this level: they become failed
//! [`TestResult`](crate::TestResult) records. [`HarnessError`] covers what
//! stops a run from starting at all.

use crate::state_machine::TrialPhase;
use std::path::PathBuf;

/// Main harness error type
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Instance counts must be positive
    #[error("invalid instance count {0}: counts must be positive")]
    InvalidCount(usize),

    /// No counts to run
    #[error("no instance counts given")]
    NoCounts,

    /// Strategy id not registered
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    /// Strategy id selected more than once
    #[error("strategy `{0}` selected more than once")]
    DuplicateStrategy(String),

    /// No strategies to run
    #[error("no strategies selected")]
    NoStrategies,

    /// Phase change the trial state machine forbids
    #[error("illegal trial phase transition {from} -> {to}")]
    IllegalTransition {
        /// Current phase
        from: TrialPhase,
        /// Requested phase
        to: TrialPhase,
    },

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),
}

impl HarnessError {
    /// Create unknown-strategy error
    #[inline]
    #[must_use]
    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy(name.into())
    }

    /// Whether this error comes from configuration rather than the run itself
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. } | Self::ConfigParse(_) | Self::ConfigRender(_)
        )
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
