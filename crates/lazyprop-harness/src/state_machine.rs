//! Trial phase state machine
//!
//! Every trial walks `Idle -> Priming -> Constructing -> PostGcSampling ->
//! Draining -> Idle`. A trial that fails during construction skips the
//! post-construction sample and goes straight to `Draining`, so the next
//! trial never starts before the previous one has released its nodes.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of one benchmark trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    /// No trial in progress
    #[default]
    Idle,

    /// Working collection cleared, baseline sampled
    Priming,

    /// Nodes being built; the only timed phase
    Constructing,

    /// Memory sampled again after construction
    PostGcSampling,

    /// Working collection released
    Draining,
}

impl TrialPhase {
    /// Every phase, in trial order
    pub const ALL: [TrialPhase; 5] = [
        Self::Idle,
        Self::Priming,
        Self::Constructing,
        Self::PostGcSampling,
        Self::Draining,
    ];

    /// Phase identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Priming => "priming",
            Self::Constructing => "constructing",
            Self::PostGcSampling => "post_gc_sampling",
            Self::Draining => "draining",
        }
    }
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a phase transition.
///
/// Illegal transitions are returned as errors; the `strict-debug` feature
/// turns them into panics.
///
/// # Errors
/// [`HarnessError::IllegalTransition`] when `to` is not reachable from `from`.
pub fn validate_transition(from: TrialPhase, to: TrialPhase) -> Result<(), HarnessError> {
    if allowed(from, to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("illegal trial phase transition: {from} -> {to}");

        #[allow(unreachable_code)]
        Err(HarnessError::IllegalTransition { from, to })
    }
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: TrialPhase) -> Vec<TrialPhase> {
    use TrialPhase::{Constructing, Draining, Idle, PostGcSampling, Priming};
    match from {
        Idle => vec![Priming],
        Priming => vec![Constructing],
        Constructing => vec![PostGcSampling, Draining],
        PostGcSampling => vec![Draining],
        Draining => vec![Idle],
    }
}

fn allowed(from: TrialPhase, to: TrialPhase) -> bool {
    allowed_transitions(from).into_iter().any(|p| p == to)
}

/// Current phase of a trial, changed only through legal transitions
#[derive(Debug, Default)]
pub struct PhaseTracker {
    phase: TrialPhase,
}

impl PhaseTracker {
    /// Create tracker in [`TrialPhase::Idle`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    /// Move to `to`
    ///
    /// # Errors
    /// See [`validate_transition`]; the phase is unchanged on error.
    pub fn advance(&mut self, to: TrialPhase) -> Result<(), HarnessError> {
        validate_transition(self.phase, to)?;
        tracing::trace!(from = %self.phase, to = %to, "trial phase");
        self.phase = to;
        Ok(())
    }
}
